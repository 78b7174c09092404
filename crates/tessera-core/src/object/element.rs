use super::Object;

/// Lifecycle status of a relation element relative to the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    New,
    Saved,
    Modified,
    Deleted,
}

/// One element of a relation collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub status: Status,
    pub value: Object,
}

impl Element {
    pub fn new(value: impl Into<Object>) -> Self {
        Self::with_status(Status::New, value)
    }

    pub fn saved(value: impl Into<Object>) -> Self {
        Self::with_status(Status::Saved, value)
    }

    pub fn modified(value: impl Into<Object>) -> Self {
        Self::with_status(Status::Modified, value)
    }

    pub fn deleted(value: impl Into<Object>) -> Self {
        Self::with_status(Status::Deleted, value)
    }

    pub fn with_status(status: Status, value: impl Into<Object>) -> Self {
        Self {
            status,
            value: value.into(),
        }
    }
}
