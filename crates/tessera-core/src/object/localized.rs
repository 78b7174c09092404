use super::Record;
use indexmap::IndexMap;
use uuid::Uuid;

/// Per-locale copies of a localized sub-record, identified by a key that is
/// stored in the owner's row.
#[derive(Debug, Clone, PartialEq)]
pub struct Localized {
    pub key: Uuid,

    /// Locale name to localized fields
    pub entries: IndexMap<String, Record>,
}

impl Localized {
    pub fn new(key: Uuid) -> Self {
        Self {
            key,
            entries: IndexMap::new(),
        }
    }

    /// Creates an empty localization with a fresh random key.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4())
    }

    pub fn with(mut self, locale: impl Into<String>, record: Record) -> Self {
        self.entries.insert(locale.into(), record);
        self
    }

    pub fn get(&self, locale: &str) -> Option<&Record> {
        self.entries.get(locale)
    }
}
