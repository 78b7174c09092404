use super::Error;

/// Error when a row handed to a reconstitution plan has the wrong arity.
#[derive(Debug)]
pub(super) struct InvalidRowError {
    expected: usize,
    actual: usize,
}

impl std::error::Error for InvalidRowError {}

impl core::fmt::Display for InvalidRowError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid row: expected {} values, found {}",
            self.expected, self.actual
        )
    }
}

impl Error {
    pub fn invalid_row(expected: usize, actual: usize) -> Error {
        Error::from(super::ErrorKind::InvalidRow(InvalidRowError { expected, actual }))
    }

    pub fn is_invalid_row(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::InvalidRow(_))
    }
}
