use super::{Category, Error, Reason};

/// An internal-consistency failure.
///
/// These do not describe bad user input: they signal that an invariant the
/// schema guarantees did not hold at runtime (for example, a foreign key
/// whose target is not in the candidate domain).
#[derive(Debug)]
pub(super) struct InternalError {
    pub(super) reason: Reason,
    message: Box<str>,
}

impl std::error::Error for InternalError {}

impl core::fmt::Display for InternalError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "internal consistency failure: {}: {}",
            self.reason, self.message
        )
    }
}

impl Error {
    pub fn internal(reason: Reason, message: impl Into<String>) -> Error {
        debug_assert_eq!(reason.category(), Category::Internal);

        Error::from(super::ErrorKind::Internal(InternalError {
            reason,
            message: message.into().into(),
        }))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Internal(_))
    }
}
