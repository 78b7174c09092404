use super::{Category, Error, Location, Reason};

/// Error when a described type cannot be translated into a schema.
///
/// Covers the structural, annotation-misuse and semantic families. These are
/// all detected before any extraction or reconstitution plan exists.
#[derive(Debug)]
pub(super) struct TranslationError {
    pub(super) reason: Reason,
    pub(super) location: Location,
    message: Box<str>,
}

impl std::error::Error for TranslationError {}

impl core::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid schema: {} at {}: {}",
            self.reason, self.location, self.message
        )
    }
}

impl Error {
    /// Creates a translation error.
    pub fn translation(reason: Reason, location: Location, message: impl Into<String>) -> Error {
        debug_assert_ne!(reason.category(), Category::Internal);

        Error::from(super::ErrorKind::Translation(TranslationError {
            reason,
            location,
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is any kind of translation error.
    pub fn is_translation(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::Translation(_))
    }

    pub fn is_structural(&self) -> bool {
        self.category() == Some(Category::Structural)
    }

    pub fn is_annotation_misuse(&self) -> bool {
        self.category() == Some(Category::AnnotationMisuse)
    }

    pub fn is_semantic(&self) -> bool {
        self.category() == Some(Category::Semantic)
    }
}
