/// Resolved nullability of a field group.
///
/// Annotations override the native nullability of the declared type. The
/// conflicting and ambiguous outcomes are reported as translation errors and
/// never produce a value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullability {
    NativeNonNullable,
    NativeNullable,
    AnnotatedNullable,
    AnnotatedNonNullable,
}

impl Nullability {
    pub fn native(nullable: bool) -> Self {
        if nullable {
            Self::NativeNullable
        } else {
            Self::NativeNonNullable
        }
    }

    /// Applies an explicit annotation. `None` keeps the current state.
    pub fn annotate(self, nullable: Option<bool>) -> Self {
        match nullable {
            Some(true) => Self::AnnotatedNullable,
            Some(false) => Self::AnnotatedNonNullable,
            None => self,
        }
    }

    pub fn is_nullable(self) -> bool {
        matches!(self, Self::NativeNullable | Self::AnnotatedNullable)
    }

    pub fn is_annotated(self) -> bool {
        matches!(self, Self::AnnotatedNullable | Self::AnnotatedNonNullable)
    }

    /// A nullable aggregate is ambiguous when every column it flattens to is
    /// nullable on its own: an all-NULL slice could mean either an absent
    /// aggregate or a present one with every member absent.
    ///
    /// `columns` yields the nullability of each nested column, including
    /// those under nested aggregates.
    pub fn is_ambiguous<I>(self, columns: I) -> bool
    where
        I: IntoIterator<Item = bool>,
    {
        self.is_nullable() && columns.into_iter().all(|nullable| nullable)
    }
}

impl Default for Nullability {
    fn default() -> Self {
        Self::NativeNonNullable
    }
}
