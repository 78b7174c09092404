use std::fmt;

/// The four families of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// The shape of the described type cannot be mapped
    Structural,

    /// An annotation is used where it does not apply, or with bad arguments
    AnnotationMisuse,

    /// Annotations are individually valid but contradict each other
    Semantic,

    /// An invariant established elsewhere in the pipeline does not hold
    Internal,
}

/// Why translation (or a later pipeline stage) failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    // Structural
    UnsupportedType,
    UnknownType,
    InvalidTarget,
    RecursiveAggregate,
    NestedRelation,
    NestedLocalization,
    PreDefinedForeignData,
    NonContiguousColumns,
    OverlappingColumns,
    CannotDeducePrimaryKey,
    DuplicateName,
    NoViableConstructor,
    AmbiguousConstructor,
    UnreconstitutableProperty,
    MissingDomain,

    // Annotation misuse
    InapplicableAnnotation,
    ConflictingAnnotations,
    DuplicateAnnotation,
    InvalidName,
    InvalidPath,
    InvalidConstraintArguments,
    InvalidDefault,
    UnknownConverter,
    InvalidConverter,

    // Semantic
    InvalidatedDefault,
    UnsatisfiableConstraint,
    AmbiguousNullability,

    // Internal consistency
    KeyLookupExhausted,
    CandidateLimitExceeded,
}

impl Reason {
    pub fn category(self) -> Category {
        use Reason::*;

        match self {
            UnsupportedType
            | UnknownType
            | InvalidTarget
            | RecursiveAggregate
            | NestedRelation
            | NestedLocalization
            | PreDefinedForeignData
            | NonContiguousColumns
            | OverlappingColumns
            | CannotDeducePrimaryKey
            | DuplicateName
            | NoViableConstructor
            | AmbiguousConstructor
            | UnreconstitutableProperty
            | MissingDomain => Category::Structural,
            InapplicableAnnotation
            | ConflictingAnnotations
            | DuplicateAnnotation
            | InvalidName
            | InvalidPath
            | InvalidConstraintArguments
            | InvalidDefault
            | UnknownConverter
            | InvalidConverter => Category::AnnotationMisuse,
            InvalidatedDefault | UnsatisfiableConstraint | AmbiguousNullability => {
                Category::Semantic
            }
            KeyLookupExhausted | CandidateLimitExceeded => Category::Internal,
        }
    }

    fn description(self) -> &'static str {
        use Reason::*;

        match self {
            UnsupportedType => "unsupported property type",
            UnknownType => "unknown type",
            InvalidTarget => "invalid target type",
            RecursiveAggregate => "recursive aggregate",
            NestedRelation => "nested relation",
            NestedLocalization => "nested localization",
            PreDefinedForeignData => "pre-defined entity refers to mutable data",
            NonContiguousColumns => "non-contiguous columns",
            OverlappingColumns => "overlapping columns",
            CannotDeducePrimaryKey => "cannot deduce primary key",
            DuplicateName => "duplicate column name",
            NoViableConstructor => "no viable constructor",
            AmbiguousConstructor => "ambiguous constructor",
            UnreconstitutableProperty => "property cannot be reconstituted",
            MissingDomain => "missing candidate domain",
            InapplicableAnnotation => "inapplicable annotation",
            ConflictingAnnotations => "conflicting annotations",
            DuplicateAnnotation => "duplicate annotation",
            InvalidName => "invalid name",
            InvalidPath => "invalid path",
            InvalidConstraintArguments => "invalid constraint arguments",
            InvalidDefault => "invalid default value",
            UnknownConverter => "unknown data converter",
            InvalidConverter => "invalid data converter",
            InvalidatedDefault => "default value invalidated by constraint",
            UnsatisfiableConstraint => "unsatisfiable constraint",
            AmbiguousNullability => "ambiguous nullability",
            KeyLookupExhausted => "key lookup exhausted",
            CandidateLimitExceeded => "candidate limit exceeded",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
