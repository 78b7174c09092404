use crate::{
    schema::EnumStorage,
    stmt::{CmpOp, Value},
};
use std::{fmt, mem, ops::Bound};

/// A declarative annotation attached to a property.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Nested property the annotation targets, relative to the annotated one
    pub path: Option<Path>,

    pub kind: AnnotationKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationKind {
    /// Overrides the column (or name segment) of the target
    Name(String),

    Nullable,

    NonNullable,

    /// Fixes the first column of the target relative to its owner
    Column(usize),

    /// Default value, in the property's declared type
    Default(Value),

    PrimaryKey,

    /// Unique constraint membership; annotations sharing a name form one
    /// composite constraint
    Unique(Option<String>),

    Check(Check),

    /// Data converter, looked up by name and constructed with `args`
    Converter { name: String, args: Vec<Value> },

    EnumStorage(EnumStorage),

    /// The property is derived from others and is not reconstituted
    Calculated,
}

/// Check constraint arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    Sign(Sign),

    /// Inclusive length bounds on text
    Length { min: Option<u64>, max: Option<u64> },

    Range { lower: Bound<Value>, upper: Bound<Value> },

    OneOf(Vec<Value>),

    NoneOf(Vec<Value>),

    /// Compares the target with a sibling property, by dotted path
    Compare { op: CmpOp, other: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    NonNegative,
    Negative,
    NonPositive,
    NonZero,
}

/// A dotted property path, e.g. `Address.City`.
///
/// The path is kept as written and validated during translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(String);

impl Annotation {
    pub fn new(kind: AnnotationKind) -> Self {
        Self { path: None, kind }
    }

    pub fn at(path: Path, kind: AnnotationKind) -> Self {
        Self {
            path: Some(path),
            kind,
        }
    }
}

impl AnnotationKind {
    pub fn converter<I>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::Converter {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn is_calculated(&self) -> bool {
        matches!(self, Self::Calculated)
    }

    /// Check constraints may be stacked; every other annotation may appear at
    /// most once per target.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Self::Check(_))
    }

    pub fn same_kind(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl Check {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sign(_) => "Sign",
            Self::Length { .. } => "Length",
            Self::Range { .. } => "Range",
            Self::OneOf(_) => "OneOf",
            Self::NoneOf(_) => "NoneOf",
            Self::Compare { .. } => "Compare",
        }
    }
}

impl Path {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split('.')
    }

    /// The first segment and the remaining path, if any.
    pub fn split_first(&self) -> (&str, Option<Path>) {
        match self.0.split_once('.') {
            Some((first, rest)) => (first, Some(Path::new(rest))),
            None => (&self.0, None),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "[Name({name:?})]"),
            Self::Nullable => f.write_str("[Nullable]"),
            Self::NonNullable => f.write_str("[NonNullable]"),
            Self::Column(index) => write!(f, "[Column({index})]"),
            Self::Default(value) => write!(f, "[Default({value})]"),
            Self::PrimaryKey => f.write_str("[PrimaryKey]"),
            Self::Unique(Some(name)) => write!(f, "[Unique({name:?})]"),
            Self::Unique(None) => f.write_str("[Unique]"),
            Self::Check(check) => write!(f, "[Check({})]", check.name()),
            Self::Converter { name, .. } => write!(f, "[Converter({name})]"),
            Self::EnumStorage(storage) => write!(f, "[EnumStorage({storage:?})]"),
            Self::Calculated => f.write_str("[Calculated]"),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Path {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
