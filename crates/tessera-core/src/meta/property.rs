use super::{Annotation, AnnotationKind, Path};
use crate::{
    object::{Object, Record},
    stmt::Type,
};
use std::{fmt, sync::Arc};

/// A declared property of a described type.
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,

    pub ty: PropertyTy,

    /// Native nullability of the declared type (an optional in the host model)
    pub nullable: bool,

    /// False for read-only properties, which can only be set by a constructor
    pub settable: bool,

    /// Recomputes a calculated property from the rest of the instance
    pub compute: Option<Compute>,

    /// Annotations in declaration order
    pub annotations: Vec<Annotation>,
}

/// The declared type of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyTy {
    /// A scalar of the logical type system
    Scalar(Type),

    /// A catalog enumeration, by name
    Enum(String),

    /// A nested value type, by name
    Aggregate(String),

    /// A reference to an entity, by name
    Reference(String),

    /// A collection of elements stored in a child table
    Relation(Box<PropertyTy>),

    /// A localized aggregate, by name
    Localization(String),
}

/// Function computing a calculated property.
#[derive(Clone)]
pub struct Compute(Arc<dyn Fn(&Record) -> Object + Send + Sync>);

impl Property {
    pub fn new(name: impl Into<String>, ty: PropertyTy) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: false,
            settable: true,
            compute: None,
            annotations: vec![],
        }
    }

    pub fn scalar(name: impl Into<String>, ty: Type) -> Self {
        Self::new(name, PropertyTy::Scalar(ty))
    }

    pub fn enumeration(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, PropertyTy::Enum(ty.into()))
    }

    pub fn aggregate(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, PropertyTy::Aggregate(ty.into()))
    }

    pub fn reference(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, PropertyTy::Reference(ty.into()))
    }

    pub fn relation(name: impl Into<String>, element: PropertyTy) -> Self {
        Self::new(name, PropertyTy::Relation(Box::new(element)))
    }

    pub fn localization(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(name, PropertyTy::Localization(ty.into()))
    }

    /// Marks the declared type as natively nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.settable = false;
        self
    }

    /// Marks the property as calculated, recomputed by `f` on reconstitution.
    pub fn computed(mut self, f: impl Fn(&Record) -> Object + Send + Sync + 'static) -> Self {
        self.compute = Some(Compute(Arc::new(f)));
        self.annotate(AnnotationKind::Calculated)
    }

    pub fn annotate(mut self, kind: AnnotationKind) -> Self {
        self.annotations.push(Annotation::new(kind));
        self
    }

    /// Adds an annotation targeting the nested property at `path`.
    pub fn annotate_at(mut self, path: &str, kind: AnnotationKind) -> Self {
        self.annotations.push(Annotation::at(Path::new(path), kind));
        self
    }

    pub fn is_calculated(&self) -> bool {
        self.annotations
            .iter()
            .any(|annotation| annotation.path.is_none() && annotation.kind.is_calculated())
    }
}

impl PropertyTy {
    pub fn is_relation(&self) -> bool {
        matches!(self, Self::Relation(_))
    }

    pub fn is_localization(&self) -> bool {
        matches!(self, Self::Localization(_))
    }
}

impl fmt::Display for PropertyTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => write!(f, "{ty}"),
            Self::Enum(name) | Self::Aggregate(name) | Self::Localization(name) => {
                f.write_str(name)
            }
            Self::Reference(name) => write!(f, "&{name}"),
            Self::Relation(element) => write!(f, "[{element}]"),
        }
    }
}

impl Compute {
    pub fn new(f: impl Fn(&Record) -> Object + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, record: &Record) -> Object {
        (self.0)(record)
    }
}

impl fmt::Debug for Compute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Compute(..)")
    }
}
