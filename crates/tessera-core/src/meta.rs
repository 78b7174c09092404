//! Declarative metadata describing the types that are mapped onto tables.
//!
//! The catalog stands in for runtime reflection: every described type lists
//! its properties (with declared type, native nullability and annotations),
//! its constructors and, for pre-defined entities, its fixed instances.

mod annotation;
pub use annotation::{Annotation, AnnotationKind, Check, Path, Sign};

mod catalog;
pub use catalog::Catalog;

mod constructor;
pub use constructor::{Constructor, Factory, Param};

mod property;
pub use property::{Compute, Property, PropertyTy};

mod ty;
pub use ty::{TypeDescriptor, TypeKind};
