//! Validated schema descriptions produced by translation.
//!
//! A [`Table`] owns an ordered tree of [`FieldGroup`]s, one per mapped
//! property. Leaves are [`FieldDescriptor`]s, each describing one column.

mod clause;
pub use clause::Clause;

mod conversion;
pub use conversion::{Conversion, DataConverter, EnumStorage};

mod field;
pub use field::{CheckConstraint, FieldDescriptor};

mod group;
pub use group::{FieldGroup, GroupKind};

mod nullability;
pub use nullability::Nullability;

mod storage_ty;
pub use storage_ty::StorageType;

mod table;
pub use table::{Table, TableKind, UniqueConstraint};
