//! Scalar values and the logical type system shared by every layer.

mod num;

mod ty;
pub use ty::Type;

mod ty_enum;
pub use ty_enum::{EnumVariant, TypeEnum};

mod value;
pub use value::Value;

mod value_chrono;

mod value_cmp;
pub use value_cmp::CmpOp;

mod value_enum;
pub use value_enum::ValueEnum;
