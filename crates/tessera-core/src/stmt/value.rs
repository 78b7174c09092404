use super::{Type, ValueEnum};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time
    DateTime(NaiveDateTime),

    /// Fixed-point decimal
    Decimal(Decimal),

    /// Value of an enumerated type
    Enum(ValueEnum),

    /// Single precision float
    F32(f32),

    /// Double precision float
    F64(f64),

    /// Signed 8-bit integer
    I8(i8),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// The database NULL sentinel
    #[default]
    Null,

    /// String value
    String(String),

    /// Wall-clock time
    Time(NaiveTime),

    /// Unsigned 8-bit integer
    U8(u8),

    /// Unsigned 16-bit integer
    U16(u16),

    /// Unsigned 32-bit integer
    U32(u32),

    /// Unsigned 64-bit integer
    U64(u64),

    /// UUID value
    Uuid(Uuid),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn enumeration(variant: impl Into<String>) -> Self {
        Self::Enum(ValueEnum::new(variant))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&ValueEnum> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Widens any integer variant to `i128`.
    pub fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Self::I8(v) => v.into(),
            Self::I16(v) => v.into(),
            Self::I32(v) => v.into(),
            Self::I64(v) => v.into(),
            Self::U8(v) => v.into(),
            Self::U16(v) => v.into(),
            Self::U32(v) => v.into(),
            Self::U64(v) => v.into(),
            _ => return None,
        })
    }

    /// Returns true if the value can be stored in a field of type `ty`.
    ///
    /// `Null` is compatible with every type; nullability is a property of the
    /// field, not the type.
    pub fn is_a(&self, ty: &Type) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(_) => ty.is_bool(),
            Self::Date(_) => matches!(ty, Type::Date),
            Self::DateTime(_) => matches!(ty, Type::DateTime),
            Self::Decimal(_) => matches!(ty, Type::Decimal),
            Self::Enum(value) => match ty {
                Type::Enum(ty) => ty.variant(&value.variant).is_some(),
                _ => false,
            },
            Self::F32(_) => matches!(ty, Type::F32),
            Self::F64(_) => matches!(ty, Type::F64),
            Self::I8(_) => ty.is_i8(),
            Self::I16(_) => ty.is_i16(),
            Self::I32(_) => ty.is_i32(),
            Self::I64(_) => ty.is_i64(),
            Self::String(_) => ty.is_string(),
            Self::Time(_) => matches!(ty, Type::Time),
            Self::U8(_) => ty.is_u8(),
            Self::U16(_) => ty.is_u16(),
            Self::U32(_) => ty.is_u32(),
            Self::U64(_) => ty.is_u64(),
            Self::Uuid(_) => ty.is_uuid(),
        }
    }

    /// Infers the value's type. Returns `None` for `Null` and for enum values,
    /// whose type cannot be recovered from a single variant.
    pub fn infer_ty(&self) -> Option<Type> {
        Some(match self {
            Self::Bool(_) => Type::Bool,
            Self::Date(_) => Type::Date,
            Self::DateTime(_) => Type::DateTime,
            Self::Decimal(_) => Type::Decimal,
            Self::F32(_) => Type::F32,
            Self::F64(_) => Type::F64,
            Self::I8(_) => Type::I8,
            Self::I16(_) => Type::I16,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::String(_) => Type::String,
            Self::Time(_) => Type::Time,
            Self::U8(_) => Type::U8,
            Self::U16(_) => Type::U16,
            Self::U32(_) => Type::U32,
            Self::U64(_) => Type::U64,
            Self::Uuid(_) => Type::Uuid,
            Self::Enum(_) | Self::Null => return None,
        })
    }

    /// Name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "Bool",
            Self::Date(_) => "Date",
            Self::DateTime(_) => "DateTime",
            Self::Decimal(_) => "Decimal",
            Self::Enum(_) => "Enum",
            Self::F32(_) => "F32",
            Self::F64(_) => "F64",
            Self::I8(_) => "I8",
            Self::I16(_) => "I16",
            Self::I32(_) => "I32",
            Self::I64(_) => "I64",
            Self::Null => "Null",
            Self::String(_) => "String",
            Self::Time(_) => "Time",
            Self::U8(_) => "U8",
            Self::U16(_) => "U16",
            Self::U32(_) => "U32",
            Self::U64(_) => "U64",
            Self::Uuid(_) => "Uuid",
        }
    }

    /// The zero of a numeric type, used as the anchor of sign checks.
    pub fn zero(ty: &Type) -> Option<Self> {
        Some(match ty {
            Type::I8 => Self::I8(0),
            Type::I16 => Self::I16(0),
            Type::I32 => Self::I32(0),
            Type::I64 => Self::I64(0),
            Type::U8 => Self::U8(0),
            Type::U16 => Self::U16(0),
            Type::U32 => Self::U32(0),
            Type::U64 => Self::U64(0),
            Type::F32 => Self::F32(0.0),
            Type::F64 => Self::F64(0.0),
            Type::Decimal => Self::Decimal(Decimal::ZERO),
            _ => return None,
        })
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "'{v}'"),
            Self::DateTime(v) => write!(f, "'{v}'"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Enum(v) => write!(f, "{}", v.variant),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::Null => f.write_str("NULL"),
            Self::String(v) => write!(f, "'{v}'"),
            Self::Time(v) => write!(f, "'{v}'"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "'{v}'"),
        }
    }
}

impl AsRef<Self> for Value {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<f32> for Value {
    fn from(src: f32) -> Self {
        Self::F32(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<Decimal> for Value {
    fn from(src: Decimal) -> Self {
        Self::Decimal(src)
    }
}

impl From<Uuid> for Value {
    fn from(src: Uuid) -> Self {
        Self::Uuid(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
