use super::{Type, Value};

macro_rules! impl_num {
    (
        $(
            $variant:ident($ty:ty) {
                $is:ident
            } )*
    ) => {
        impl Type {
            $(
                pub fn $is(&self) -> bool {
                    matches!(self, Self::$variant)
                }
            )*
        }

        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl From<&$ty> for Value {
                fn from(value: &$ty) -> Self {
                    Self::$variant(*value)
                }
            }

            impl TryFrom<Value> for $ty {
                type Error = crate::Error;

                fn try_from(value: Value) -> crate::Result<Self> {
                    match value {
                        Value::$variant(value) => Ok(value),
                        value => Err(crate::Error::type_conversion(value, stringify!($ty))),
                    }
                }
            }
        )*
    };
}

impl_num! {
    I8(i8) {
        is_i8
    }
    I16(i16) {
        is_i16
    }
    I32(i32) {
        is_i32
    }
    I64(i64) {
        is_i64
    }
    U8(u8) {
        is_u8
    }
    U16(u16) {
        is_u16
    }
    U32(u32) {
        is_u32
    }
    U64(u64) {
        is_u64
    }
}

impl Value {
    /// Builds an integer value of type `ty` from a wide integer, if it fits.
    pub fn integer_of(ty: &Type, value: i128) -> Option<Self> {
        Some(match ty {
            Type::I8 => Self::I8(value.try_into().ok()?),
            Type::I16 => Self::I16(value.try_into().ok()?),
            Type::I32 => Self::I32(value.try_into().ok()?),
            Type::I64 => Self::I64(value.try_into().ok()?),
            Type::U8 => Self::U8(value.try_into().ok()?),
            Type::U16 => Self::U16(value.try_into().ok()?),
            Type::U32 => Self::U32(value.try_into().ok()?),
            Type::U64 => Self::U64(value.try_into().ok()?),
            _ => return None,
        })
    }
}
