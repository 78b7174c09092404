use crate::{
    stmt::{Type, TypeEnum, Value},
    Error, Result,
};
use std::{fmt, sync::Arc};

/// Converts values of a property to and from the type stored in its column.
///
/// `convert` runs during extraction and must not fail: values it does not
/// understand are returned unchanged. `revert` runs during reconstitution and
/// reports values it cannot map back.
pub trait DataConverter: fmt::Debug + Send + Sync {
    /// The type produced by `convert`
    fn target(&self) -> Type;

    fn convert(&self, value: Value) -> Value;

    fn revert(&self, value: Value) -> Result<Value>;
}

/// How enumeration values are stored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumStorage {
    /// By variant name
    #[default]
    Text,

    /// By discriminant
    Integer,
}

/// The full chain of conversions applied to a field.
///
/// Towards storage, the property's data converter runs first and enum storage
/// second. Reverting unwinds them in the opposite order.
#[derive(Debug, Clone, Default)]
pub struct Conversion {
    pub converter: Option<Arc<dyn DataConverter>>,

    pub enum_storage: Option<(TypeEnum, EnumStorage)>,
}

impl Conversion {
    pub fn is_identity(&self) -> bool {
        self.converter.is_none() && self.enum_storage.is_none()
    }

    /// Logical value to storage value.
    pub fn apply(&self, value: Value) -> Value {
        let value = match &self.converter {
            Some(converter) if !value.is_null() => converter.convert(value),
            _ => value,
        };
        self.effective_to_storage(value)
    }

    /// Effective value (after the data converter) to storage value.
    pub fn effective_to_storage(&self, value: Value) -> Value {
        let Some((ty, storage)) = &self.enum_storage else {
            return value;
        };

        match (value, storage) {
            (Value::Enum(value), EnumStorage::Text) => Value::String(value.variant),
            (Value::Enum(value), EnumStorage::Integer) => match ty.variant(&value.variant) {
                Some(variant) => Value::I64(variant.discriminant),
                None => Value::Enum(value),
            },
            (value, _) => value,
        }
    }

    /// Storage value back to logical value.
    pub fn revert(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(value);
        }

        let value = match &self.enum_storage {
            Some((ty, EnumStorage::Text)) => match value {
                Value::String(name) if ty.variant(&name).is_some() => Value::enumeration(name),
                value => return Err(Error::type_conversion(value, format!("enum {}", ty.name))),
            },
            Some((ty, EnumStorage::Integer)) => {
                let variant = value
                    .as_i128()
                    .and_then(|discriminant| i64::try_from(discriminant).ok())
                    .and_then(|discriminant| ty.variant_by_discriminant(discriminant));

                match variant {
                    Some(variant) => Value::enumeration(variant.name.clone()),
                    None => return Err(Error::type_conversion(value, format!("enum {}", ty.name))),
                }
            }
            None => value,
        };

        match &self.converter {
            Some(converter) => converter.revert(value),
            None => Ok(value),
        }
    }
}

impl From<Arc<dyn DataConverter>> for Conversion {
    fn from(converter: Arc<dyn DataConverter>) -> Self {
        Self {
            converter: Some(converter),
            enum_storage: None,
        }
    }
}
