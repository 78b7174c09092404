//! Data converters and the registry used to construct them by name.

use indexmap::IndexMap;
use std::{fmt, sync::Arc};
use tessera_core::{
    schema::DataConverter,
    stmt::{Type, Value},
    Error, Result,
};
use tracing::warn;

/// Builds a converter for a property of the given declared type.
pub type ConverterFactory =
    Arc<dyn Fn(&Type, &[Value]) -> anyhow::Result<Arc<dyn DataConverter>> + Send + Sync>;

/// Named converter factories.
#[derive(Clone)]
pub struct Converters {
    factories: IndexMap<String, ConverterFactory>,
}

impl Converters {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// A registry holding the built-in converters: `identity`,
    /// `bool_as_integer`, `uuid_as_text` and `offset`.
    pub fn builtin() -> Self {
        let mut converters = Self::empty();
        converters.register("identity", |ty, args| {
            no_args("identity", args)?;
            Ok(Arc::new(Identity(ty.clone())) as Arc<dyn DataConverter>)
        });
        converters.register("bool_as_integer", |ty, args| {
            no_args("bool_as_integer", args)?;
            anyhow::ensure!(ty.is_bool(), "`bool_as_integer` requires a bool property, not {ty}");
            Ok(Arc::new(BoolAsInteger) as Arc<dyn DataConverter>)
        });
        converters.register("uuid_as_text", |ty, args| {
            no_args("uuid_as_text", args)?;
            anyhow::ensure!(ty.is_uuid(), "`uuid_as_text` requires a uuid property, not {ty}");
            Ok(Arc::new(UuidAsText) as Arc<dyn DataConverter>)
        });
        converters.register("offset", |ty, args| {
            anyhow::ensure!(ty.is_integer(), "`offset` requires an integer property, not {ty}");
            let [offset] = args else {
                anyhow::bail!("`offset` takes exactly one argument, got {}", args.len());
            };
            let Some(offset) = offset.as_i128() else {
                anyhow::bail!("`offset` argument must be an integer, got {offset}");
            };
            Ok(Arc::new(Offset {
                ty: ty.clone(),
                offset,
            }) as Arc<dyn DataConverter>)
        });
        converters
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&Type, &[Value]) -> anyhow::Result<Arc<dyn DataConverter>>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Constructs the converter `name` for a property of type `ty`.
    ///
    /// Returns `None` if no converter of that name is registered.
    pub fn construct(
        &self,
        name: &str,
        ty: &Type,
        args: &[Value],
    ) -> Option<anyhow::Result<Arc<dyn DataConverter>>> {
        self.factories.get(name).map(|factory| factory(ty, args))
    }
}

impl Default for Converters {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

fn no_args(name: &str, args: &[Value]) -> anyhow::Result<()> {
    anyhow::ensure!(args.is_empty(), "`{name}` takes no arguments");
    Ok(())
}

#[derive(Debug)]
struct Identity(Type);

impl DataConverter for Identity {
    fn target(&self) -> Type {
        self.0.clone()
    }

    fn convert(&self, value: Value) -> Value {
        value
    }

    fn revert(&self, value: Value) -> Result<Value> {
        Ok(value)
    }
}

#[derive(Debug)]
struct BoolAsInteger;

impl DataConverter for BoolAsInteger {
    fn target(&self) -> Type {
        Type::I32
    }

    fn convert(&self, value: Value) -> Value {
        match value {
            Value::Bool(value) => Value::I32(value as i32),
            value => {
                warn!(kind = value.kind_name(), "bool_as_integer: passing through non-bool value");
                value
            }
        }
    }

    fn revert(&self, value: Value) -> Result<Value> {
        match value.as_i128() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(Error::type_conversion(value, "bool")),
        }
    }
}

#[derive(Debug)]
struct UuidAsText;

impl DataConverter for UuidAsText {
    fn target(&self) -> Type {
        Type::String
    }

    fn convert(&self, value: Value) -> Value {
        match value {
            Value::Uuid(value) => Value::String(value.hyphenated().to_string()),
            value => {
                warn!(kind = value.kind_name(), "uuid_as_text: passing through non-uuid value");
                value
            }
        }
    }

    fn revert(&self, value: Value) -> Result<Value> {
        match value {
            Value::String(text) => Ok(Value::Uuid(text.parse()?)),
            value => Err(Error::type_conversion(value, "uuid")),
        }
    }
}

/// Stores `value + offset`.
///
/// Integers narrower than 64 bits are stored as `i64`, so shifting them
/// never overflows. A shifted 64-bit value out of range extracts as NULL.
#[derive(Debug)]
struct Offset {
    ty: Type,
    offset: i128,
}

impl DataConverter for Offset {
    fn target(&self) -> Type {
        match self.ty {
            Type::I64 | Type::U64 => self.ty.clone(),
            _ => Type::I64,
        }
    }

    fn convert(&self, value: Value) -> Value {
        let shifted = value
            .as_i128()
            .and_then(|v| v.checked_add(self.offset))
            .and_then(|v| Value::integer_of(&self.target(), v));

        match shifted {
            Some(shifted) => shifted,
            None => {
                warn!(value = %value, offset = self.offset, "offset: shifted value out of range");
                Value::Null
            }
        }
    }

    fn revert(&self, value: Value) -> Result<Value> {
        value
            .as_i128()
            .and_then(|v| v.checked_sub(self.offset))
            .and_then(|v| Value::integer_of(&self.ty, v))
            .ok_or_else(|| Error::type_conversion(value, self.ty.to_string()))
    }
}
