//! Dynamic object instances.
//!
//! Plans read from and write to these values. A described type's instance is
//! a [`Record`] keyed by property name; references to entities share the
//! referenced record through an `Arc`.

mod element;
pub use element::{Element, Status};

mod localized;
pub use localized::Localized;

mod record;
pub use record::Record;

use crate::stmt::Value;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Object {
    /// Absent value: a null scalar, aggregate, reference or localization
    #[default]
    Null,

    /// A scalar or enum value
    Value(Value),

    /// An aggregate (or an entity being extracted or reconstituted)
    Record(Record),

    /// A handle on an entity owned elsewhere
    Entity(Arc<Record>),

    /// The elements of a relation
    Collection(Vec<Element>),

    /// A localized sub-record
    Localized(Localized),
}

impl Object {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null | Self::Value(Value::Null))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the record behind either an owned record or an entity handle.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            Self::Entity(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Arc<Record>> {
        match self {
            Self::Entity(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&[Element]> {
        match self {
            Self::Collection(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_localized(&self) -> Option<&Localized> {
        match self {
            Self::Localized(localized) => Some(localized),
            _ => None,
        }
    }

    /// Converts to a scalar value; `Null` becomes `Value::Null`.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Null => Some(Value::Null),
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Follows a property path through nested records.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Object> {
        let mut current = self;
        for segment in path {
            current = current.as_record()?.get(segment.as_ref())?;
        }
        Some(current)
    }
}

impl From<Value> for Object {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            value => Self::Value(value),
        }
    }
}

impl From<Record> for Object {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Arc<Record>> for Object {
    fn from(value: Arc<Record>) -> Self {
        Self::Entity(value)
    }
}

impl From<Vec<Element>> for Object {
    fn from(value: Vec<Element>) -> Self {
        Self::Collection(value)
    }
}

impl From<Localized> for Object {
    fn from(value: Localized) -> Self {
        Self::Localized(value)
    }
}

impl<T> From<Option<T>> for Object
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

macro_rules! impl_from_scalar {
    ( $( $ty:ty ),* ) => {
        $(
            impl From<$ty> for Object {
                fn from(value: $ty) -> Self {
                    Self::from(Value::from(value))
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    &str,
    Decimal,
    Uuid,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    crate::stmt::ValueEnum
);
