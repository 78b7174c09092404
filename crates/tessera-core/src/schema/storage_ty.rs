use super::EnumStorage;
use crate::stmt;

/// How a column is stored by the database.
///
/// This is the type that appears in DDL. The logical type of the column is
/// kept on the [`FieldDescriptor`](super::FieldDescriptor) next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    Boolean,

    /// A signed integer of `n` bytes
    Integer(u8),

    /// An unsigned integer of `n` bytes
    UnsignedInteger(u8),

    /// A floating point number of `n` bytes
    Float(u8),

    Numeric,

    /// Unconstrained text
    Text,

    /// Text with an explicit maximum length
    VarChar(u64),

    Date,

    Time,

    DateTime,

    Uuid,
}

impl StorageType {
    /// Maps a logical type to its storage type.
    ///
    /// Enumerations are stored according to `enum_storage` (text by default).
    /// Text with a known maximum length becomes `VarChar`.
    pub fn from_app(
        ty: &stmt::Type,
        enum_storage: Option<EnumStorage>,
        max_length: Option<u64>,
    ) -> StorageType {
        match ty {
            stmt::Type::Bool => StorageType::Boolean,
            stmt::Type::I8 => StorageType::Integer(1),
            stmt::Type::I16 => StorageType::Integer(2),
            stmt::Type::I32 => StorageType::Integer(4),
            stmt::Type::I64 => StorageType::Integer(8),
            stmt::Type::U8 => StorageType::UnsignedInteger(1),
            stmt::Type::U16 => StorageType::UnsignedInteger(2),
            stmt::Type::U32 => StorageType::UnsignedInteger(4),
            stmt::Type::U64 => StorageType::UnsignedInteger(8),
            stmt::Type::F32 => StorageType::Float(4),
            stmt::Type::F64 => StorageType::Float(8),
            stmt::Type::Decimal => StorageType::Numeric,
            stmt::Type::String => match max_length {
                Some(max) => StorageType::VarChar(max),
                None => StorageType::Text,
            },
            stmt::Type::Date => StorageType::Date,
            stmt::Type::Time => StorageType::Time,
            stmt::Type::DateTime => StorageType::DateTime,
            stmt::Type::Uuid => StorageType::Uuid,
            stmt::Type::Enum(_) => match enum_storage.unwrap_or_default() {
                EnumStorage::Text => match max_length {
                    Some(max) => StorageType::VarChar(max),
                    None => StorageType::Text,
                },
                EnumStorage::Integer => StorageType::Integer(8),
            },
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, StorageType::Text | StorageType::VarChar(_))
    }
}
