use super::{Clause, Conversion, StorageType};
use crate::stmt::{Type, Value};

/// Describes a single column.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Column name, prefixed by every enclosing name segment once the table
    /// is finalized
    pub name: String,

    /// Position of the column within its table
    pub column: usize,

    /// Effective logical type: the declared type, or the data converter's
    /// target type
    pub ty: Type,

    pub storage_ty: StorageType,

    /// Whether the column accepts NULL
    pub nullable: bool,

    /// Default value, in storage form
    pub default: Option<Value>,

    pub constraints: Vec<CheckConstraint>,

    pub conversion: Conversion,
}

/// A named check constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckConstraint {
    pub name: String,
    pub clause: Clause,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: Type, storage_ty: StorageType) -> Self {
        Self {
            name: name.into(),
            column: 0,
            ty,
            storage_ty,
            nullable: false,
            default: None,
            constraints: vec![],
            conversion: Conversion::default(),
        }
    }

    /// Strips everything that belongs to the owner the descriptor was derived
    /// for, so it can be re-placed under another owner.
    pub fn reset(&mut self) {
        self.column = 0;
        self.default = None;
        self.constraints.clear();
    }

    /// Nests the descriptor under `prefix`. An empty prefix leaves the name
    /// unchanged.
    pub fn rename_with_prefix(&mut self, prefix: &str, separator: &str) {
        if !prefix.is_empty() {
            self.name = format!("{prefix}{separator}{}", self.name);
        }
    }

    /// Checks a storage value against the descriptor's own constraints.
    ///
    /// Cross-field constraints are unknown for a lone value and pass.
    pub fn admits(&self, value: &Value) -> bool {
        let lookup = |column: &str| (column == self.name).then(|| value.clone());
        self.constraints
            .iter()
            .all(|constraint| constraint.clause.admits(&lookup))
    }
}
