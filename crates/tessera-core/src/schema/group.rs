use super::{FieldDescriptor, Nullability, Table};
use crate::meta::PropertyTy;
use std::ops::Range;

/// The mapping of one property.
#[derive(Debug, Clone)]
pub struct FieldGroup {
    /// Declared property name
    pub property: String,

    /// Name segment prefixed to nested column names. Empty when the group
    /// contributes no prefix.
    pub name: String,

    pub nullability: Nullability,

    /// Calculated groups are extracted but never reconstituted
    pub calculated: bool,

    /// First column of the group within its table
    pub column: usize,

    pub kind: GroupKind,
}

#[derive(Debug, Clone)]
pub enum GroupKind {
    /// A scalar or enum property: exactly one column
    Single(FieldDescriptor),

    /// A nested value type flattened into the owner's columns
    Aggregate { ty: String, groups: Vec<FieldGroup> },

    /// A reference to an entity, stored as the target's key columns
    Reference {
        target: String,

        /// Key columns, in the target's key order
        fields: Vec<FieldDescriptor>,

        /// Property path of each key field within the target type
        key_paths: Vec<Vec<String>>,

        /// The target's instances are known up front
        predefined: bool,
    },

    /// A collection stored in a child table. Owns no columns of this table.
    Relation { element: PropertyTy, table: Box<Table> },

    /// A localized sub-record: one key column here, values in a child table
    LocalizationKey {
        key: FieldDescriptor,
        ty: String,
        table: Box<Table>,
    },
}

impl FieldGroup {
    /// Number of owner-table columns the group occupies.
    pub fn width(&self) -> usize {
        match &self.kind {
            GroupKind::Single(_) | GroupKind::LocalizationKey { .. } => 1,
            GroupKind::Aggregate { groups, .. } => groups.iter().map(FieldGroup::width).sum(),
            GroupKind::Reference { fields, .. } => fields.len(),
            GroupKind::Relation { .. } => 0,
        }
    }

    /// Half-open column range of the group.
    pub fn columns(&self) -> Range<usize> {
        self.column..self.column + self.width()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullability.is_nullable()
    }

    pub fn is_relation(&self) -> bool {
        matches!(self.kind, GroupKind::Relation { .. })
    }

    pub fn as_single(&self) -> Option<&FieldDescriptor> {
        match &self.kind {
            GroupKind::Single(field) => Some(field),
            _ => None,
        }
    }

    pub fn nested(&self) -> &[FieldGroup] {
        match &self.kind {
            GroupKind::Aggregate { groups, .. } => groups,
            _ => &[],
        }
    }

    /// Flattened column descriptors, in column order.
    pub fn descriptors(&self) -> Vec<&FieldDescriptor> {
        let mut out = vec![];
        self.collect(&mut out);
        out
    }

    pub fn descriptors_mut(&mut self) -> Vec<&mut FieldDescriptor> {
        let mut out = vec![];
        self.collect_mut(&mut out);
        out
    }

    pub(crate) fn collect<'a>(&'a self, out: &mut Vec<&'a FieldDescriptor>) {
        match &self.kind {
            GroupKind::Single(field) => out.push(field),
            GroupKind::Aggregate { groups, .. } => {
                for group in groups {
                    group.collect(out);
                }
            }
            GroupKind::Reference { fields, .. } => out.extend(fields),
            GroupKind::Relation { .. } => {}
            GroupKind::LocalizationKey { key, .. } => out.push(key),
        }
    }

    pub(crate) fn collect_mut<'a>(&'a mut self, out: &mut Vec<&'a mut FieldDescriptor>) {
        match &mut self.kind {
            GroupKind::Single(field) => out.push(field),
            GroupKind::Aggregate { groups, .. } => {
                for group in groups {
                    group.collect_mut(out);
                }
            }
            GroupKind::Reference { fields, .. } => out.extend(fields.iter_mut()),
            GroupKind::Relation { .. } => {}
            GroupKind::LocalizationKey { key, .. } => out.push(key),
        }
    }

    /// Resolves a property path relative to this group.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&FieldGroup> {
        let [first, rest @ ..] = path else {
            return Some(self);
        };

        self.nested()
            .iter()
            .find(|group| group.property == first.as_ref())?
            .find(rest)
    }

    pub fn find_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut FieldGroup> {
        let [first, rest @ ..] = path else {
            return Some(self);
        };

        match &mut self.kind {
            GroupKind::Aggregate { groups, .. } => groups
                .iter_mut()
                .find(|group| group.property == first.as_ref())?
                .find_mut(rest),
            _ => None,
        }
    }
}
