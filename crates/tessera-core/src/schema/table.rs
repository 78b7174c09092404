use super::{CheckConstraint, FieldDescriptor, FieldGroup, GroupKind};

/// A table produced by translating one entity, relation or localization.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,

    /// Name of the described type the table stores
    pub type_name: String,

    pub kind: TableKind,

    /// Top-level groups in column order
    pub groups: Vec<FieldGroup>,

    /// Primary key column indices, in key order
    pub primary_key: Vec<usize>,

    pub unique: Vec<UniqueConstraint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Entity,
    Relation,
    Localization,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueConstraint {
    pub name: String,
    pub columns: Vec<usize>,
}

impl Table {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind,
            groups: vec![],
            primary_key: vec![],
            unique: vec![],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.groups.iter().map(FieldGroup::width).sum()
    }

    /// Flattened column descriptors, in column order.
    pub fn descriptors(&self) -> Vec<&FieldDescriptor> {
        let mut out = vec![];
        for group in &self.groups {
            group.collect(&mut out);
        }
        out
    }

    pub fn descriptors_mut(&mut self) -> Vec<&mut FieldDescriptor> {
        let mut out = vec![];
        for group in &mut self.groups {
            group.collect_mut(&mut out);
        }
        out
    }

    pub fn column(&self, index: usize) -> Option<&FieldDescriptor> {
        self.descriptors().into_iter().find(|field| field.column == index)
    }

    pub fn column_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors().into_iter().find(|field| field.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.descriptors()
            .into_iter()
            .map(|field| field.name.as_str())
            .collect()
    }

    pub fn primary_key_columns(&self) -> Vec<&FieldDescriptor> {
        let descriptors = self.descriptors();
        self.primary_key
            .iter()
            .filter_map(|index| descriptors.get(*index).copied())
            .collect()
    }

    /// Every check constraint of the table.
    pub fn checks(&self) -> Vec<&CheckConstraint> {
        self.descriptors()
            .into_iter()
            .flat_map(|field| &field.constraints)
            .collect()
    }

    /// Resolves a dotted property path to its group.
    pub fn find(&self, path: &str) -> Option<&FieldGroup> {
        let segments: Vec<_> = path.split('.').collect();
        let (first, rest) = segments.split_first()?;
        self.groups
            .iter()
            .find(|group| group.property == *first)?
            .find(rest)
    }

    /// Child tables of relations, keyed by the relation's property path.
    pub fn relations(&self) -> Vec<(String, &Table)> {
        self.children(|kind| matches!(kind, GroupKind::Relation { .. }))
    }

    /// Child tables of localizations, keyed by the property path.
    pub fn localizations(&self) -> Vec<(String, &Table)> {
        self.children(|kind| matches!(kind, GroupKind::LocalizationKey { .. }))
    }

    fn children(&self, filter: impl Fn(&GroupKind) -> bool) -> Vec<(String, &Table)> {
        let mut out = vec![];
        collect_children(&self.groups, "", &filter, &mut out);
        out
    }
}

fn collect_children<'a>(
    groups: &'a [FieldGroup],
    prefix: &str,
    filter: &dyn Fn(&GroupKind) -> bool,
    out: &mut Vec<(String, &'a Table)>,
) {
    for group in groups {
        let path = if prefix.is_empty() {
            group.property.clone()
        } else {
            format!("{prefix}.{}", group.property)
        };

        match &group.kind {
            GroupKind::Aggregate { groups, .. } => collect_children(groups, &path, filter, out),
            GroupKind::Relation { table, .. } | GroupKind::LocalizationKey { table, .. } => {
                if filter(&group.kind) {
                    out.push((path, &**table));
                }
            }
            _ => {}
        }
    }
}
