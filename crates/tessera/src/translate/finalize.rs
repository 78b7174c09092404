use super::{checks, Cx, TableState, Translator};
use indexmap::IndexMap;
use std::collections::HashMap;
use tessera_core::{
    meta::Check,
    schema::{
        CheckConstraint, Clause, FieldDescriptor, FieldGroup, GroupKind, Table, UniqueConstraint,
    },
    Error, Location, Reason, Result,
};

impl Translator<'_> {
    /// Completes a table once all of its groups are built and placed: final
    /// columns and names, then uniqueness and check constraints.
    pub(super) fn finalize(
        &mut self,
        cx: &Cx<'_>,
        table: &mut Table,
        state: &TableState,
    ) -> Result<()> {
        super::columns::assign(&mut table.groups, 0);
        name_groups(&mut table.groups, "", &self.config.name_separator);
        check_duplicate_names(cx, &table.groups)?;
        self.unique_constraints(table, state)?;
        attach_checks(table, state)?;
        Ok(())
    }

    fn unique_constraints(&mut self, table: &mut Table, state: &TableState) -> Result<()> {
        let mut constraints: IndexMap<String, Vec<usize>> = IndexMap::new();

        for pending in &state.uniques {
            let Some(group) = find(&table.groups, &pending.path) else {
                return Err(Error::translation(
                    Reason::InvalidPath,
                    pending.location.clone(),
                    "unique field not found in table",
                ));
            };

            let name = match &pending.name {
                Some(name) => name.clone(),
                None => {
                    self.unique_counter += 1;
                    format!("UQ_{}_{}", table.name, self.unique_counter)
                }
            };

            constraints.entry(name).or_default().extend(group.columns());
        }

        table.unique = constraints
            .into_iter()
            .map(|(name, columns)| UniqueConstraint { name, columns })
            .collect();
        Ok(())
    }
}

/// Prefixes every column name with the name segments of its enclosing
/// groups.
pub(super) fn name_groups(groups: &mut [FieldGroup], prefix: &str, separator: &str) {
    for group in groups {
        let nested = join(prefix, &group.name, separator);

        match &mut group.kind {
            GroupKind::Single(field) => field.rename_with_prefix(prefix, separator),
            GroupKind::Aggregate { groups, .. } => name_groups(groups, &nested, separator),
            GroupKind::Reference { fields, .. } => {
                for field in fields {
                    field.rename_with_prefix(&nested, separator);
                }
            }
            GroupKind::LocalizationKey { key, .. } => key.rename_with_prefix(prefix, separator),
            GroupKind::Relation { .. } => {}
        }
    }
}

pub(super) fn join(prefix: &str, segment: &str, separator: &str) -> String {
    match (prefix.is_empty(), segment.is_empty()) {
        (true, _) => segment.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{prefix}{separator}{segment}"),
    }
}

pub(super) fn find<'t>(groups: &'t [FieldGroup], path: &[String]) -> Option<&'t FieldGroup> {
    let (first, rest) = path.split_first()?;
    groups.iter().find(|group| group.property == *first)?.find(rest)
}

fn find_mut<'t>(groups: &'t mut [FieldGroup], path: &[String]) -> Option<&'t mut FieldGroup> {
    let (first, rest) = path.split_first()?;
    groups
        .iter_mut()
        .find(|group| group.property == *first)?
        .find_mut(rest)
}

fn check_duplicate_names(cx: &Cx<'_>, groups: &[FieldGroup]) -> Result<()> {
    let mut owners: Vec<(&FieldDescriptor, Vec<&str>)> = vec![];
    collect_owners(groups, &mut vec![], &mut owners);

    let mut seen: HashMap<&str, &[&str]> = HashMap::new();
    for (field, path) in &owners {
        if let Some(first) = seen.insert(&field.name, path) {
            let mut location = cx.location();
            for segment in path {
                location = location.child(segment);
            }

            return Err(Error::translation(
                Reason::DuplicateName,
                location,
                format!("column `{}` is also used by `{}`", field.name, first.join(".")),
            ));
        }
    }
    Ok(())
}

fn collect_owners<'g>(
    groups: &'g [FieldGroup],
    path: &mut Vec<&'g str>,
    out: &mut Vec<(&'g FieldDescriptor, Vec<&'g str>)>,
) {
    for group in groups {
        path.push(&group.property);
        match &group.kind {
            GroupKind::Aggregate { groups, .. } => collect_owners(groups, path, out),
            _ => {
                for field in group.descriptors() {
                    out.push((field, path.clone()));
                }
            }
        }
        path.pop();
    }
}

/// Builds the named clause of every pending check and attaches it to its
/// field.
fn attach_checks(table: &mut Table, state: &TableState) -> Result<()> {
    let mut counters: HashMap<String, usize> = HashMap::new();

    for pending in &state.checks {
        let Some(field) = find(&table.groups, &pending.path).and_then(FieldGroup::as_single) else {
            return Err(Error::translation(
                Reason::InvalidPath,
                pending.location.clone(),
                "checked field not found in table",
            ));
        };

        let clause = match &pending.check {
            Check::Compare { op, other } => {
                let other_field =
                    resolve_sibling(table, &pending.siblings, other, &pending.location)?;

                if other_field.ty != field.ty {
                    return Err(Error::translation(
                        Reason::InvalidConstraintArguments,
                        pending.location.clone(),
                        format!("`{other}` is a {}, not a {}", other_field.ty, field.ty),
                    ));
                }

                Clause::CrossField {
                    column: field.name.clone(),
                    op: *op,
                    other: other_field.name.clone(),
                }
            }
            check => match checks::clause(check, &field.name, &field.ty, &field.conversion) {
                Some(clause) => clause,
                None => continue,
            },
        };

        let column = field.name.clone();
        let n = counters.entry(column.clone()).or_default();
        *n += 1;
        let name = format!("CK_{}_{}_{}", table.name, column, n);

        if let Some(GroupKind::Single(field)) =
            find_mut(&mut table.groups, &pending.path).map(|group| &mut group.kind)
        {
            field.constraints.push(CheckConstraint { name, clause });
        }
    }
    Ok(())
}

fn resolve_sibling<'t>(
    table: &'t Table,
    siblings: &[String],
    other: &str,
    location: &Location,
) -> Result<&'t FieldDescriptor> {
    let mut path = siblings.to_vec();
    path.extend(other.split('.').map(str::to_string));

    find(&table.groups, &path)
        .and_then(FieldGroup::as_single)
        .ok_or_else(|| {
            Error::translation(
                Reason::InvalidConstraintArguments,
                location.clone(),
                format!("`{other}` is not a scalar field of this table"),
            )
        })
}
