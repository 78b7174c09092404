use std::ops::Range;
use tessera_core::{
    schema::{FieldGroup, GroupKind},
    Error, Location, Reason, Result,
};
use tracing::trace;

/// Where a group asked to be placed.
pub(super) struct Placement {
    /// Explicit first column, relative to the owner
    pub(super) start: Option<usize>,

    pub(super) location: Location,
}

/// Assigns each group a start column relative to its owner and sorts the
/// groups into column order.
///
/// Explicitly placed groups are fixed first. The rest are placed in
/// declaration order at the lowest start that overlaps nothing placed so far.
/// The result must cover exactly `[0, N)`. Groups without columns (relations)
/// move to the end, keeping their declaration order.
pub(super) fn place(groups: &mut Vec<FieldGroup>, placements: Vec<Placement>) -> Result<()> {
    debug_assert_eq!(groups.len(), placements.len());

    let mut taken: Vec<Range<usize>> = vec![];
    let mut starts: Vec<Option<usize>> = vec![None; groups.len()];

    for (i, (group, placement)) in groups.iter().zip(&placements).enumerate() {
        let Some(start) = placement.start else {
            continue;
        };

        let range = start..start + group.width();
        if range.is_empty() {
            continue;
        }

        if let Some(other) = taken.iter().find(|other| overlaps(other, &range)) {
            return Err(Error::translation(
                Reason::OverlappingColumns,
                placement.location.clone(),
                format!(
                    "columns {}..{} overlap columns {}..{}",
                    range.start, range.end, other.start, other.end
                ),
            ));
        }

        taken.push(range);
        starts[i] = Some(start);
    }

    for (i, group) in groups.iter().enumerate() {
        let width = group.width();
        if starts[i].is_some() || width == 0 {
            continue;
        }

        let mut candidates: Vec<usize> = std::iter::once(0)
            .chain(taken.iter().map(|range| range.end))
            .collect();
        candidates.sort_unstable();

        let start = candidates
            .into_iter()
            .find(|start| {
                let range = *start..*start + width;
                !taken.iter().any(|other| overlaps(other, &range))
            })
            .unwrap_or_default();

        taken.push(start..start + width);
        starts[i] = Some(start);
    }

    let total: usize = groups.iter().map(FieldGroup::width).sum();
    for ((group, placement), start) in groups.iter().zip(&placements).zip(&starts) {
        let Some(start) = start else { continue };
        let end = start + group.width();

        if end > total {
            return Err(Error::translation(
                Reason::NonContiguousColumns,
                placement.location.clone(),
                format!("columns {start}..{end} leave a gap: fields must cover columns 0..{total}"),
            ));
        }

        trace!(property = %group.property, start, end, "placed field group");
    }

    let mut ordered: Vec<_> = groups
        .drain(..)
        .zip(starts)
        .map(|(mut group, start)| {
            group.column = start.unwrap_or(0);
            (start.unwrap_or(usize::MAX), group)
        })
        .collect();
    ordered.sort_by_key(|(key, _)| *key);
    groups.extend(ordered.into_iter().map(|(_, group)| group));

    Ok(())
}

/// Converts owner-relative starts into table columns, top down.
pub(super) fn assign(groups: &mut [FieldGroup], base: usize) {
    for group in groups {
        group.column += base;

        match &mut group.kind {
            GroupKind::Single(field) => field.column = group.column,
            GroupKind::Aggregate { groups, .. } => assign(groups, group.column),
            GroupKind::Reference { fields, .. } => {
                for (i, field) in fields.iter_mut().enumerate() {
                    field.column = group.column + i;
                }
            }
            GroupKind::LocalizationKey { key, .. } => key.column = group.column,
            GroupKind::Relation { .. } => {}
        }
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
