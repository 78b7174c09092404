//! Extraction: instances to rows.
//!
//! An [`ExtractionPlan`] mirrors a table's field-group tree. Executing it on
//! an instance yields the owner row plus the rows of every child table.

use crate::reconstitute::ChildRows;
use indexmap::IndexMap;
use tessera_core::{
    meta::Compute,
    object::{Record, Status},
    schema::{Conversion, FieldGroup, GroupKind, Table},
    stmt::Value,
    Catalog, Object,
};
use tracing::{trace, warn};

static NULL: Object = Object::Null;

/// Compiled extraction of one entity type.
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    root: Extractor,

    /// Columns of the owner key, copied into every child row
    key: Vec<usize>,

    relations: Vec<ChildPlan>,
    localizations: Vec<ChildPlan>,
}

/// The rows produced from one instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    /// The owner row, in column order
    pub values: Vec<Value>,

    /// Relation rows, keyed by the relation's dotted property path
    pub relations: IndexMap<String, RelationRows>,

    /// Localization rows, keyed by the localization's dotted property path
    pub localizations: IndexMap<String, Vec<Vec<Value>>>,
}

/// Child rows of one relation, partitioned by element status.
///
/// Rows are `[owner key.., element values..]`. Saved elements appear in none
/// of the partitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationRows {
    pub insertions: Vec<Vec<Value>>,
    pub modifications: Vec<Vec<Value>>,
    pub deletions: Vec<Vec<Value>>,
}

#[derive(Debug, Clone)]
struct ChildPlan {
    /// Dotted property path within the entity
    path: String,

    /// Element extractor for relations, localized fields for localizations
    extractor: Extractor,
}

#[derive(Debug, Clone)]
enum Extractor {
    /// One scalar column
    Field(Conversion),

    /// Members in column order
    Composite(Vec<Member>),

    /// The key columns of the referenced entity
    Reference {
        key_paths: Vec<Vec<String>>,
        conversions: Vec<Conversion>,
    },

    /// The key of a localized sub-record
    LocalizationKey,
}

#[derive(Debug, Clone)]
struct Member {
    property: String,
    compute: Option<Compute>,
    extractor: Extractor,
}

impl ExtractionPlan {
    pub fn compile(catalog: &Catalog, table: &Table) -> ExtractionPlan {
        let root = Extractor::Composite(members(catalog, Some(&table.type_name), &table.groups));

        let relations = table
            .relations()
            .into_iter()
            .filter_map(|(path, child)| {
                let element = child.groups.iter().find(|group| group.property == "Item")?;
                Some(ChildPlan {
                    path,
                    extractor: Extractor::compile(catalog, element),
                })
            })
            .collect();

        let localizations = table
            .localizations()
            .into_iter()
            .filter_map(|(path, child)| {
                let fields = child.groups.iter().find(|group| group.property == "Value")?;
                Some(ChildPlan {
                    path,
                    extractor: Extractor::compile(catalog, fields),
                })
            })
            .collect();

        ExtractionPlan {
            root,
            key: table.primary_key.clone(),
            relations,
            localizations,
        }
    }

    /// Number of values in the owner row.
    pub fn width(&self) -> usize {
        self.root.width()
    }

    /// Extracts an instance. A null instance yields a row of NULLs and no
    /// child rows.
    pub fn execute(&self, instance: &Object) -> Extracted {
        let mut values = Vec::with_capacity(self.width());
        self.root.extract(instance, &mut values);

        let mut extracted = Extracted {
            values,
            ..Extracted::default()
        };

        if instance.is_null() {
            return extracted;
        }

        let owner_key: Vec<Value> = self
            .key
            .iter()
            .filter_map(|column| extracted.values.get(*column).cloned())
            .collect();

        for plan in &self.relations {
            let mut rows = RelationRows::default();
            let segments: Vec<&str> = plan.path.split('.').collect();

            if let Some(elements) = instance.get_path(&segments).and_then(Object::as_collection) {
                for element in elements {
                    let partition = match element.status {
                        Status::New => &mut rows.insertions,
                        Status::Modified => &mut rows.modifications,
                        Status::Deleted => &mut rows.deletions,
                        Status::Saved => continue,
                    };

                    let mut row = owner_key.clone();
                    plan.extractor.extract(&element.value, &mut row);
                    partition.push(row);
                }
            }

            trace!(
                relation = %plan.path,
                insertions = rows.insertions.len(),
                modifications = rows.modifications.len(),
                deletions = rows.deletions.len(),
                "extracted relation"
            );
            extracted.relations.insert(plan.path.clone(), rows);
        }

        for plan in &self.localizations {
            let mut rows = vec![];
            let segments: Vec<&str> = plan.path.split('.').collect();

            if let Some(localized) = instance.get_path(&segments).and_then(Object::as_localized) {
                for (locale, record) in &localized.entries {
                    let mut row = vec![Value::Uuid(localized.key), Value::String(locale.clone())];
                    plan.extractor.extract_record(record, &mut row);
                    rows.push(row);
                }
            }

            extracted.localizations.insert(plan.path.clone(), rows);
        }

        extracted
    }
}

impl Extracted {
    /// The rows a store would hold for this instance: insertions and
    /// modifications of every relation, and every localization row.
    pub fn child_rows(&self) -> ChildRows {
        let mut rows = ChildRows::new();

        for (path, relation) in &self.relations {
            rows.insert(
                path.clone(),
                relation
                    .insertions
                    .iter()
                    .chain(&relation.modifications)
                    .cloned()
                    .collect(),
            );
        }

        for (path, localization) in &self.localizations {
            rows.insert(path.clone(), localization.clone());
        }

        rows
    }
}

impl Extractor {
    fn compile(catalog: &Catalog, group: &FieldGroup) -> Extractor {
        match &group.kind {
            GroupKind::Single(field) => Extractor::Field(field.conversion.clone()),
            GroupKind::Aggregate { ty, groups } => {
                Extractor::Composite(members(catalog, Some(ty), groups))
            }
            GroupKind::Reference {
                fields, key_paths, ..
            } => Extractor::Reference {
                key_paths: key_paths.clone(),
                conversions: fields.iter().map(|field| field.conversion.clone()).collect(),
            },
            GroupKind::LocalizationKey { .. } => Extractor::LocalizationKey,
            GroupKind::Relation { .. } => Extractor::Composite(vec![]),
        }
    }

    fn width(&self) -> usize {
        match self {
            Extractor::Field(_) | Extractor::LocalizationKey => 1,
            Extractor::Composite(members) => {
                members.iter().map(|member| member.extractor.width()).sum()
            }
            Extractor::Reference { key_paths, .. } => key_paths.len(),
        }
    }

    fn extract(&self, object: &Object, out: &mut Vec<Value>) {
        if object.is_null() {
            out.extend(std::iter::repeat(Value::Null).take(self.width()));
            return;
        }

        match self {
            Extractor::Field(conversion) => match object {
                Object::Value(value) => out.push(conversion.apply(value.clone())),
                other => {
                    warn!(?other, "expected a scalar value; extracting NULL");
                    out.push(Value::Null);
                }
            },
            Extractor::Composite(_) => match object.as_record() {
                Some(record) => self.extract_record(record, out),
                None => {
                    warn!(?object, "expected a record; extracting NULLs");
                    out.extend(std::iter::repeat(Value::Null).take(self.width()));
                }
            },
            Extractor::Reference {
                key_paths,
                conversions,
            } => {
                for (path, conversion) in key_paths.iter().zip(conversions) {
                    let value = object
                        .get_path(path)
                        .and_then(|key| key.clone().into_value())
                        .unwrap_or(Value::Null);
                    out.push(conversion.apply(value));
                }
            }
            Extractor::LocalizationKey => match object.as_localized() {
                Some(localized) => out.push(Value::Uuid(localized.key)),
                None => {
                    warn!(?object, "expected a localization; extracting NULL");
                    out.push(Value::Null);
                }
            },
        }
    }

    fn extract_record(&self, record: &Record, out: &mut Vec<Value>) {
        let Extractor::Composite(members) = self else {
            self.extract(&Object::Record(record.clone()), out);
            return;
        };

        for member in members {
            let computed;
            let object = match &member.compute {
                Some(compute) => {
                    computed = compute.call(record);
                    &computed
                }
                None => record.get(&member.property).unwrap_or(&NULL),
            };
            member.extractor.extract(object, out);
        }
    }
}

/// Members of a composite: every group owning columns, in column order.
fn members(catalog: &Catalog, declaring: Option<&str>, groups: &[FieldGroup]) -> Vec<Member> {
    let ty = declaring.and_then(|name| catalog.ty(name));

    groups
        .iter()
        .filter(|group| !group.is_relation())
        .map(|group| Member {
            property: group.property.clone(),
            compute: ty
                .and_then(|ty| ty.property_named(&group.property))
                .and_then(|property| property.compute.clone()),
            extractor: Extractor::compile(catalog, group),
        })
        .collect()
}
