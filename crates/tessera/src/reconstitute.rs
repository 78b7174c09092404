//! Reconstitution: rows back to instances.
//!
//! A [`ReconstitutionPlan`] is compiled once per entity type. Binding it to
//! candidate [`Domains`] yields a [`Reconstitutor`], which owns the key
//! matchers resolving references and rows of pre-defined entities.

mod compile;

use crate::key_matcher::{Domains, Generator, KeyMatcher};
use indexmap::IndexMap;
use std::{
    ops::Range,
    sync::{Arc, Mutex, PoisonError},
};
use tessera_core::{
    meta::{Compute, Constructor},
    object::{Element, Localized, Record},
    schema::Conversion,
    stmt::{Type, Value},
    err, Error, Location, Object, Reason, Result,
};
use tracing::debug;

/// Rows of child tables, keyed by the dotted property path of the relation
/// or localization they belong to.
pub type ChildRows = IndexMap<String, Vec<Vec<Value>>>;

/// Compiled reconstitution of one entity type.
#[derive(Debug)]
pub struct ReconstitutionPlan {
    ty: String,

    /// Built fresh, or looked up among the known instances of a pre-defined
    /// entity
    root: Creator,

    /// Width of an owner row
    width: usize,

    /// Columns of the owner key
    key: Vec<usize>,

    /// One key matcher per referenced entity type
    lookups: Vec<LookupTarget>,
}

#[derive(Debug)]
struct LookupTarget {
    target: String,
    key_paths: Vec<Vec<String>>,
    conversions: Vec<Conversion>,

    /// Known instances of a pre-defined target
    instances: Option<Vec<Arc<Record>>>,
}

/// Produces the value of one property from a slice of a row.
#[derive(Debug)]
enum Creator {
    Value {
        column: usize,
        conversion: Conversion,

        /// The property's declared type, checked after reverting
        ty: Type,
    },

    Construct(Box<Construct>),

    /// An entity resolved through a key matcher
    Lookup {
        columns: Vec<usize>,
        slot: usize,
        nullable: bool,
    },

    /// A relation collection repopulated from child rows
    Collection {
        path: String,
        width: usize,
        owner_width: usize,
        element: Box<Creator>,
    },

    Localization {
        column: usize,
        path: String,
        width: usize,
        fields: Box<Construct>,
    },
}

/// Creates a record, then mutates it.
#[derive(Debug)]
struct Construct {
    ty: String,

    /// Columns covered by the record, tested for all-NULL
    columns: Range<usize>,

    nullable: bool,

    constructor: Constructor,

    /// Property receiving each argument, for memberwise construction
    params: Vec<String>,

    args: Vec<Creator>,

    /// Settable properties not passed to the constructor
    mutators: Vec<(String, Creator)>,

    /// Recomputed once every other property is set
    computed: Vec<(String, Compute)>,
}

/// A compiled plan bound to its candidate domains.
///
/// Key matchers are shared by every row reconstituted through the same
/// reconstitutor, each guarded by its own lock.
#[derive(Debug)]
pub struct Reconstitutor {
    plan: Arc<ReconstitutionPlan>,
    matchers: Vec<Mutex<KeyMatcher>>,
}

struct Run<'a> {
    row: &'a [Value],
    children: &'a ChildRows,
    owner_key: &'a [Value],
    matchers: &'a [Mutex<KeyMatcher>],
}

impl ReconstitutionPlan {
    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Entity types whose instances must be supplied to reconstitute
    /// references.
    pub fn required_domains(&self) -> impl Iterator<Item = &str> + '_ {
        self.lookups
            .iter()
            .filter(|lookup| lookup.instances.is_none())
            .map(|lookup| lookup.target.as_str())
    }
}

impl Reconstitutor {
    /// Binds `plan` to `domains`. Every referenced entity that is not
    /// pre-defined needs a domain.
    pub fn new(
        plan: Arc<ReconstitutionPlan>,
        domains: &Domains,
        limit: Option<usize>,
    ) -> Result<Self> {
        let mut matchers = Vec::with_capacity(plan.lookups.len());

        for lookup in &plan.lookups {
            let generator: Generator = match (&lookup.instances, domains.get(&lookup.target)) {
                (Some(instances), _) => {
                    let instances = instances.clone();
                    Arc::new(move || Box::new(instances.clone().into_iter()))
                }
                (None, Some(generator)) => generator.clone(),
                (None, None) => {
                    return Err(Error::translation(
                        Reason::MissingDomain,
                        Location::of_type(&plan.ty),
                        format!("no candidate domain for referenced entity `{}`", lookup.target),
                    ))
                }
            };

            let matcher = KeyMatcher::new(
                &lookup.target,
                lookup.key_paths.clone(),
                lookup.conversions.clone(),
                generator,
            )
            .limit(limit);
            matchers.push(Mutex::new(matcher));
        }

        debug!(entity = %plan.ty, matchers = matchers.len(), "bound reconstitution plan");
        Ok(Self { plan, matchers })
    }

    pub fn plan(&self) -> &ReconstitutionPlan {
        &self.plan
    }

    /// Reconstitutes an owner row with no child rows: relations come back
    /// empty.
    pub fn execute(&self, row: &[Value]) -> Result<Object> {
        self.execute_with(row, &ChildRows::new())
    }

    pub fn execute_with(&self, row: &[Value], children: &ChildRows) -> Result<Object> {
        if row.len() != self.plan.width {
            return Err(Error::invalid_row(self.plan.width, row.len()));
        }

        let owner_key: Vec<Value> = self
            .plan
            .key
            .iter()
            .map(|column| row[*column].clone())
            .collect();

        let run = Run {
            row,
            children,
            owner_key: &owner_key,
            matchers: &self.matchers,
        };
        run.create(&self.plan.root)
    }

    /// Candidates materialized by the key matcher of `target`.
    pub fn materialized(&self, target: &str) -> Option<usize> {
        self.plan
            .lookups
            .iter()
            .position(|lookup| lookup.target == target)
            .map(|slot| {
                self.matchers[slot]
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .materialized()
            })
    }
}

impl Run<'_> {
    fn create(&self, creator: &Creator) -> Result<Object> {
        match creator {
            Creator::Value {
                column,
                conversion,
                ty,
            } => {
                let value = conversion.revert(self.row[*column].clone())?;
                if !value.is_null() && !value.is_a(ty) {
                    return Err(Error::type_conversion(value, ty.to_string()));
                }
                Ok(Object::from(value))
            }
            Creator::Construct(construct) => self.construct(construct),
            Creator::Lookup {
                columns,
                slot,
                nullable,
            } => {
                let key: Vec<Value> = columns
                    .iter()
                    .map(|column| self.row[*column].clone())
                    .collect();
                if *nullable && key.iter().all(Value::is_null) {
                    return Ok(Object::Null);
                }

                let mut matcher = self.matchers[*slot]
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                Ok(Object::Entity(matcher.lookup(&key)?))
            }
            Creator::Collection {
                path,
                width,
                owner_width,
                element,
            } => {
                let mut elements = vec![];

                for row in self.children.get(path).into_iter().flatten() {
                    if row.len() != *width {
                        return Err(Error::invalid_row(*width, row.len()));
                    }
                    if row[..*owner_width] != *self.owner_key {
                        continue;
                    }

                    let run = Run { row, ..*self };
                    elements.push(Element::saved(run.create(element)?));
                }

                Ok(Object::Collection(elements))
            }
            Creator::Localization {
                column,
                path,
                width,
                fields,
            } => {
                let key = match &self.row[*column] {
                    Value::Null => return Ok(Object::Null),
                    Value::Uuid(key) => *key,
                    other => return Err(Error::type_conversion(other.clone(), "uuid")),
                };

                let mut localized = Localized::new(key);
                for row in self.children.get(path).into_iter().flatten() {
                    if row.len() != *width {
                        return Err(Error::invalid_row(*width, row.len()));
                    }
                    if row[0] != Value::Uuid(key) {
                        continue;
                    }

                    let locale = match &row[1] {
                        Value::String(locale) => locale.clone(),
                        other => return Err(Error::type_conversion(other.clone(), "String")),
                    };

                    let run = Run { row, ..*self };
                    if let Object::Record(record) = run.construct(fields)? {
                        localized.entries.insert(locale, record);
                    }
                }

                Ok(Object::Localized(localized))
            }
        }
    }

    fn construct(&self, construct: &Construct) -> Result<Object> {
        if construct.nullable && self.row[construct.columns.clone()].iter().all(Value::is_null) {
            return Ok(Object::Null);
        }

        let args = construct
            .args
            .iter()
            .map(|arg| self.create(arg))
            .collect::<Result<Vec<_>>>()?;

        let mut record = match &construct.constructor.factory {
            Some(factory) => factory.call(args).map_err(|err| {
                Error::from(err).context(err!("constructing `{}`", construct.ty))
            })?,
            None => {
                let mut record = Record::new(&construct.ty);
                for (property, arg) in construct.params.iter().zip(args) {
                    record.set(property, arg);
                }
                record
            }
        };

        for (property, creator) in &construct.mutators {
            record.set(property, self.create(creator)?);
        }

        for (property, compute) in &construct.computed {
            let value = compute.call(&record);
            record.set(property, value);
        }

        Ok(Object::Record(record))
    }
}
