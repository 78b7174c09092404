use super::{Construct, Creator, LookupTarget, ReconstitutionPlan};
use heck::ToSnakeCase;
use std::ops::Range;
use tessera_core::{
    meta::{Constructor, PropertyTy, TypeDescriptor},
    schema::{FieldDescriptor, FieldGroup, GroupKind, Table},
    stmt::Type,
    Catalog, Error, Location, Reason, Result,
};
use tracing::trace;

impl ReconstitutionPlan {
    /// Compiles the reconstitution of an entity table.
    ///
    /// Constructor selection happens here, so a type that cannot be
    /// reconstituted is rejected before any row is read.
    pub fn compile(catalog: &Catalog, table: &Table) -> Result<ReconstitutionPlan> {
        let mut compiler = Compiler {
            catalog,
            lookups: vec![],
        };

        let predefined = catalog
            .ty(&table.type_name)
            .is_some_and(TypeDescriptor::is_predefined);

        // Rows of a pre-defined entity resolve to its known instances.
        let root = if predefined {
            compiler.predefined_root(table)?
        } else {
            Creator::Construct(Box::new(compiler.construct(
                &table.type_name,
                &table.groups,
                0..table.width(),
                false,
                &mut vec![],
            )?))
        };

        Ok(ReconstitutionPlan {
            ty: table.type_name.clone(),
            root,
            width: table.width(),
            key: table.primary_key.clone(),
            lookups: compiler.lookups,
        })
    }
}

struct Compiler<'a> {
    catalog: &'a Catalog,
    lookups: Vec<LookupTarget>,
}

/// A group that can feed a constructor parameter or a mutator.
struct Candidate<'g> {
    group: &'g FieldGroup,
    ty: Option<PropertyTy>,
    settable: bool,
}

impl Compiler<'_> {
    fn construct(
        &mut self,
        ty: &str,
        groups: &[FieldGroup],
        columns: Range<usize>,
        nullable: bool,
        path: &mut Vec<String>,
    ) -> Result<Construct> {
        let catalog = self.catalog;
        let Some(descriptor) = catalog.ty(ty) else {
            return Err(Error::translation(
                Reason::UnknownType,
                Location::of_type(ty),
                format!("no type named `{ty}`"),
            ));
        };

        let candidates: Vec<Candidate<'_>> = groups
            .iter()
            .filter(|group| !group.calculated)
            .map(|group| {
                let property = descriptor.property_named(&group.property);
                Candidate {
                    group,
                    ty: property.map(|property| property.ty.clone()),
                    settable: property.map_or(true, |property| property.settable),
                }
            })
            .collect();

        let (constructor, consumed) = select(descriptor, &candidates)?;

        let mut params = vec![];
        let mut args = vec![];
        for index in &consumed {
            let candidate = &candidates[*index];
            params.push(candidate.group.property.clone());
            args.push(self.creator(candidate.group, candidate.ty.as_ref(), path)?);
        }

        let mut mutators = vec![];
        for (index, candidate) in candidates.iter().enumerate() {
            if consumed.contains(&index) {
                continue;
            }
            if !candidate.settable {
                return Err(Error::translation(
                    Reason::UnreconstitutableProperty,
                    Location::new(ty, candidate.group.property.as_str()),
                    "the property is read-only and no selected constructor takes it",
                ));
            }

            let creator = self.creator(candidate.group, candidate.ty.as_ref(), path)?;
            mutators.push((candidate.group.property.clone(), creator));
        }

        let computed = descriptor
            .properties
            .iter()
            .filter_map(|property| Some((property.name.clone(), property.compute.clone()?)))
            .collect();

        trace!(
            ty,
            arity = constructor.arity(),
            mutators = mutators.len(),
            "selected constructor"
        );

        Ok(Construct {
            ty: ty.to_string(),
            columns,
            nullable,
            constructor,
            params,
            args,
            mutators,
            computed,
        })
    }

    fn creator(
        &mut self,
        group: &FieldGroup,
        declared: Option<&PropertyTy>,
        path: &mut Vec<String>,
    ) -> Result<Creator> {
        path.push(group.property.clone());
        let creator = self.creator_inner(group, declared, path);
        path.pop();
        creator
    }

    fn creator_inner(
        &mut self,
        group: &FieldGroup,
        declared: Option<&PropertyTy>,
        path: &mut Vec<String>,
    ) -> Result<Creator> {
        Ok(match &group.kind {
            GroupKind::Single(field) => Creator::Value {
                column: field.column,
                conversion: field.conversion.clone(),
                ty: self.declared_type(declared).unwrap_or_else(|| field.ty.clone()),
            },
            GroupKind::Aggregate { ty, groups } => Creator::Construct(Box::new(self.construct(
                ty,
                groups,
                group.columns(),
                group.is_nullable(),
                path,
            )?)),
            GroupKind::Reference {
                target,
                fields,
                key_paths,
                predefined,
            } => {
                let slot = self.lookup_slot(target, fields, key_paths, *predefined);
                Creator::Lookup {
                    columns: group.columns().collect(),
                    slot,
                    nullable: group.is_nullable(),
                }
            }
            GroupKind::Relation { element, table } => {
                let Some(item) = table.groups.iter().find(|group| group.property == "Item") else {
                    return Err(Error::translation(
                        Reason::UnreconstitutableProperty,
                        Location::of_type(&table.type_name),
                        format!("relation table `{}` has no element columns", table.name),
                    ));
                };

                let element = self.creator(item, Some(element), &mut vec![])?;
                Creator::Collection {
                    path: path.join("."),
                    width: table.width(),
                    owner_width: table.width() - item.width(),
                    element: Box::new(element),
                }
            }
            GroupKind::LocalizationKey { key, ty, table } => {
                let Some(fields) = table.groups.iter().find(|group| group.property == "Value")
                else {
                    return Err(Error::translation(
                        Reason::UnreconstitutableProperty,
                        Location::of_type(ty),
                        format!("localization table `{}` has no value columns", table.name),
                    ));
                };

                let fields =
                    self.construct(ty, fields.nested(), fields.columns(), false, &mut vec![])?;
                Creator::Localization {
                    column: key.column,
                    path: path.join("."),
                    width: table.width(),
                    fields: Box::new(fields),
                }
            }
        })
    }

    fn predefined_root(&mut self, table: &Table) -> Result<Creator> {
        let mut leaves = vec![];
        key_leaves(&table.groups, &mut vec![], &mut leaves);

        let mut fields = vec![];
        let mut key_paths = vec![];
        for column in &table.primary_key {
            let Some((field, path)) = leaves.iter().find(|(field, _)| field.column == *column)
            else {
                return Err(Error::translation(
                    Reason::UnreconstitutableProperty,
                    Location::of_type(&table.type_name),
                    format!("primary key column {column} is not a scalar field"),
                ));
            };
            fields.push((*field).clone());
            key_paths.push(path.clone());
        }

        let slot = self.lookup_slot(&table.type_name, &fields, &key_paths, true);
        Ok(Creator::Lookup {
            columns: table.primary_key.clone(),
            slot,
            nullable: false,
        })
    }

    fn declared_type(&self, declared: Option<&PropertyTy>) -> Option<Type> {
        match declared? {
            PropertyTy::Scalar(ty) => Some(ty.clone()),
            PropertyTy::Enum(name) => self.catalog.enumeration(name).cloned().map(Type::Enum),
            _ => None,
        }
    }

    fn lookup_slot(
        &mut self,
        target: &str,
        fields: &[FieldDescriptor],
        key_paths: &[Vec<String>],
        predefined: bool,
    ) -> usize {
        if let Some(slot) = self.lookups.iter().position(|lookup| lookup.target == target) {
            return slot;
        }

        let instances = predefined
            .then(|| self.catalog.ty(target).map(|ty| ty.instances().to_vec()))
            .flatten();

        self.lookups.push(LookupTarget {
            target: target.to_string(),
            key_paths: key_paths.to_vec(),
            conversions: fields.iter().map(|field| field.conversion.clone()).collect(),
            instances,
        });
        self.lookups.len() - 1
    }
}

/// Scalar fields under `groups`, with their property paths.
fn key_leaves<'g>(
    groups: &'g [FieldGroup],
    path: &mut Vec<String>,
    out: &mut Vec<(&'g FieldDescriptor, Vec<String>)>,
) {
    for group in groups {
        path.push(group.property.clone());
        match &group.kind {
            GroupKind::Single(field) => out.push((field, path.clone())),
            GroupKind::Aggregate { groups, .. } => key_leaves(groups, path, out),
            _ => {}
        }
        path.pop();
    }
}

/// Picks the constructor reconstitution goes through and the candidates it
/// consumes, in parameter order.
fn select(
    descriptor: &TypeDescriptor,
    candidates: &[Candidate<'_>],
) -> Result<(Constructor, Vec<usize>)> {
    let declared;
    let constructors: &[Constructor] = if descriptor.constructors.is_empty() {
        declared = [Constructor::default_constructor()];
        &declared
    } else {
        &descriptor.constructors
    };

    let at = Location::of_type(&descriptor.name);

    if let Some(names) = &descriptor.reconstitute_through {
        let mut viable = constructors.iter().filter(|constructor| {
            constructor.params.len() == names.len()
                && constructor
                    .params
                    .iter()
                    .zip(names)
                    .all(|(param, name)| same_name(&param.name, name))
        });

        let chosen = viable
            .by_ref()
            .find_map(|constructor| Some((constructor, bind(constructor, candidates)?)));
        let Some((constructor, consumed)) = chosen else {
            return Err(Error::translation(
                Reason::NoViableConstructor,
                at,
                format!("no usable constructor takes ({})", names.join(", ")),
            ));
        };

        if viable.any(|other| bind(other, candidates).is_some()) {
            return Err(Error::translation(
                Reason::AmbiguousConstructor,
                at,
                format!("several constructors take ({})", names.join(", ")),
            ));
        }

        return Ok((constructor.clone(), consumed));
    }

    let mut best: Option<(&Constructor, Vec<usize>)> = None;
    let mut tied = false;

    for constructor in constructors {
        let Some(consumed) = bind(constructor, candidates) else {
            continue;
        };

        match &best {
            Some((chosen, _)) if chosen.arity() > constructor.arity() => {}
            Some((chosen, _)) if chosen.arity() == constructor.arity() => tied = true,
            _ => {
                best = Some((constructor, consumed));
                tied = false;
            }
        }
    }

    match best {
        Some(_) if tied => Err(Error::translation(
            Reason::AmbiguousConstructor,
            at,
            "several constructors of the highest arity are usable",
        )),
        Some((constructor, consumed)) => Ok((constructor.clone(), consumed)),
        None => Err(Error::translation(
            Reason::NoViableConstructor,
            at,
            "no constructor's parameters can all be satisfied by the stored fields",
        )),
    }
}

/// Matches every parameter to a distinct candidate of the same name and
/// declared type.
fn bind(constructor: &Constructor, candidates: &[Candidate<'_>]) -> Option<Vec<usize>> {
    let mut consumed: Vec<usize> = vec![];

    for param in &constructor.params {
        let index = candidates.iter().enumerate().position(|(index, candidate)| {
            !consumed.contains(&index)
                && same_name(&candidate.group.property, &param.name)
                && candidate.ty.as_ref() == Some(&param.ty)
        })?;
        consumed.push(index);
    }

    Some(consumed)
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_snake_case() == b.to_snake_case()
}
