//! Translation of described types into validated tables.
//!
//! A [`Translator`] is one translation session. It walks a type's declared
//! properties, resolves their annotations and builds the field-group tree of
//! the type's table and of every child table below it.

mod annotations;
use annotations::{Applied, Own};

mod checks;

mod columns;
use columns::Placement;

mod finalize;

use crate::builder::Config;
use indexmap::IndexMap;
use tessera_core::{
    meta::{AnnotationKind, Check, Property, PropertyTy, TypeDescriptor},
    schema::{
        Conversion, FieldDescriptor, FieldGroup, GroupKind, Nullability, StorageType, Table,
        TableKind,
    },
    stmt::Type,
    Catalog, Error, Location, Reason, Result,
};
use tracing::{debug, trace};

/// One translation session.
///
/// Key shapes are memoized for the lifetime of the session and unnamed
/// unique constraints are numbered from its counter.
pub(crate) struct Translator<'a> {
    catalog: &'a Catalog,
    config: &'a Config,

    /// Key columns of each entity, derived from metadata alone
    keys: IndexMap<String, KeyShape>,

    /// Aggregates currently being expanded
    aggregates: Vec<String>,

    unique_counter: usize,
}

/// The primary key of an entity, as seen by references to it.
#[derive(Debug, Clone)]
pub(crate) struct KeyShape {
    pub(crate) fields: Vec<FieldDescriptor>,

    /// Property path of each key field within the entity
    pub(crate) paths: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,

    /// Only what is needed to find an entity's key: references, relations and
    /// localizations are skipped and columns are not placed.
    KeyOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nest {
    Top,
    RelationElement,
    Localization,
}

/// Where in the type graph a group is being built.
#[derive(Debug, Clone)]
struct Cx<'c> {
    /// The entity being translated
    root: &'c str,

    /// Name of the table receiving the columns
    table: String,

    /// Property path of the child table within the root, for diagnostics
    base: String,

    /// Property path from the table root
    path: Vec<String>,

    mode: Mode,
    nest: Nest,

    /// The root entity is pre-defined
    predefined: bool,
}

/// Constraints collected while a table's groups are built and resolved once
/// its columns are final.
#[derive(Debug, Default)]
struct TableState {
    /// Primary key paths, in declaration order
    keys: Vec<Vec<String>>,

    /// False for localization tables, whose key is fixed
    accepts_keys: bool,

    uniques: Vec<PendingUnique>,
    checks: Vec<PendingCheck>,
}

#[derive(Debug)]
struct PendingUnique {
    path: Vec<String>,
    name: Option<String>,
    location: Location,
}

#[derive(Debug)]
struct PendingCheck {
    path: Vec<String>,
    check: Check,

    /// Path of the declaring type, against which `Compare` targets resolve
    siblings: Vec<String>,

    location: Location,
}

impl<'a> Translator<'a> {
    pub(crate) fn new(catalog: &'a Catalog, config: &'a Config) -> Self {
        Self {
            catalog,
            config,
            keys: IndexMap::new(),
            aggregates: vec![],
            unique_counter: 0,
        }
    }

    /// Translates an entity into its table, child tables included.
    pub(crate) fn translate(&mut self, name: &str) -> Result<Table> {
        let ty = self.entity(name, &Location::of_type(name))?;
        let table_name = self.table_name(ty);
        let cx = Cx::root(name, table_name.clone(), Mode::Full, ty.is_predefined());

        let mut state = TableState::new(true);
        let groups = self.type_groups(&cx, &mut state, ty, &[], true)?;

        let mut table = Table::new(table_name, name, TableKind::Entity);
        table.groups = groups;
        self.finalize(&cx, &mut table, &state)?;

        let keys = self.primary_key_paths(&table, &state, ty)?;
        table.primary_key = key_columns(&table.groups, &keys);

        if let Some(field) = table.primary_key_columns().into_iter().find(|field| field.nullable) {
            return Err(Error::translation(
                Reason::InapplicableAnnotation,
                Location::of_type(name),
                format!("key column `{}` is nullable", field.name),
            ));
        }

        debug!(
            table = %table.name,
            columns = table.width(),
            relations = table.relations().len(),
            "translated entity `{name}`"
        );
        Ok(table)
    }

    /// Key columns of an entity, computed without translating its
    /// references, so self-referencing entities resolve.
    pub(crate) fn key_shape(&mut self, name: &str) -> Result<KeyShape> {
        if let Some(shape) = self.keys.get(name) {
            return Ok(shape.clone());
        }

        let ty = self.entity(name, &Location::of_type(name))?;
        let table_name = self.table_name(ty);
        let cx = Cx::root(name, table_name.clone(), Mode::KeyOnly, ty.is_predefined());

        let outer = std::mem::take(&mut self.aggregates);
        let mut state = TableState::new(true);
        let groups = self.type_groups(&cx, &mut state, ty, &[], true);
        self.aggregates = outer;

        let mut table = Table::new(table_name, name, TableKind::Entity);
        table.groups = groups?;
        finalize::name_groups(&mut table.groups, "", &self.config.name_separator);

        let paths = self.primary_key_paths(&table, &state, ty)?;
        let fields = paths
            .iter()
            .filter_map(|path| finalize::find(&table.groups, path))
            .filter_map(FieldGroup::as_single)
            .cloned()
            .collect();

        let shape = KeyShape { fields, paths };
        trace!(entity = name, width = shape.fields.len(), "computed key shape");
        self.keys.insert(name.to_string(), shape.clone());
        Ok(shape)
    }

    fn primary_key_paths(
        &self,
        table: &Table,
        state: &TableState,
        ty: &TypeDescriptor,
    ) -> Result<Vec<Vec<String>>> {
        if !state.keys.is_empty() {
            let mut keys: Vec<Vec<String>> = vec![];
            for key in &state.keys {
                if !keys.contains(key) {
                    keys.push(key.clone());
                }
            }
            return Ok(keys);
        }

        for suffix in &self.config.key_suffixes {
            let candidate = format!("{}{suffix}", ty.name);
            let deduced = table.groups.iter().any(|group| {
                group.property == candidate && group.as_single().is_some() && !group.is_nullable()
            });

            if deduced {
                trace!(entity = %ty.name, key = %candidate, "deduced primary key");
                return Ok(vec![vec![candidate]]);
            }
        }

        let expected: Vec<_> = self
            .config
            .key_suffixes
            .iter()
            .map(|suffix| format!("`{}{suffix}`", ty.name))
            .collect();

        Err(Error::translation(
            Reason::CannotDeducePrimaryKey,
            Location::of_type(&ty.name),
            format!(
                "no field is annotated as a key and no non-nullable scalar is named {}",
                expected.join(" or ")
            ),
        ))
    }

    /// Builds and places the groups of every property of `ty`.
    fn type_groups(
        &mut self,
        cx: &Cx<'_>,
        state: &mut TableState,
        ty: &'a TypeDescriptor,
        forwards: &[Applied],
        owner: bool,
    ) -> Result<Vec<FieldGroup>> {
        let names: Vec<&str> = ty.properties.iter().map(|p| p.name.as_str()).collect();
        annotations::check_forwards(forwards, &names, &cx.location())?;

        let mut groups = vec![];
        let mut placements = vec![];

        for property in &ty.properties {
            let mut applied = annotations::forward(forwards, &property.name);
            applied.extend(Applied::declared(&property.annotations, owner));

            let cx = cx.child(&property.name);
            if let Some((group, placement)) = self.group(&cx, state, property, applied)? {
                groups.push(group);
                placements.push(placement);
            }
        }

        if cx.mode == Mode::Full {
            columns::place(&mut groups, placements)?;
        }
        Ok(groups)
    }

    /// Builds the group of one property. Returns `None` for properties
    /// skipped in key-only mode.
    fn group(
        &mut self,
        cx: &Cx<'_>,
        state: &mut TableState,
        property: &Property,
        applied: Vec<Applied>,
    ) -> Result<Option<(FieldGroup, Placement)>> {
        let at = cx.location();
        let (own, forwards) = annotations::split(applied);
        let own = Own::resolve(own, &at)?;

        let segment = match own.name() {
            Some((name, applied)) => {
                if !is_identifier(name) {
                    return Err(applied.error(
                        &at,
                        Reason::InvalidName,
                        format!("`{name}` is not a valid column name"),
                    ));
                }
                name.to_string()
            }
            None => {
                if !is_identifier(&property.name) {
                    return Err(Error::translation(
                        Reason::InvalidName,
                        at,
                        format!("`{}` is not a valid column name", property.name),
                    ));
                }
                property.name.clone()
            }
        };

        let nullability = Nullability::native(property.nullable).annotate(own.nullable());
        let calculated = own.calculated().is_some();

        let kind = match &property.ty {
            PropertyTy::Scalar(_) | PropertyTy::Enum(_) => {
                annotations::reject_paths(&forwards, &at)?;
                GroupKind::Single(self.single(cx, state, property, &own, &segment, nullability)?)
            }
            PropertyTy::Aggregate(name) => {
                self.aggregate(cx, state, name, &own, &forwards, nullability)?
            }
            PropertyTy::Reference(name) => {
                if cx.mode == Mode::KeyOnly {
                    return Ok(None);
                }
                annotations::reject_paths(&forwards, &at)?;
                self.reference(cx, name, &own, nullability)?
            }
            PropertyTy::Relation(element) => {
                if cx.mode == Mode::KeyOnly {
                    return Ok(None);
                }
                self.relation(cx, property, element, &own, forwards, &segment)?
            }
            PropertyTy::Localization(name) => {
                if cx.mode == Mode::KeyOnly {
                    return Ok(None);
                }
                self.localization(cx, name, &own, forwards, &segment, nullability)?
            }
        };

        let nullability = match kind {
            GroupKind::Relation { .. } => Nullability::NativeNonNullable,
            _ => nullability,
        };

        let group = FieldGroup {
            property: property.name.clone(),
            name: segment,
            nullability,
            calculated,
            column: 0,
            kind,
        };

        if let Some((name, _)) = own.unique() {
            state.uniques.push(PendingUnique {
                path: cx.path.clone(),
                name: name.map(str::to_string),
                location: at.clone(),
            });
        }

        let placement = Placement {
            start: own.column(),
            location: at,
        };
        Ok(Some((group, placement)))
    }

    fn single(
        &mut self,
        cx: &Cx<'_>,
        state: &mut TableState,
        property: &Property,
        own: &Own,
        segment: &str,
        nullability: Nullability,
    ) -> Result<FieldDescriptor> {
        let at = cx.location();
        let declared = self.scalar_type(&property.ty, &at)?;

        let mut conversion = Conversion::default();
        let mut effective = declared.clone();

        if let Some((name, args, applied)) = own.converter() {
            let Some(converter) = self.config.converters.construct(name, &declared, args) else {
                return Err(applied.error(
                    &at,
                    Reason::UnknownConverter,
                    format!("no data converter named `{name}`"),
                ));
            };
            let converter = converter
                .map_err(|err| applied.error(&at, Reason::InvalidConverter, err.to_string()))?;

            effective = converter.target();
            conversion.converter = Some(converter);
        }

        match (&effective, own.enum_storage()) {
            (Type::Enum(ty), storage) => {
                let storage = storage.map(|(storage, _)| storage).unwrap_or_default();
                conversion.enum_storage = Some((ty.clone(), storage));
            }
            (_, Some((_, applied))) => {
                return Err(applied.error(
                    &at,
                    Reason::InapplicableAnnotation,
                    "enum storage requires an enumeration",
                ));
            }
            _ => {}
        }

        let mut probes = vec![];
        for (check, applied) in own.checks() {
            let location = applied.location(&at);
            checks::validate(check, &effective, &location)?;

            if let Some(clause) = checks::clause(check, segment, &effective, &conversion) {
                probes.push(clause);
            }

            state.checks.push(PendingCheck {
                path: cx.path.clone(),
                check: check.clone(),
                siblings: cx.path[..cx.path.len().saturating_sub(1)].to_vec(),
                location,
            });
        }

        let max_length = checks::max_length(own.checks().map(|(check, _)| check));
        let enum_storage = conversion.enum_storage.as_ref().map(|(_, storage)| *storage);
        let storage_ty = StorageType::from_app(&effective, enum_storage, max_length);

        let mut field = FieldDescriptor::new(segment, effective, storage_ty);
        field.nullable = nullability.is_nullable();
        field.conversion = conversion;

        if let Some((value, applied)) = own.default() {
            if value.is_null() {
                if !nullability.is_nullable() {
                    return Err(applied.error(
                        &at,
                        Reason::InvalidDefault,
                        "a non-nullable field cannot default to NULL",
                    ));
                }
            } else if !value.is_a(&declared) {
                return Err(applied.error(
                    &at,
                    Reason::InvalidDefault,
                    format!("{value} is not a {declared}"),
                ));
            }

            let stored = field.conversion.apply(value.clone());
            let lookup = |column: &str| (column == segment).then(|| stored.clone());
            if let Some(probe) = probes.iter().find(|probe| !probe.admits(&lookup)) {
                return Err(applied.error(
                    &at,
                    Reason::InvalidatedDefault,
                    format!("default {value} violates `{probe}`"),
                ));
            }

            field.default = Some(stored);
        }

        if let Some(applied) = own.primary_key() {
            self.key_member(cx, state, applied, nullability)?;
            state.keys.push(cx.path.clone());
        }

        Ok(field)
    }

    fn aggregate(
        &mut self,
        cx: &Cx<'_>,
        state: &mut TableState,
        name: &str,
        own: &Own,
        forwards: &[Applied],
        nullability: Nullability,
    ) -> Result<GroupKind> {
        let at = cx.location();
        own.reject(
            &at,
            |kind| {
                matches!(
                    kind,
                    AnnotationKind::Name(_)
                        | AnnotationKind::Nullable
                        | AnnotationKind::NonNullable
                        | AnnotationKind::Column(_)
                        | AnnotationKind::PrimaryKey
                        | AnnotationKind::Unique(_)
                        | AnnotationKind::Calculated
                )
            },
            "the annotation does not apply to an aggregate; target a nested field with a path",
        )?;

        let catalog = self.catalog;
        let Some(ty) = catalog.ty(name) else {
            return Err(Error::translation(
                Reason::UnknownType,
                at,
                format!("no type named `{name}`"),
            ));
        };
        if !ty.is_aggregate() {
            return Err(Error::translation(
                Reason::InvalidTarget,
                at,
                format!("`{name}` is an entity; use a reference"),
            ));
        }
        if self.aggregates.iter().any(|open| open == name) {
            return Err(Error::translation(
                Reason::RecursiveAggregate,
                at,
                format!("`{name}` contains itself"),
            ));
        }

        self.aggregates.push(name.to_string());
        let groups = self.type_groups(cx, state, ty, forwards, false);
        self.aggregates.pop();
        let mut groups = groups?;

        if cx.mode == Mode::Full {
            let columns = groups
                .iter()
                .flat_map(FieldGroup::descriptors)
                .map(|field| field.nullable);

            if nullability.is_ambiguous(columns) {
                return Err(Error::translation(
                    Reason::AmbiguousNullability,
                    at,
                    "every nested field is already nullable",
                ));
            }
        }

        if nullability.is_nullable() {
            for group in &mut groups {
                for field in group.descriptors_mut() {
                    field.nullable = true;
                }
            }
        }

        if let Some(applied) = own.primary_key() {
            self.key_member(cx, state, applied, nullability)?;
            let mut path = cx.path.clone();
            key_leaves(&groups, &mut path, &mut state.keys)
                .map_err(|message| applied.error(&at, Reason::InapplicableAnnotation, message))?;
        }

        Ok(GroupKind::Aggregate {
            ty: name.to_string(),
            groups,
        })
    }

    fn reference(
        &mut self,
        cx: &Cx<'_>,
        name: &str,
        own: &Own,
        nullability: Nullability,
    ) -> Result<GroupKind> {
        let at = cx.location();

        if let Some(applied) = own.primary_key() {
            return Err(applied.error(
                &at,
                Reason::InapplicableAnnotation,
                "a reference cannot be part of the primary key",
            ));
        }
        own.reject(
            &at,
            |kind| {
                matches!(
                    kind,
                    AnnotationKind::Name(_)
                        | AnnotationKind::Nullable
                        | AnnotationKind::NonNullable
                        | AnnotationKind::Column(_)
                        | AnnotationKind::Unique(_)
                        | AnnotationKind::Calculated
                )
            },
            "the annotation does not apply to a reference",
        )?;

        let target = self.entity(name, &at)?;
        if cx.predefined && !target.is_predefined() {
            return Err(Error::translation(
                Reason::PreDefinedForeignData,
                at,
                format!("a pre-defined entity cannot refer to `{name}`"),
            ));
        }

        let shape = self.key_shape(name)?;
        let mut fields = shape.fields;
        for field in &mut fields {
            field.reset();
            field.nullable = nullability.is_nullable();
        }

        Ok(GroupKind::Reference {
            target: name.to_string(),
            fields,
            key_paths: shape.paths,
            predefined: target.is_predefined(),
        })
    }

    fn relation(
        &mut self,
        cx: &Cx<'_>,
        property: &Property,
        element: &PropertyTy,
        own: &Own,
        forwards: Vec<Applied>,
        segment: &str,
    ) -> Result<GroupKind> {
        let at = cx.location();

        if cx.nest != Nest::Top {
            return Err(Error::translation(
                Reason::NestedRelation,
                at,
                "a relation element or localization cannot contain a relation",
            ));
        }
        match element {
            PropertyTy::Relation(_) => {
                return Err(Error::translation(
                    Reason::NestedRelation,
                    at,
                    "relation elements cannot be relations",
                ))
            }
            PropertyTy::Localization(_) => {
                return Err(Error::translation(
                    Reason::NestedLocalization,
                    at,
                    "relation elements cannot be localizations",
                ))
            }
            _ => {}
        }

        let scalar_element = matches!(element, PropertyTy::Scalar(_) | PropertyTy::Enum(_));

        // Annotations without a path describe the child table or, for scalar
        // elements, the element column.
        let mut element_applied: Vec<Applied> = forwards.into_iter().map(Applied::owned).collect();
        for applied in own.iter() {
            match applied.kind {
                AnnotationKind::Name(_) => {}
                AnnotationKind::Default(_)
                | AnnotationKind::Check(_)
                | AnnotationKind::Converter { .. }
                | AnnotationKind::EnumStorage(_)
                    if scalar_element =>
                {
                    element_applied.push(applied.clone().owned());
                }
                _ => {
                    return Err(applied.error(
                        &at,
                        Reason::InapplicableAnnotation,
                        "the annotation does not apply to a relation",
                    ))
                }
            }
        }

        let owner = self.key_shape(cx.root)?;
        let owner_predefined = cx.predefined;

        let child = Cx {
            root: cx.root,
            table: finalize::join(&cx.table, segment, &self.config.name_separator),
            base: cx.location().property().to_string(),
            path: vec![],
            mode: Mode::Full,
            nest: Nest::RelationElement,
            predefined: cx.predefined,
        };

        let mut state = TableState::new(true);

        let mut owner_fields = owner.fields;
        for field in &mut owner_fields {
            field.reset();
            field.nullable = false;
        }
        let owner_width = owner_fields.len();
        let owner_group = FieldGroup {
            property: cx.root.to_string(),
            name: cx.root.to_string(),
            nullability: Nullability::NativeNonNullable,
            calculated: false,
            column: 0,
            kind: GroupKind::Reference {
                target: cx.root.to_string(),
                fields: owner_fields,
                key_paths: owner.paths,
                predefined: owner_predefined,
            },
        };

        let item = Property::new("Item", element.clone());
        let outer = std::mem::take(&mut self.aggregates);
        let element_group = self.group(&child.child("Item"), &mut state, &item, element_applied);
        self.aggregates = outer;

        let Some((mut element_group, element_placement)) = element_group? else {
            return Err(Error::translation(
                Reason::UnsupportedType,
                at,
                format!("`{element}` cannot be a relation element"),
            ));
        };
        if !scalar_element && !matches!(element, PropertyTy::Reference(_)) {
            element_group.name = String::new();
        }

        let mut groups = vec![owner_group, element_group];
        let placements = vec![
            Placement {
                start: None,
                location: at.clone(),
            },
            Placement {
                start: None,
                location: element_placement.location,
            },
        ];
        columns::place(&mut groups, placements)?;

        let mut table = Table::new(child.table.clone(), &property.name, TableKind::Relation);
        table.groups = groups;
        self.finalize(&child, &mut table, &state)?;

        table.primary_key = if state.keys.is_empty() {
            (0..table.width()).collect()
        } else {
            let mut keys: Vec<usize> = (0..owner_width).collect();
            keys.extend(key_columns(&table.groups, &state.keys));
            keys
        };

        debug!(table = %table.name, columns = table.width(), "translated relation");
        Ok(GroupKind::Relation {
            element: element.clone(),
            table: Box::new(table),
        })
    }

    fn localization(
        &mut self,
        cx: &Cx<'_>,
        name: &str,
        own: &Own,
        forwards: Vec<Applied>,
        segment: &str,
        nullability: Nullability,
    ) -> Result<GroupKind> {
        let at = cx.location();

        if cx.nest != Nest::Top {
            return Err(Error::translation(
                Reason::NestedLocalization,
                at,
                "a relation element or localization cannot contain a localization",
            ));
        }
        own.reject(
            &at,
            |kind| {
                matches!(
                    kind,
                    AnnotationKind::Name(_)
                        | AnnotationKind::Nullable
                        | AnnotationKind::NonNullable
                        | AnnotationKind::Column(_)
                )
            },
            "the annotation does not apply to a localization",
        )?;

        let catalog = self.catalog;
        match catalog.ty(name) {
            Some(ty) if ty.is_aggregate() => {}
            Some(_) => {
                return Err(Error::translation(
                    Reason::InvalidTarget,
                    at,
                    format!("localized type `{name}` must be an aggregate"),
                ))
            }
            None => {
                return Err(Error::translation(
                    Reason::UnknownType,
                    at,
                    format!("no type named `{name}`"),
                ))
            }
        }

        let child = Cx {
            root: cx.root,
            table: finalize::join(&cx.table, segment, &self.config.name_separator),
            base: at.property().to_string(),
            path: vec![],
            mode: Mode::Full,
            nest: Nest::Localization,
            predefined: cx.predefined,
        };

        let mut state = TableState::new(false);

        let key = Property::scalar("Key", Type::Uuid);
        let locale = Property::scalar("Locale", Type::String);
        let value = Property::aggregate("Value", name);

        let mut groups = vec![];
        let mut placements = vec![];
        for (property, applied) in [(&key, vec![]), (&locale, vec![]), (&value, forwards)] {
            if let Some((group, placement)) =
                self.group(&child.child(&property.name), &mut state, property, applied)?
            {
                groups.push(group);
                placements.push(Placement {
                    start: None,
                    location: placement.location,
                });
            }
        }
        if let Some(group) = groups.last_mut() {
            group.name = String::new();
        }
        columns::place(&mut groups, placements)?;

        let mut table = Table::new(child.table.clone(), name, TableKind::Localization);
        table.groups = groups;
        self.finalize(&child, &mut table, &state)?;
        table.primary_key = vec![0, 1];

        let mut key = FieldDescriptor::new(segment, Type::Uuid, StorageType::Uuid);
        key.nullable = nullability.is_nullable();

        debug!(table = %table.name, columns = table.width(), "translated localization");
        Ok(GroupKind::LocalizationKey {
            key,
            ty: name.to_string(),
            table: Box::new(table),
        })
    }

    /// Validates a primary key annotation on the current property.
    fn key_member(
        &self,
        cx: &Cx<'_>,
        state: &TableState,
        applied: &Applied,
        nullability: Nullability,
    ) -> Result<()> {
        let at = cx.location();

        if !applied.owner || !state.accepts_keys {
            return Err(applied.error(
                &at,
                Reason::InapplicableAnnotation,
                "primary keys are declared by the entity or the relation",
            ));
        }
        if nullability.is_nullable() {
            return Err(applied.error(
                &at,
                Reason::InapplicableAnnotation,
                "a key field cannot be nullable",
            ));
        }
        Ok(())
    }

    fn entity(&self, name: &str, at: &Location) -> Result<&'a TypeDescriptor> {
        let catalog = self.catalog;
        match catalog.ty(name) {
            Some(ty) if ty.is_entity() => Ok(ty),
            Some(_) => Err(Error::translation(
                Reason::InvalidTarget,
                at.clone(),
                format!("`{name}` is not an entity"),
            )),
            None => Err(Error::translation(
                Reason::UnknownType,
                at.clone(),
                format!("no type named `{name}`"),
            )),
        }
    }

    fn scalar_type(&self, ty: &PropertyTy, at: &Location) -> Result<Type> {
        match ty {
            PropertyTy::Scalar(ty) => Ok(ty.clone()),
            PropertyTy::Enum(name) => match self.catalog.enumeration(name) {
                Some(ty) => Ok(Type::Enum(ty.clone())),
                None => Err(Error::translation(
                    Reason::UnknownType,
                    at.clone(),
                    format!("no enumeration named `{name}`"),
                )),
            },
            other => Err(Error::translation(
                Reason::UnsupportedType,
                at.clone(),
                format!("`{other}` is not a scalar type"),
            )),
        }
    }

    fn table_name(&self, ty: &TypeDescriptor) -> String {
        let name = ty.table_name.as_deref().unwrap_or(&ty.name);
        match &self.config.table_name_prefix {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }
}

impl<'c> Cx<'c> {
    fn root(root: &'c str, table: String, mode: Mode, predefined: bool) -> Self {
        Self {
            root,
            table,
            base: String::new(),
            path: vec![],
            mode,
            nest: Nest::Top,
            predefined,
        }
    }

    fn child(&self, segment: &str) -> Self {
        let mut child = self.clone();
        child.path.push(segment.to_string());
        child
    }

    fn location(&self) -> Location {
        let mut location = Location::new(self.root, self.base.as_str());
        for segment in &self.path {
            location = location.child(segment);
        }
        location
    }
}

impl TableState {
    fn new(accepts_keys: bool) -> Self {
        Self {
            accepts_keys,
            ..Self::default()
        }
    }
}

/// Paths of every scalar leaf of an aggregate marked as a key.
fn key_leaves(
    groups: &[FieldGroup],
    path: &mut Vec<String>,
    keys: &mut Vec<Vec<String>>,
) -> core::result::Result<(), String> {
    for group in groups {
        path.push(group.property.clone());
        match &group.kind {
            GroupKind::Single(_) if group.is_nullable() => {
                return Err(format!("key field `{}` is nullable", path.join(".")));
            }
            GroupKind::Single(_) => keys.push(path.clone()),
            GroupKind::Aggregate { groups, .. } => key_leaves(groups, path, keys)?,
            GroupKind::Relation { .. } => {}
            GroupKind::Reference { .. } | GroupKind::LocalizationKey { .. } => {
                return Err(format!(
                    "key field `{}` is not a scalar field",
                    path.join(".")
                ));
            }
        }
        path.pop();
    }
    Ok(())
}

fn key_columns(groups: &[FieldGroup], keys: &[Vec<String>]) -> Vec<usize> {
    keys.iter()
        .filter_map(|path| finalize::find(groups, path))
        .filter_map(FieldGroup::as_single)
        .map(|field| field.column)
        .collect()
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
