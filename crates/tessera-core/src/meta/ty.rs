use super::{Constructor, Property};
use crate::object::Record;
use std::sync::Arc;

/// Describes one type of the object model.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub name: String,

    pub kind: TypeKind,

    /// Declared properties in declaration order
    pub properties: Vec<Property>,

    /// Declared constructors. An empty list means the type has an implicit
    /// zero-argument constructor.
    pub constructors: Vec<Constructor>,

    /// Table name override for entities
    pub table_name: Option<String>,

    /// Parameter names of the constructor reconstitution must use
    pub reconstitute_through: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    /// A type with identity, stored in its own table
    Entity,

    /// A value type, flattened into its owner's columns
    Aggregate,

    /// An entity whose complete set of instances is known up front
    PreDefined(Vec<Arc<Record>>),
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: vec![],
            constructors: vec![],
            table_name: None,
            reconstitute_through: None,
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Entity)
    }

    pub fn aggregate(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Aggregate)
    }

    pub fn predefined(name: impl Into<String>, instances: Vec<Record>) -> Self {
        Self::new(
            name,
            TypeKind::PreDefined(instances.into_iter().map(Arc::new).collect()),
        )
    }

    pub fn property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    pub fn reconstitute_through<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reconstitute_through = Some(params.into_iter().map(Into::into).collect());
        self
    }

    pub fn property_named(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// True for both regular and pre-defined entities.
    pub fn is_entity(&self) -> bool {
        matches!(self.kind, TypeKind::Entity | TypeKind::PreDefined(_))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.kind, TypeKind::Aggregate)
    }

    pub fn is_predefined(&self) -> bool {
        matches!(self.kind, TypeKind::PreDefined(_))
    }

    pub fn instances(&self) -> &[Arc<Record>] {
        match &self.kind {
            TypeKind::PreDefined(instances) => instances,
            _ => &[],
        }
    }
}
