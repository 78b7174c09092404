use super::TypeDescriptor;
use crate::stmt::TypeEnum;
use indexmap::IndexMap;

/// The set of described types and enumerations known to a pipeline.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    types: IndexMap<String, TypeDescriptor>,
    enums: IndexMap<String, TypeEnum>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.register(ty);
        self
    }

    pub fn with_enum(mut self, ty: TypeEnum) -> Self {
        self.register_enum(ty);
        self
    }

    /// Registers a type, replacing any previous type of the same name.
    pub fn register(&mut self, ty: TypeDescriptor) {
        self.types.insert(ty.name.clone(), ty);
    }

    pub fn register_enum(&mut self, ty: TypeEnum) {
        self.enums.insert(ty.name.clone(), ty);
    }

    pub fn ty(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&TypeEnum> {
        self.enums.get(name)
    }

    pub fn types(&self) -> impl ExactSizeIterator<Item = &TypeDescriptor> + '_ {
        self.types.values()
    }

    pub fn enums(&self) -> impl ExactSizeIterator<Item = &TypeEnum> + '_ {
        self.enums.values()
    }
}
