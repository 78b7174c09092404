use super::PropertyTy;
use crate::object::{Object, Record};
use std::{fmt, sync::Arc};

/// A declared constructor of a described type.
#[derive(Debug, Clone)]
pub struct Constructor {
    pub params: Vec<Param>,

    /// Builds the instance from the arguments. Without a factory, arguments
    /// are assigned to the same-named properties.
    pub factory: Option<Factory>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: PropertyTy,
}

#[derive(Clone)]
pub struct Factory(Arc<dyn Fn(Vec<Object>) -> anyhow::Result<Record> + Send + Sync>);

impl Constructor {
    pub fn new<I>(params: I) -> Self
    where
        I: IntoIterator<Item = Param>,
    {
        Self {
            params: params.into_iter().collect(),
            factory: None,
        }
    }

    /// The zero-argument constructor.
    pub fn default_constructor() -> Self {
        Self::new([])
    }

    pub fn factory(
        mut self,
        f: impl Fn(Vec<Object>) -> anyhow::Result<Record> + Send + Sync + 'static,
    ) -> Self {
        self.factory = Some(Factory(Arc::new(f)));
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl Param {
    pub fn new(name: impl Into<String>, ty: PropertyTy) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl Factory {
    pub fn call(&self, args: Vec<Object>) -> anyhow::Result<Record> {
        (self.0)(args)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Factory(..)")
    }
}
