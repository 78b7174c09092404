use crate::{builder::Config, translate::Translator, Builder, Pipeline};
use indexmap::IndexMap;
use std::sync::{Arc, PoisonError, RwLock};
use tessera_core::{schema::Table, Catalog, Result};
use tracing::debug;

/// Lazily translated pipelines, one per entity type.
///
/// A pipeline is built on first request and cached for the lifetime of the
/// registry. Cloning a registry shares its cache.
#[derive(Debug, Clone)]
pub struct Registry {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    catalog: Arc<Catalog>,
    config: Config,
    pipelines: RwLock<IndexMap<String, Arc<Pipeline>>>,
}

impl Registry {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub(crate) fn new(catalog: Arc<Catalog>, config: Config) -> Registry {
        Registry {
            shared: Arc::new(Shared {
                catalog,
                config,
                pipelines: RwLock::new(IndexMap::new()),
            }),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.shared.catalog
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Translates an entity type without compiling or caching its plans.
    pub fn translate(&self, ty: &str) -> Result<Table> {
        Translator::new(&self.shared.catalog, &self.shared.config).translate(ty)
    }

    /// Returns the pipeline of an entity type, building it on first use.
    ///
    /// Concurrent first requests may each build the pipeline; the first one
    /// stored is kept.
    pub fn pipeline(&self, ty: &str) -> Result<Arc<Pipeline>> {
        let pipelines = self
            .shared
            .pipelines
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(pipeline) = pipelines.get(ty) {
            return Ok(pipeline.clone());
        }
        drop(pipelines);

        let table = self.translate(ty)?;
        let pipeline = Pipeline::compile(
            &self.shared.catalog,
            table,
            self.shared.config.max_key_candidates,
        )?;

        let mut pipelines = self
            .shared
            .pipelines
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let pipeline = pipelines
            .entry(ty.to_string())
            .or_insert_with(|| {
                debug!(entity = ty, "cached pipeline");
                Arc::new(pipeline)
            })
            .clone();
        Ok(pipeline)
    }

    /// Entity types with a cached pipeline, in the order they were built.
    pub fn cached(&self) -> Vec<String> {
        self.shared
            .pipelines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
