use crate::{convert::Converters, Registry};
use std::sync::Arc;
use tessera_core::{schema::DataConverter, stmt::Type, stmt::Value, Catalog};

/// Configures how described types are translated.
#[derive(Debug)]
pub struct Builder {
    config: Config,
}

/// Options shared by every translation session of a [`Registry`].
#[derive(Debug, Clone)]
pub struct Config {
    /// If set, prefix all table names with this string
    pub table_name_prefix: Option<String>,

    /// Joins nested name segments, e.g. `Address` and `City` into
    /// `Address_City`
    pub name_separator: String,

    /// Suffixes tried, in order, when deducing a primary key from a
    /// property named `<Type><suffix>`
    pub key_suffixes: Vec<String>,

    /// Upper bound on the candidates a single key matcher may materialize
    pub max_key_candidates: Option<usize>,

    pub converters: Converters,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.config.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn name_separator(&mut self, separator: &str) -> &mut Self {
        self.config.name_separator = separator.to_string();
        self
    }

    pub fn key_suffixes<I, S>(&mut self, suffixes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.key_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_key_candidates(&mut self, max: usize) -> &mut Self {
        self.config.max_key_candidates = Some(max);
        self
    }

    /// Registers a named data converter factory.
    pub fn converter(
        &mut self,
        name: &str,
        factory: impl Fn(&Type, &[Value]) -> anyhow::Result<Arc<dyn DataConverter>>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.config.converters.register(name, factory);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Creates a registry over `catalog`. Types are translated lazily, on
    /// first use.
    pub fn build(&self, catalog: Catalog) -> Registry {
        Registry::new(Arc::new(catalog), self.config.clone())
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name_prefix: None,
            name_separator: "_".to_string(),
            key_suffixes: vec!["ID".to_string(), "Id".to_string()],
            max_key_candidates: None,
            converters: Converters::builtin(),
        }
    }
}
