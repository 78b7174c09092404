//! Identity lookup of referenced entities by key.

use indexmap::IndexMap;
use std::{fmt, sync::Arc};
use tessera_core::{
    object::Record, schema::Conversion, stmt::Value, Error, Object, Reason, Result,
};
use tracing::trace;

/// Produces the candidate instances of an entity type.
///
/// A matcher calls its generator at most once and pulls candidates lazily,
/// so the generator may describe a very large domain.
pub type Generator =
    Arc<dyn Fn() -> Box<dyn Iterator<Item = Arc<Record>> + Send> + Send + Sync>;

type Candidates = Box<dyn Iterator<Item = Arc<Record>> + Send>;

/// Candidate generators, by entity type name.
#[derive(Clone, Default)]
pub struct Domains {
    generators: IndexMap<String, Generator>,
}

impl Domains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the candidate generator of `ty`.
    ///
    /// The generator may be infinite. A lookup that matches nothing then
    /// only terminates when a candidate limit is configured.
    pub fn with<F, I>(mut self, ty: impl Into<String>, generator: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = Arc<Record>>,
        I::IntoIter: Send + 'static,
    {
        self.insert(ty, generator);
        self
    }

    pub fn insert<F, I>(&mut self, ty: impl Into<String>, generator: F)
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = Arc<Record>>,
        I::IntoIter: Send + 'static,
    {
        let generator: Generator = Arc::new(move || Box::new(generator().into_iter()));
        self.generators.insert(ty.into(), generator);
    }

    /// A finite domain over known instances.
    pub fn with_instances(self, ty: impl Into<String>, instances: Vec<Arc<Record>>) -> Self {
        self.with(ty, move || instances.clone())
    }

    pub fn get(&self, ty: &str) -> Option<&Generator> {
        self.generators.get(ty)
    }

    pub fn contains(&self, ty: &str) -> bool {
        self.generators.contains_key(ty)
    }
}

impl fmt::Debug for Domains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.generators.keys()).finish()
    }
}

/// Resolves key tuples to instances of one entity type.
///
/// Every candidate pulled from the generator is cached by its key, so each
/// candidate is materialized at most once however many lookups are made.
pub struct KeyMatcher {
    target: String,

    /// Where the key fields live in a candidate
    key_paths: Vec<Vec<String>>,

    /// Brings candidate key values into the form stored in rows
    conversions: Vec<Conversion>,

    generator: Generator,

    /// `None` until the first cache miss
    candidates: Option<Candidates>,

    cache: IndexMap<Vec<Value>, Arc<Record>>,

    /// Candidates pulled so far
    pulled: usize,

    /// Maximum number of candidates to materialize
    limit: Option<usize>,
}

impl KeyMatcher {
    pub fn new(
        target: impl Into<String>,
        key_paths: Vec<Vec<String>>,
        conversions: Vec<Conversion>,
        generator: Generator,
    ) -> Self {
        Self {
            target: target.into(),
            key_paths,
            conversions,
            generator,
            candidates: None,
            cache: IndexMap::new(),
            pulled: 0,
            limit: None,
        }
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Number of candidates pulled from the generator so far.
    pub fn materialized(&self) -> usize {
        self.pulled
    }

    /// Finds the instance whose key equals `key`.
    pub fn lookup(&mut self, key: &[Value]) -> Result<Arc<Record>> {
        if let Some(instance) = self.cache.get(key) {
            trace!(target_type = %self.target, ?key, "key matcher hit");
            return Ok(instance.clone());
        }

        let generator = &self.generator;
        let candidates = self.candidates.get_or_insert_with(|| generator());

        loop {
            if self.limit.is_some_and(|limit| self.pulled >= limit) {
                return Err(Error::internal(
                    Reason::CandidateLimitExceeded,
                    format!(
                        "no `{}` with key {} among the first {} candidates",
                        self.target,
                        render(key),
                        self.pulled
                    ),
                ));
            }

            let Some(candidate) = candidates.next() else {
                return Err(Error::internal(
                    Reason::KeyLookupExhausted,
                    format!(
                        "no `{}` with key {} among {} candidates",
                        self.target,
                        render(key),
                        self.pulled
                    ),
                ));
            };

            let candidate_key = candidate_key(&self.key_paths, &self.conversions, &candidate);
            trace!(
                target_type = %self.target,
                key = ?candidate_key,
                "key matcher pulled candidate"
            );

            self.pulled += 1;
            let matched = candidate_key == key;

            // First candidate wins when keys repeat
            let instance = self.cache.entry(candidate_key).or_insert(candidate).clone();
            if matched {
                return Ok(instance);
            }
        }
    }
}

impl fmt::Debug for KeyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMatcher")
            .field("target", &self.target)
            .field("materialized", &self.pulled)
            .field("limit", &self.limit)
            .finish()
    }
}

fn candidate_key(
    paths: &[Vec<String>],
    conversions: &[Conversion],
    candidate: &Record,
) -> Vec<Value> {
    paths
        .iter()
        .zip(conversions)
        .map(|(path, conversion)| {
            let (first, rest) = match path.split_first() {
                Some(split) => split,
                None => return Value::Null,
            };
            let value = candidate
                .get(first)
                .and_then(|object| object.get_path(rest))
                .and_then(|object| Object::clone(object).into_value())
                .unwrap_or(Value::Null);
            conversion.apply(value)
        })
        .collect()
}

fn render(key: &[Value]) -> String {
    let values: Vec<_> = key.iter().map(Value::to_string).collect();
    format!("({})", values.join(", "))
}
