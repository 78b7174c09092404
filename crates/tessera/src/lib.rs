mod builder;
pub use builder::{Builder, Config};

pub mod convert;
pub use convert::Converters;

pub mod extract;
pub use extract::{Extracted, ExtractionPlan, RelationRows};

pub mod key_matcher;
pub use key_matcher::{Domains, Generator, KeyMatcher};

mod pipeline;
pub use pipeline::Pipeline;

pub mod reconstitute;
pub use reconstitute::{ChildRows, ReconstitutionPlan, Reconstitutor};

mod registry;
pub use registry::Registry;

mod translate;

pub use tessera_core::{
    meta, object, schema, stmt, Catalog, Error, Location, Object, Reason, Result,
};
