#[macro_use]
mod error;
pub use error::{Category, Error, IntoError, Location, Reason};

pub mod meta;
pub use meta::Catalog;

pub mod object;
pub use object::Object;

pub mod schema;
pub use schema::Table;

pub mod stmt;

/// A Result type alias that uses tessera's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
