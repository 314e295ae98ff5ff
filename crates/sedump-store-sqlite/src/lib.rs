//! SQLite destination store for imported data dumps.
//!
//! Owns the schema, site identity (resolve and purge) and the transactional
//! bulk loader. All calls block; the importer is a single-threaded pipeline.

mod encode;
mod load;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use load::{RowRejected, Table, bulk_load};
pub use store::SqliteStore;
