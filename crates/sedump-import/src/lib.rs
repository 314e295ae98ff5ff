//! Orchestration for importing a directory of data dumps.
//!
//! For every archive found by [`discover`], a [`Pipeline`] resolves the
//! site's id, purges the rows of any earlier import and streams each entity
//! kind from the archive into the store. Sites are processed one after the
//! other; the first failure ends the run unless `keep_going` is set.

pub mod config;
pub mod discover;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::ImportConfig;
pub use discover::{Candidate, discover};
pub use error::{Error, Result, Step};
pub use pipeline::Pipeline;
pub use report::{EntityReport, RunReport, SiteFailure, SiteReport};
