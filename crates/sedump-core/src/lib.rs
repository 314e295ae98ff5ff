//! Core types for the sedump data-dump importer.
//!
//! Entity records, the [`FromRow`] mapping contract and the value parsers
//! shared by every decoder. This crate is free of archive, XML and database
//! dependencies; the other crates build on it.

pub mod entity;
pub mod error;
pub mod kind;
pub mod row;
pub mod site;
pub mod value;

pub use entity::{Badge, Comment, Entity, Post, Tag, User};
pub use error::{Error, Result};
pub use kind::{EntityKind, ROW_TAG};
pub use row::{FromRow, RowAttrs};
pub use site::{Site, SiteId};
