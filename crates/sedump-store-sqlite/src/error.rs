//! Error type for `sedump-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  /// Another writer created the same site between lookup and insert.
  /// Resolving again is expected to succeed.
  #[error("site {0:?} was created concurrently")]
  Conflict(String),

  /// `bulk_load` was asked for a table or column list other than the one
  /// the record type binds.
  #[error("{table} ({}) does not match the record layout", columns.join(", "))]
  Layout { table: String, columns: Vec<String> },

  /// A bulk load was rolled back. `source` is the decode error or row
  /// rejection that stopped it.
  #[error("load into {table} aborted: {source}")]
  LoadAborted {
    table:  String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
