//! Error types for the row decoder.

use std::{io, sync::Arc};

use thiserror::Error;

/// Decoding failure. `row` is the 1-based ordinal of the row being read when
/// the failure happened; `0` means no row had started.
#[derive(Debug, Error)]
pub enum Error {
  /// The document is not a `<root><row/>…</root>` container.
  #[error("malformed document at row {row}: {message}")]
  Structure { row: u64, message: String },

  /// A row attribute could not be mapped onto its record field.
  #[error("row {row}: {source}")]
  Field {
    row:    u64,
    #[source]
    source: sedump_core::Error,
  },

  /// The underlying byte stream failed.
  #[error("read failed at row {row}: {source}")]
  Read {
    row:    u64,
    #[source]
    source: Arc<io::Error>,
  },
}

impl Error {
  pub fn row(&self) -> u64 {
    match self {
      Error::Structure { row, .. } | Error::Field { row, .. } | Error::Read { row, .. } => *row,
    }
  }

  pub(crate) fn structure(row: u64, message: impl Into<String>) -> Self {
    Error::Structure { row, message: message.into() }
  }

  pub(crate) fn from_xml(row: u64, err: quick_xml::Error) -> Self {
    match err {
      quick_xml::Error::Io(source) => Error::Read { row, source },
      other => Error::structure(row, other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
