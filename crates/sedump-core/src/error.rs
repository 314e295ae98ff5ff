//! Error types for `sedump-core`.

use thiserror::Error;

/// A row attribute could not be mapped onto a record field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("missing required attribute {field:?}")]
  MissingField { field: &'static str },

  #[error("invalid value {value:?} for attribute {field:?}: {reason}")]
  InvalidField {
    field:  &'static str,
    value:  String,
    reason: String,
  },
}

impl Error {
  /// The attribute name the error refers to.
  pub fn field(&self) -> &'static str {
    match self {
      Error::MissingField { field } | Error::InvalidField { field, .. } => field,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
