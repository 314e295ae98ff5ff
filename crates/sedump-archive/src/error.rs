//! Error type for `sedump-archive`.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Missing file, corrupt header or unsupported codec.
  #[error("cannot open archive {}: {reason}", path.display())]
  Open { path: PathBuf, reason: String },

  #[error("entry {entry:?} not found in archive")]
  EntryNotFound { entry: String },

  #[error("entry {entry:?} carries no data")]
  EmptyEntry { entry: String },

  /// The codec failed while walking or decompressing entries.
  #[error("error reading entry {entry:?}: {reason}")]
  Read { entry: String, reason: String },

  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

impl Error {
  pub(crate) fn open(path: &std::path::Path, reason: impl ToString) -> Self {
    Error::Open {
      path:   path.to_path_buf(),
      reason: reason.to_string(),
    }
  }

  pub(crate) fn not_found(entry: &str) -> Self {
    Error::EntryNotFound { entry: entry.to_owned() }
  }

  pub(crate) fn empty(entry: &str) -> Self {
    Error::EmptyEntry { entry: entry.to_owned() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
