//! Read one named entry out of a data-dump archive.
//!
//! [`ArchiveReader`] is the single capability every codec backend offers:
//! open a container, then lend the bytes of one entry to a closure. Callers
//! are generic over the backend, so the codec is picked where the pipeline is
//! composed and never switched on at runtime.
//!
//! The stream is lent rather than returned so that every backend can keep the
//! decoder state it needs alive for exactly as long as the caller reads, and
//! release it on every exit path.

pub mod backend;
pub mod error;

use std::{io::Read, path::Path};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use backend::{DirArchive, SevenZArchive, ZipArchive};
pub use error::{Error, Result};

/// Name and uncompressed size of an archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
  pub name: String,
  pub size: u64,
}

/// An opened archive. Dropping the value closes it.
pub trait ArchiveReader: Sized {
  /// Short codec name used in logs.
  const FORMAT: ArchiveFormat;

  /// Open the archive at `path`, reading only its index.
  fn open(path: &Path) -> Result<Self>;

  /// All file entries, in archive order.
  fn list_entries(&mut self) -> Result<Vec<EntryInfo>>;

  /// Stream the entry named exactly `name` into `read`.
  ///
  /// Fails with [`Error::EntryNotFound`] if no such entry exists and
  /// [`Error::EmptyEntry`] if it holds no bytes; in both cases `read` is not
  /// called. Whatever `read` returns, including its error, is passed through.
  /// The stream ends with an ordinary EOF.
  fn with_entry<T, E, F>(&mut self, name: &str, read: F) -> Result<T, E>
  where
    F: FnOnce(&mut dyn Read) -> Result<T, E>,
    E: From<Error>;
}

/// Container formats the importer can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
pub enum ArchiveFormat {
  #[default]
  #[strum(serialize = "7z")]
  #[serde(rename = "7z")]
  SevenZ,
  #[strum(serialize = "zip")]
  #[serde(rename = "zip")]
  Zip,
  /// A dump already extracted into a directory.
  #[strum(serialize = "dir")]
  #[serde(rename = "dir")]
  Dir,
}

impl ArchiveFormat {
  /// File-name suffix of archives published in this format.
  pub fn default_suffix(self) -> &'static str {
    match self {
      ArchiveFormat::SevenZ => ".stackexchange.com.7z",
      ArchiveFormat::Zip => ".stackexchange.com.zip",
      ArchiveFormat::Dir => ".stackexchange.com",
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn format_names() {
    assert_eq!(ArchiveFormat::from_str("7z").unwrap(), ArchiveFormat::SevenZ);
    assert_eq!(ArchiveFormat::Zip.to_string(), "zip");
    assert_eq!(ArchiveFormat::default(), ArchiveFormat::SevenZ);
    assert!(ArchiveFormat::from_str("rar").is_err());
  }
}
