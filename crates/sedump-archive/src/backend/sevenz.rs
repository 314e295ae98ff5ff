//! 7z backend.
//!
//! Data dumps are published as 7z archives. Entries are grouped into blocks,
//! and inside a block they share one compressed stream. The backend looks up
//! the block holding the wanted entry, seeks straight to it and decodes only
//! that block: earlier entries of the same block are decompressed into
//! `io::sink()`, and decoding stops once the wanted entry has been handed to
//! the caller. Other blocks are never touched.

use std::{
  fs::File,
  io::{self, Read},
  path::{Path, PathBuf},
};

use sevenz_rust::{Archive, BlockDecoder, SevenZArchiveEntry};

use crate::{ArchiveFormat, ArchiveReader, EntryInfo, Error, Result};

/// Dumps are never encrypted.
const NO_PASSWORD: &[u8] = &[];

pub struct SevenZArchive {
  path:    PathBuf,
  file:    File,
  archive: Archive,
}

impl SevenZArchive {
  /// Find `name` in the index and return its block.
  fn locate(&self, name: &str) -> Result<usize> {
    let (index, entry) = self
      .archive
      .files
      .iter()
      .enumerate()
      .find(|(_, f)| !f.is_directory && f.name == name)
      .ok_or_else(|| Error::not_found(name))?;

    if !entry.has_stream || entry.size == 0 {
      return Err(Error::empty(name));
    }
    self
      .archive
      .stream_map
      .file_folder_index
      .get(index)
      .copied()
      .flatten()
      .ok_or_else(|| Error::empty(name))
  }
}

impl ArchiveReader for SevenZArchive {
  const FORMAT: ArchiveFormat = ArchiveFormat::SevenZ;

  fn open(path: &Path) -> Result<Self> {
    let mut file = File::open(path).map_err(|e| Error::open(path, e))?;
    let len = file.metadata().map_err(|e| Error::open(path, e))?.len();
    let archive =
      Archive::read(&mut file, len, NO_PASSWORD).map_err(|e| Error::open(path, e))?;
    Ok(Self { path: path.to_path_buf(), file, archive })
  }

  fn list_entries(&mut self) -> Result<Vec<EntryInfo>> {
    Ok(
      self
        .archive
        .files
        .iter()
        .filter(|f| !f.is_directory)
        .map(|f| EntryInfo { name: f.name.clone(), size: f.size })
        .collect(),
    )
  }

  fn with_entry<T, E, F>(&mut self, name: &str, read: F) -> Result<T, E>
  where
    F: FnOnce(&mut dyn Read) -> Result<T, E>,
    E: From<Error>,
  {
    let block = self.locate(name)?;

    let mut read = Some(read);
    let mut outcome: Option<Result<T, E>> = None;
    let mut skipped = 0u64;

    let decoder = BlockDecoder::new(block, &self.archive, NO_PASSWORD, &mut self.file);
    let walk = decoder.for_each_entries(
      &mut |entry: &SevenZArchiveEntry,
            stream: &mut dyn Read|
            -> std::result::Result<bool, sevenz_rust::Error> {
        if entry.name != name {
          return match io::copy(stream, &mut io::sink()) {
            Ok(n) => {
              skipped += n;
              Ok(true)
            }
            Err(e) => {
              outcome = Some(Err(Error::Io(e).into()));
              Ok(false)
            }
          };
        }
        if let Some(read) = read.take() {
          outcome = Some(read(stream));
        }
        Ok(false)
      },
    );

    tracing::debug!(
      archive = %self.path.display(),
      entry = name,
      block,
      skipped_bytes = skipped,
      "7z block decoded"
    );

    match (outcome, walk) {
      (Some(result), _) => result,
      (None, Err(e)) => Err(
        Error::Read {
          entry:  name.to_owned(),
          reason: e.to_string(),
        }
        .into(),
      ),
      (None, Ok(_)) => Err(Error::not_found(name).into()),
    }
  }
}
