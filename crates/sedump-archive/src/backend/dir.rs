//! Extracted-dump backend: a directory whose files are the entries.

use std::{
  fs::{self, File},
  io::{self, BufReader, Read},
  path::{Path, PathBuf},
};

use crate::{ArchiveFormat, ArchiveReader, EntryInfo, Error, Result};

pub struct DirArchive {
  root: PathBuf,
}

impl ArchiveReader for DirArchive {
  const FORMAT: ArchiveFormat = ArchiveFormat::Dir;

  fn open(path: &Path) -> Result<Self> {
    let meta = fs::metadata(path).map_err(|e| Error::open(path, e))?;
    if !meta.is_dir() {
      return Err(Error::open(path, "not a directory"));
    }
    Ok(Self { root: path.to_path_buf() })
  }

  fn list_entries(&mut self) -> Result<Vec<EntryInfo>> {
    let mut entries = Vec::new();
    for dirent in fs::read_dir(&self.root)? {
      let dirent = dirent?;
      let meta = dirent.metadata()?;
      if meta.is_file() {
        entries.push(EntryInfo {
          name: dirent.file_name().to_string_lossy().into_owned(),
          size: meta.len(),
        });
      }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
  }

  fn with_entry<T, E, F>(&mut self, name: &str, read: F) -> Result<T, E>
  where
    F: FnOnce(&mut dyn Read) -> Result<T, E>,
    E: From<Error>,
  {
    // Entry names are flat; anything path-like cannot name an entry.
    if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
      return Err(Error::not_found(name).into());
    }

    let path = self.root.join(name);
    let file = match File::open(&path) {
      Ok(file) => file,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(Error::not_found(name).into());
      }
      Err(e) => return Err(Error::Io(e).into()),
    };

    let meta = file.metadata().map_err(Error::Io)?;
    if !meta.is_file() {
      return Err(Error::not_found(name).into());
    }
    if meta.len() == 0 {
      return Err(Error::empty(name).into());
    }

    let mut stream = BufReader::new(file);
    read(&mut stream)
  }
}
