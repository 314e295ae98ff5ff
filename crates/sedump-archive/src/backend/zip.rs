//! Zip backend. Zip keeps a central directory, so entries are seeked to
//! directly and nothing else is decompressed.

use std::{
  fs::File,
  io::{BufReader, Read},
  path::{Path, PathBuf},
};

use zip::result::ZipError;

use crate::{ArchiveFormat, ArchiveReader, EntryInfo, Error, Result};

pub struct ZipArchive {
  path:  PathBuf,
  inner: zip::ZipArchive<BufReader<File>>,
}

impl ArchiveReader for ZipArchive {
  const FORMAT: ArchiveFormat = ArchiveFormat::Zip;

  fn open(path: &Path) -> Result<Self> {
    let file = File::open(path).map_err(|e| Error::open(path, e))?;
    let inner = zip::ZipArchive::new(BufReader::new(file))
      .map_err(|e| Error::open(path, e))?;
    Ok(Self { path: path.to_path_buf(), inner })
  }

  fn list_entries(&mut self) -> Result<Vec<EntryInfo>> {
    let mut entries = Vec::with_capacity(self.inner.len());
    for index in 0..self.inner.len() {
      let file = self.inner.by_index_raw(index).map_err(|e| Error::Read {
        entry:  format!("#{index}"),
        reason: e.to_string(),
      })?;
      if file.is_dir() {
        continue;
      }
      entries.push(EntryInfo { name: file.name().to_owned(), size: file.size() });
    }
    Ok(entries)
  }

  fn with_entry<T, E, F>(&mut self, name: &str, read: F) -> Result<T, E>
  where
    F: FnOnce(&mut dyn Read) -> Result<T, E>,
    E: From<Error>,
  {
    let mut file = match self.inner.by_name(name) {
      Ok(file) => file,
      Err(ZipError::FileNotFound) => return Err(Error::not_found(name).into()),
      Err(e) => {
        return Err(
          Error::Read {
            entry:  name.to_owned(),
            reason: e.to_string(),
          }
          .into(),
        );
      }
    };

    if file.is_dir() || file.size() == 0 {
      return Err(Error::empty(name).into());
    }

    tracing::debug!(
      archive = %self.path.display(),
      entry = name,
      size = file.size(),
      "streaming zip entry"
    );
    read(&mut file)
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use zip::write::SimpleFileOptions;

  use super::*;

  fn fixture(entries: &[(&str, &str)]) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
    for (name, body) in entries {
      writer.start_file(*name, SimpleFileOptions::default()).unwrap();
      writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    file
  }

  fn read_all(archive: &mut ZipArchive, name: &str) -> Result<String> {
    archive.with_entry(name, |stream| {
      let mut text = String::new();
      stream.read_to_string(&mut text)?;
      Ok(text)
    })
  }

  #[test]
  fn reads_named_entry() {
    let file = fixture(&[("Tags.xml", "<tags/>"), ("Users.xml", "<users/>")]);
    let mut archive = ZipArchive::open(file.path()).unwrap();
    assert_eq!(read_all(&mut archive, "Users.xml").unwrap(), "<users/>");
    // The handle stays usable for another entry.
    assert_eq!(read_all(&mut archive, "Tags.xml").unwrap(), "<tags/>");
  }

  #[test]
  fn missing_entry() {
    let file = fixture(&[("Users.xml", "<users/>")]);
    let mut archive = ZipArchive::open(file.path()).unwrap();
    let err = read_all(&mut archive, "users.xml").unwrap_err();
    assert!(matches!(err, Error::EntryNotFound { .. }), "{err:?}");
  }

  #[test]
  fn empty_entry_is_not_passed_to_reader() {
    let file = fixture(&[("Badges.xml", "")]);
    let mut archive = ZipArchive::open(file.path()).unwrap();
    let mut called = false;
    let err = archive
      .with_entry::<(), Error, _>("Badges.xml", |_| {
        called = true;
        Ok(())
      })
      .unwrap_err();
    assert!(matches!(err, Error::EmptyEntry { .. }), "{err:?}");
    assert!(!called);
  }

  #[test]
  fn reader_errors_pass_through() {
    #[derive(Debug)]
    enum Outer {
      Archive(Error),
      Decode(&'static str),
    }
    impl From<Error> for Outer {
      fn from(e: Error) -> Self { Outer::Archive(e) }
    }

    let file = fixture(&[("Posts.xml", "<posts>")]);
    let mut archive = ZipArchive::open(file.path()).unwrap();
    let err = archive
      .with_entry::<(), Outer, _>("Posts.xml", |_| Err(Outer::Decode("bad")))
      .unwrap_err();
    assert!(matches!(err, Outer::Decode("bad")));
  }

  #[test]
  fn lists_entries() {
    let file = fixture(&[("Users.xml", "<users/>"), ("Tags.xml", "")]);
    let mut archive = ZipArchive::open(file.path()).unwrap();
    let names: Vec<_> = archive
      .list_entries()
      .unwrap()
      .into_iter()
      .map(|e| (e.name, e.size))
      .collect();
    assert_eq!(names, [("Users.xml".to_owned(), 8), ("Tags.xml".to_owned(), 0)]);
  }

  #[test]
  fn not_a_zip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"plain text").unwrap();
    let err = ZipArchive::open(file.path()).err().unwrap();
    assert!(matches!(err, Error::Open { .. }));
  }
}
