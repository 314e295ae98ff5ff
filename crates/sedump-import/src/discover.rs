//! Finding site archives in the input directory.

use std::{fs, path::{Path, PathBuf}};

use crate::{Error, Result};

/// One site archive found by [`discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  /// File name with the suffix stripped, e.g. `gaming`.
  pub site: String,
  pub path: PathBuf,
}

/// List the entries of `dir` whose name ends with `suffix`, sorted by name.
///
/// Not recursive. Files and directories both qualify, so the same call finds
/// packed archives and extracted dumps. A name equal to the suffix, or one
/// that is not valid UTF-8, is skipped.
pub fn discover(dir: &Path, suffix: &str) -> Result<Vec<Candidate>> {
  let wrap = |source| Error::Discover { dir: dir.to_path_buf(), source };

  let mut found = Vec::new();
  for entry in fs::read_dir(dir).map_err(wrap)? {
    let entry = entry.map_err(wrap)?;
    let name = entry.file_name();
    let Some(name) = name.to_str() else {
      tracing::debug!(path = %entry.path().display(), "skipping non-utf-8 name");
      continue;
    };
    let Some(site) = name.strip_suffix(suffix) else { continue };
    if site.is_empty() {
      continue;
    }
    found.push(Candidate {
      site: site.to_owned(),
      path: entry.path(),
    });
  }

  found.sort_by(|a, b| a.path.cmp(&b.path));
  tracing::debug!(dir = %dir.display(), suffix, count = found.len(), "discovered archives");
  Ok(found)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn filters_strips_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
      "gaming.stackexchange.com.7z",
      "cooking.stackexchange.com.7z",
      "cooking.stackexchange.com.zip",
      "notes.txt",
      ".stackexchange.com.7z",
    ] {
      fs::write(dir.path().join(name), b"x").unwrap();
    }

    let found = discover(dir.path(), ".stackexchange.com.7z").unwrap();
    let sites: Vec<_> = found.iter().map(|c| c.site.as_str()).collect();
    assert_eq!(sites, ["cooking", "gaming"]);
    assert_eq!(found[1].path, dir.path().join("gaming.stackexchange.com.7z"));
  }

  #[test]
  fn directories_qualify() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("gaming.stackexchange.com")).unwrap();
    let found = discover(dir.path(), ".stackexchange.com").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].site, "gaming");
  }

  #[test]
  fn nested_entries_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/gaming.stackexchange.com.7z"), b"x").unwrap();
    assert!(discover(dir.path(), ".stackexchange.com.7z").unwrap().is_empty());
  }

  #[test]
  fn missing_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = discover(&dir.path().join("absent"), ".7z").unwrap_err();
    assert!(matches!(err, Error::Discover { .. }));
  }
}
