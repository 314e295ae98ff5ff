//! Error type for `sedump-import`.

use std::{fmt, io, path::PathBuf};

use sedump_core::EntityKind;
use thiserror::Error;

/// The per-site step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  ResolveSite,
  PurgeSite,
  Load(EntityKind),
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::ResolveSite => f.write_str("resolving site id"),
      Step::PurgeSite => f.write_str("purging previous import"),
      Step::Load(kind) => write!(f, "loading {kind}"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Archive(#[from] sedump_archive::Error),

  #[error(transparent)]
  Store(#[from] sedump_store_sqlite::Error),

  #[error("cannot list {}: {source}", dir.display())]
  Discover {
    dir:    PathBuf,
    #[source]
    source: io::Error,
  },

  /// A step of one site's import failed; the run stops here by default.
  #[error("site {site}: {step} failed: {source}")]
  Site {
    site:   String,
    step:   Step,
    #[source]
    source: Box<Error>,
  },
}

impl Error {
  pub(crate) fn at(site: &str, step: Step) -> impl FnOnce(Error) -> Error + '_ {
    move |source| Error::Site {
      site: site.to_owned(),
      step,
      source: Box::new(source),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn site_error_names_site_and_step() {
    let inner = Error::Archive(sedump_archive::Error::EntryNotFound {
      entry: "Users.xml".into(),
    });
    let err = Error::at("gaming", Step::Load(EntityKind::Users))(inner);
    assert_eq!(
      err.to_string(),
      "site gaming: loading users failed: entry \"Users.xml\" not found in archive"
    );
  }
}
