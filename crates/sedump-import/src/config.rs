//! Layered import settings.

use std::path::{Path, PathBuf};

use sedump_archive::ArchiveFormat;
use sedump_core::EntityKind;
use serde::{Deserialize, Serialize};

/// Environment variables with this prefix (`SEDUMP_DATABASE_PATH`, ...)
/// override the config file.
pub const ENV_PREFIX: &str = "SEDUMP";

/// Import settings, read from an optional TOML file and `SEDUMP_*`
/// environment variables. The binary lets command-line flags override both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
  /// Directory holding one archive per site.
  pub input_dir:     Option<PathBuf>,
  pub database_path: PathBuf,
  pub format:        ArchiveFormat,
  /// File-name suffix marking a site archive; defaults per format.
  pub suffix:        Option<String>,
  /// Entity kinds to import, in order.
  pub entities:      Vec<EntityKind>,
  /// Continue with the next site after a failure.
  pub keep_going:    bool,
}

impl Default for ImportConfig {
  fn default() -> Self {
    Self {
      input_dir:     None,
      database_path: PathBuf::from("sedump.sqlite"),
      format:        ArchiveFormat::default(),
      suffix:        None,
      entities:      EntityKind::ALL.to_vec(),
      keep_going:    false,
    }
  }
}

impl ImportConfig {
  /// Read `file` (if it exists) and the environment.
  pub fn load(file: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(
        config::Environment::with_prefix(ENV_PREFIX)
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("entities"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn suffix(&self) -> &str {
    self
      .suffix
      .as_deref()
      .unwrap_or_else(|| self.format.default_suffix())
  }
}
