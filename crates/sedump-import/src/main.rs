//! `sedump` binary.
//!
//! Reads `sedump.toml` (or the path given with `--config`) and `SEDUMP_*`
//! environment variables, applies command-line overrides, then imports every
//! site archive in the input directory into one SQLite database.
//!
//! ```text
//! sedump --format zip --database se.sqlite /data/dumps
//! sedump --entity users,posts --keep-going --json /data/dumps
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use sedump_archive::{ArchiveFormat, ArchiveReader, DirArchive, SevenZArchive, ZipArchive};
use sedump_core::EntityKind;
use sedump_import::{Candidate, ImportConfig, Pipeline, RunReport, SiteReport, discover};
use sedump_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Import Stack Exchange data dumps into SQLite")]
struct Cli {
  /// Directory holding one archive per site.
  input_dir: Option<PathBuf>,

  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "sedump.toml")]
  config: PathBuf,

  /// SQLite database to import into.
  #[arg(short, long)]
  database: Option<PathBuf>,

  /// Archive format: 7z, zip or dir.
  #[arg(short, long)]
  format: Option<ArchiveFormat>,

  /// File-name suffix marking a site archive.
  #[arg(long)]
  suffix: Option<String>,

  /// Entity kinds to import (comma separated).
  #[arg(short, long = "entity", value_delimiter = ',')]
  entities: Vec<EntityKind>,

  /// Continue with the next site after a failure.
  #[arg(short, long, overrides_with = "no_keep_going")]
  keep_going: bool,

  /// Stop at the first failing site, even if the configuration says
  /// otherwise.
  #[arg(long, overrides_with = "keep_going")]
  no_keep_going: bool,

  /// Print one JSON object per imported site.
  #[arg(long)]
  json: bool,

  /// List the discovered archives and their entries, then exit.
  #[arg(long)]
  list: bool,
}

impl Cli {
  fn apply(self, cfg: &mut ImportConfig) {
    if let Some(dir) = self.input_dir {
      cfg.input_dir = Some(dir);
    }
    if let Some(db) = self.database {
      cfg.database_path = db;
    }
    if let Some(format) = self.format {
      cfg.format = format;
    }
    if self.suffix.is_some() {
      cfg.suffix = self.suffix;
    }
    if !self.entities.is_empty() {
      cfg.entities = self.entities;
    }
    match (self.keep_going, self.no_keep_going) {
      (true, _) => cfg.keep_going = true,
      (_, true) => cfg.keep_going = false,
      _ => {}
    }
  }
}

fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout carries the report.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let (json, list) = (cli.json, cli.list);

  let mut cfg = ImportConfig::load(&cli.config).context("failed to read configuration")?;
  cli.apply(&mut cfg);

  let input_dir = cfg
    .input_dir
    .clone()
    .context("no input directory given (argument, `input_dir` or SEDUMP_INPUT_DIR)")?;
  let candidates = discover(&input_dir, cfg.suffix())?;
  if candidates.is_empty() {
    tracing::warn!(dir = %input_dir.display(), suffix = cfg.suffix(), "no archives found");
  }

  if list {
    return match cfg.format {
      ArchiveFormat::SevenZ => list_entries::<SevenZArchive>(&candidates),
      ArchiveFormat::Zip => list_entries::<ZipArchive>(&candidates),
      ArchiveFormat::Dir => list_entries::<DirArchive>(&candidates),
    };
  }

  let store = SqliteStore::open(&cfg.database_path)
    .with_context(|| format!("failed to open {}", cfg.database_path.display()))?;

  let report = match cfg.format {
    ArchiveFormat::SevenZ => run::<SevenZArchive>(store, &cfg, &candidates, json)?,
    ArchiveFormat::Zip => run::<ZipArchive>(store, &cfg, &candidates, json)?,
    ArchiveFormat::Dir => run::<DirArchive>(store, &cfg, &candidates, json)?,
  };

  if !report.is_success() {
    anyhow::bail!(
      "{} of {} sites failed: {}",
      report.failed.len(),
      candidates.len(),
      report
        .failed
        .iter()
        .map(|f| f.site.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    );
  }
  Ok(())
}

fn run<A: ArchiveReader>(
  store: SqliteStore,
  cfg: &ImportConfig,
  candidates: &[Candidate],
  json: bool,
) -> anyhow::Result<RunReport> {
  let mut pipeline = Pipeline::<A>::new(store)
    .entities(cfg.entities.clone())
    .keep_going(cfg.keep_going);
  // Each line goes out as its site finishes, so a later failure does not
  // hide the sites already imported.
  let report = pipeline.run_with(candidates, |site| {
    if let Err(e) = print_site(site, json) {
      tracing::error!(site = %site.site, error = %e, "failed to print report");
    }
  })?;
  Ok(report)
}

fn print_site(site: &SiteReport, json: bool) -> serde_json::Result<()> {
  if json {
    println!("{}", serde_json::to_string(site)?);
  } else {
    println!(
      "{:<40} {:>12} {:>10} ms",
      site.site,
      site.total_rows(),
      site.elapsed_ms
    );
  }
  Ok(())
}

fn list_entries<A: ArchiveReader>(candidates: &[Candidate]) -> anyhow::Result<()> {
  for candidate in candidates {
    let mut archive = A::open(&candidate.path)?;
    println!("{}  ({})", candidate.site, candidate.path.display());
    for entry in archive.list_entries()? {
      println!("  {:<24} {:>14}", entry.name, entry.size);
    }
  }
  Ok(())
}
