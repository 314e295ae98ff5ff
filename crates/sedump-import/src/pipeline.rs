//! The per-site import sequence.

use std::{io::BufReader, marker::PhantomData, path::Path, time::Instant};

use sedump_archive::ArchiveReader;
use sedump_core::{Badge, Comment, EntityKind, Post, SiteId, Tag, User};
use sedump_store_sqlite::{SqliteStore, Table};
use sedump_xml::RowReader;
use tracing::{error, info, warn};

use crate::{
  Candidate, Error, Result, Step,
  report::{EntityReport, RunReport, SiteFailure, SiteReport, millis},
};

const READ_BUFFER: usize = 64 * 1024;

/// Imports sites from archives of type `A` into one store.
///
/// The codec is a type parameter, so a pipeline reads exactly one archive
/// format; the binary picks it once from the configuration.
pub struct Pipeline<A> {
  store:      SqliteStore,
  entities:   Vec<EntityKind>,
  keep_going: bool,
  _archive:   PhantomData<fn() -> A>,
}

impl<A: ArchiveReader> Pipeline<A> {
  /// A pipeline importing every entity kind and stopping at the first
  /// failing site.
  pub fn new(store: SqliteStore) -> Self {
    Self {
      store,
      entities: EntityKind::ALL.to_vec(),
      keep_going: false,
      _archive: PhantomData,
    }
  }

  /// Restrict the import to `entities`, loaded in the given order.
  pub fn entities(mut self, entities: impl Into<Vec<EntityKind>>) -> Self {
    self.entities = entities.into();
    self
  }

  pub fn keep_going(mut self, keep_going: bool) -> Self {
    self.keep_going = keep_going;
    self
  }

  pub fn store(&self) -> &SqliteStore { &self.store }

  pub fn into_store(self) -> SqliteStore { self.store }

  /// Import every candidate in order.
  ///
  /// Without `keep_going` the first failure is returned as is. With it,
  /// failures are logged and collected in [`RunReport::failed`] and the
  /// remaining sites still run.
  pub fn run(&mut self, candidates: &[Candidate]) -> Result<RunReport> {
    self.run_with(candidates, |_| {})
  }

  /// [`run`](Self::run), calling `on_site` as soon as each site has been
  /// imported, before the next one starts.
  pub fn run_with<F>(&mut self, candidates: &[Candidate], mut on_site: F) -> Result<RunReport>
  where
    F: FnMut(&SiteReport),
  {
    let mut report = RunReport::default();
    for candidate in candidates {
      match self.import_site(&candidate.site, &candidate.path) {
        Ok(site) => {
          on_site(&site);
          report.sites.push(site);
        }
        Err(e) if self.keep_going => {
          error!(site = %candidate.site, error = %e, "site import failed; continuing");
          report.failed.push(SiteFailure {
            site:  candidate.site.clone(),
            error: e.to_string(),
          });
        }
        Err(e) => return Err(e),
      }
    }
    Ok(report)
  }

  /// Resolve, purge and reload one site from the archive at `path`.
  ///
  /// Each entity kind commits on its own; if a later kind fails, the kinds
  /// before it stay loaded until the next run purges them.
  pub fn import_site(&mut self, site: &str, path: &Path) -> Result<SiteReport> {
    let started = Instant::now();
    info!(site, path = %path.display(), format = %A::FORMAT, "importing site");

    let site_id = self
      .resolve(site)
      .map_err(Error::from)
      .map_err(Error::at(site, Step::ResolveSite))?;

    let purged = self
      .store
      .purge_site(site_id)
      .map_err(Error::from)
      .map_err(Error::at(site, Step::PurgeSite))?;

    let mut entities = Vec::with_capacity(self.entities.len());
    for kind in self.entities.clone() {
      let kind_started = Instant::now();
      let rows = self
        .load_kind(kind, site_id, path)
        .map_err(Error::at(site, Step::Load(kind)))?;
      let elapsed_ms = millis(kind_started.elapsed());
      info!(site, entity = %kind, rows, elapsed_ms, "loaded");
      entities.push(EntityReport { entity: kind, rows, elapsed_ms });
    }

    let report = SiteReport {
      site: site.to_owned(),
      site_id,
      purged,
      entities,
      elapsed_ms: millis(started.elapsed()),
    };
    info!(
      site,
      site_id,
      rows = report.total_rows(),
      elapsed_ms = report.elapsed_ms,
      "site imported"
    );
    Ok(report)
  }

  /// `resolve_site`, retried once if another writer created the site first.
  fn resolve(&mut self, site: &str) -> sedump_store_sqlite::Result<SiteId> {
    match self.store.resolve_site(site) {
      Err(sedump_store_sqlite::Error::Conflict(_)) => {
        warn!(site, "site created concurrently; retrying lookup");
        self.store.resolve_site(site)
      }
      other => other,
    }
  }

  fn load_kind(&mut self, kind: EntityKind, site_id: SiteId, path: &Path) -> Result<u64> {
    match kind {
      EntityKind::Users => self.load_entity::<User>(site_id, path),
      EntityKind::Tags => self.load_entity::<Tag>(site_id, path),
      EntityKind::Badges => self.load_entity::<Badge>(site_id, path),
      EntityKind::Posts => self.load_entity::<Post>(site_id, path),
      EntityKind::Comments => self.load_entity::<Comment>(site_id, path),
    }
  }

  /// Open the archive afresh and stream `T`'s entry into the store.
  fn load_entity<T: Table>(&mut self, site_id: SiteId, path: &Path) -> Result<u64> {
    let mut archive = A::open(path)?;
    let store = &mut self.store;
    archive.with_entry(T::KIND.entry_name(), |stream| -> Result<u64> {
      let records = RowReader::<_, T>::for_entity(BufReader::with_capacity(READ_BUFFER, stream));
      Ok(store.load(site_id, records)?)
    })
  }
}
