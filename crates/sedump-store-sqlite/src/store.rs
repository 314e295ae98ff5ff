//! [`SqliteStore`]: site identity and transactional loads over one SQLite
//! connection.

use std::{error::Error as StdError, path::Path, time::Duration};

use rusqlite::{Connection, ErrorCode, OptionalExtension as _, TransactionBehavior, params};
use sedump_core::{EntityKind, Site, SiteId};

use crate::{
  Error, Result,
  encode::table_name,
  load::{Table, bulk_load},
  schema::SCHEMA,
};

/// How long a writer waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A dump store backed by a single SQLite database.
pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and make sure the schema exists.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path)?;
    // WAL reports the resulting mode as a row, so it cannot go through
    // `execute_batch`.
    let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    tracing::debug!(journal_mode = %mode, "opened sqlite store");
    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    Self::with_connection(conn)
  }

  /// Open an in-memory store, for tests.
  pub fn open_in_memory() -> Result<Self> {
    Self::with_connection(Connection::open_in_memory()?)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    let store = Self { conn };
    store.ensure_schema()?;
    Ok(store)
  }

  /// Create any missing tables. Safe to call repeatedly.
  pub fn ensure_schema(&self) -> Result<()> {
    self.conn.execute_batch(SCHEMA)?;
    Ok(())
  }

  /// True while a transaction is open on the connection.
  pub fn in_transaction(&self) -> bool { !self.conn.is_autocommit() }

  #[cfg(test)]
  pub(crate) fn conn(&self) -> &Connection { &self.conn }

  // ── Sites ─────────────────────────────────────────────────────────────────

  /// Return the id of the site called `name`, creating the site if needed.
  ///
  /// Lookup and insert share one `IMMEDIATE` transaction, so two importers
  /// on the same database serialize on the write lock. If the insert still
  /// hits the unique constraint the result is [`Error::Conflict`].
  pub fn resolve_site(&mut self, name: &str) -> Result<SiteId> {
    let tx = self
      .conn
      .transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing: Option<SiteId> = tx
      .query_row("SELECT id FROM site WHERE name = ?1", params![name], |r| r.get(0))
      .optional()?;

    let id = match existing {
      Some(id) => id,
      None => {
        tx.execute("INSERT INTO site (name) VALUES (?1)", params![name])
          .map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Error::Conflict(name.to_owned()),
            _ => Error::Database(e),
          })?;
        let id = tx.last_insert_rowid();
        tracing::info!(site = name, site_id = id, "created site");
        id
      }
    };

    tx.commit()?;
    Ok(id)
  }

  pub fn get_site(&self, name: &str) -> Result<Option<Site>> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT id, name FROM site WHERE name = ?1",
          params![name],
          |r| Ok(Site { id: r.get(0)?, name: r.get(1)? }),
        )
        .optional()?,
    )
  }

  pub fn list_sites(&self) -> Result<Vec<Site>> {
    let mut stmt = self.conn.prepare("SELECT id, name FROM site ORDER BY id")?;
    let sites = stmt
      .query_map([], |r| Ok(Site { id: r.get(0)?, name: r.get(1)? }))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sites)
  }

  /// Delete every entity row owned by `site_id`, in one transaction.
  ///
  /// The site row itself is kept so its id survives the re-import. Returns
  /// the number of rows removed; a site with no rows is not an error.
  pub fn purge_site(&mut self, site_id: SiteId) -> Result<u64> {
    let tx = self.conn.transaction()?;
    let mut removed = 0u64;
    for kind in EntityKind::ALL {
      let table = table_name(kind);
      let n = tx.execute(
        &format!("DELETE FROM {table} WHERE site_id = ?1"),
        params![site_id],
      )?;
      removed += n as u64;
    }
    tx.commit()?;
    tracing::debug!(site_id, removed, "purged site rows");
    Ok(removed)
  }

  /// Number of `kind` rows stored for `site_id`.
  pub fn count_rows(&self, kind: EntityKind, site_id: SiteId) -> Result<u64> {
    let table = table_name(kind);
    let n: i64 = self.conn.query_row(
      &format!("SELECT COUNT(*) FROM {table} WHERE site_id = ?1"),
      params![site_id],
      |r| r.get(0),
    )?;
    Ok(n as u64)
  }

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Load a stream of `T` records for one site, all or nothing.
  ///
  /// Opens a transaction, bulk-inserts every record into `T::TABLE` and
  /// commits once the stream is exhausted. On a decode error or a rejected
  /// row the transaction is rolled back and nothing from this call is
  /// visible.
  pub fn load<T, I, E>(&mut self, site_id: SiteId, records: I) -> Result<u64>
  where
    T: Table,
    I: IntoIterator<Item = Result<T, E>>,
    E: StdError + Send + Sync + 'static,
  {
    let tx = self.conn.transaction()?;
    // Dropping `tx` on an error path rolls it back.
    let rows = bulk_load(&tx, T::TABLE, T::COLUMNS, site_id, records)?;
    tx.commit().map_err(|e| Error::LoadAborted {
      table:  T::TABLE.to_owned(),
      source: Box::new(e),
    })?;
    Ok(rows)
  }
}
