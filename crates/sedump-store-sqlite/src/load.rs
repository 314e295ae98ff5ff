//! Transactional bulk loading of a record stream into one table.

use std::error::Error as StdError;

use rusqlite::{Statement, Transaction};
use sedump_core::{Entity, SiteId};

use crate::{Error, Result};

const PROGRESS_EVERY: u64 = 100_000;

/// An entity with a destination table.
///
/// `COLUMNS` is the positional order `insert` binds values in; it always
/// starts with `id, site_id`.
pub trait Table: Entity {
  const TABLE: &'static str;
  const COLUMNS: &'static [&'static str];

  /// Execute `stmt` (an insert over `COLUMNS`) for this record.
  fn insert(&self, site_id: SiteId, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

/// `INSERT INTO table (a, b) VALUES (?1, ?2)`
pub(crate) fn insert_sql(table: &str, columns: &[&str]) -> String {
  let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
  format!(
    "INSERT INTO {table} ({}) VALUES ({})",
    columns.join(", "),
    placeholders.join(", ")
  )
}

fn abort(table: &str, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Error {
  Error::LoadAborted {
    table:  table.to_owned(),
    source: source.into(),
  }
}

/// Insert every record of `records` into `table` within `tx`.
///
/// `table` and `columns` must be `T::TABLE` and `T::COLUMNS`, the order
/// `T::insert` binds in; anything else fails with [`Error::Layout`] before a
/// row is read. The insert statement is prepared once and reused for every
/// row. Returns the number of rows inserted. The first upstream error or
/// rejected row stops the load with [`Error::LoadAborted`]; committing or
/// rolling back `tx` is the caller's decision.
pub fn bulk_load<T, I, E>(
  tx: &Transaction<'_>,
  table: &str,
  columns: &[&str],
  site_id: SiteId,
  records: I,
) -> Result<u64>
where
  T: Table,
  I: IntoIterator<Item = Result<T, E>>,
  E: StdError + Send + Sync + 'static,
{
  if table != T::TABLE || columns != T::COLUMNS {
    return Err(Error::Layout {
      table:   table.to_owned(),
      columns: columns.iter().map(|c| (*c).to_owned()).collect(),
    });
  }

  let sql = insert_sql(table, columns);
  let mut stmt = tx.prepare_cached(&sql).map_err(|e| abort(table, e))?;

  let mut rows = 0u64;
  for record in records {
    let record = record.map_err(|e| abort(table, e))?;
    let changed = record
      .insert(site_id, &mut stmt)
      .map_err(|e| abort(table, RowRejected { id: record.id(), source: e }))?;
    rows += changed as u64;

    if rows % PROGRESS_EVERY == 0 {
      tracing::debug!(table, site_id, rows, "bulk load progress");
    }
  }

  Ok(rows)
}

/// A single row the database refused, e.g. a duplicate `(id, site_id)`.
#[derive(Debug, thiserror::Error)]
#[error("row with id {id} rejected: {source}")]
pub struct RowRejected {
  pub id:     i64,
  #[source]
  pub source: rusqlite::Error,
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;

  use rusqlite::Connection;
  use sedump_core::Tag;

  use super::*;
  use crate::schema::SCHEMA;

  fn tag(id: i64) -> Result<Tag, Infallible> {
    Ok(Tag {
      id,
      tag_name: format!("tag{id}"),
      count: 1,
      excerpt_post_id: None,
      wiki_post_id: None,
    })
  }

  fn with_site() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(SCHEMA).unwrap();
    conn.execute("INSERT INTO site (id, name) VALUES (1, 'gaming')", []).unwrap();
    conn
  }

  #[test]
  fn loads_with_the_record_layout() {
    let mut conn = with_site();
    let tx = conn.transaction().unwrap();
    let rows = bulk_load(&tx, Tag::TABLE, Tag::COLUMNS, 1, [tag(1), tag(2)]).unwrap();
    assert_eq!(rows, 2);
  }

  #[test]
  fn reordered_columns_are_refused() {
    let mut conn = with_site();
    let tx = conn.transaction().unwrap();
    let mut columns = Tag::COLUMNS.to_vec();
    columns.swap(2, 3);

    let err = bulk_load(&tx, Tag::TABLE, &columns, 1, [tag(1)]).unwrap_err();
    assert!(matches!(err, Error::Layout { ref table, .. } if table == "tags"));

    let count: i64 = tx
      .query_row("SELECT COUNT(*) FROM tags", [], |r| r.get(0))
      .unwrap();
    assert_eq!(count, 0);
  }

  #[test]
  fn other_table_is_refused() {
    let mut conn = with_site();
    let tx = conn.transaction().unwrap();
    let err = bulk_load(&tx, "users", Tag::COLUMNS, 1, [tag(1)]).unwrap_err();
    assert!(matches!(err, Error::Layout { .. }));
  }

  #[test]
  fn insert_sql_numbers_placeholders() {
    assert_eq!(
      insert_sql("tags", &["id", "site_id", "tag_name"]),
      "INSERT INTO tags (id, site_id, tag_name) VALUES (?1, ?2, ?3)"
    );
  }
}
