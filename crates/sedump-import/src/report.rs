//! Per-site import summaries.

use std::time::Duration;

use sedump_core::{EntityKind, SiteId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
  pub entity:     EntityKind,
  pub rows:       u64,
  pub elapsed_ms: u64,
}

/// Outcome of one successfully imported site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteReport {
  pub site:       String,
  pub site_id:    SiteId,
  /// Rows removed by the purge before loading.
  pub purged:     u64,
  pub entities:   Vec<EntityReport>,
  pub elapsed_ms: u64,
}

impl SiteReport {
  pub fn total_rows(&self) -> u64 { self.entities.iter().map(|e| e.rows).sum() }

  pub fn rows(&self, entity: EntityKind) -> Option<u64> {
    self
      .entities
      .iter()
      .find(|e| e.entity == entity)
      .map(|e| e.rows)
  }
}

/// A site skipped in `keep_going` mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteFailure {
  pub site:  String,
  pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
  pub sites:  Vec<SiteReport>,
  pub failed: Vec<SiteFailure>,
}

impl RunReport {
  pub fn is_success(&self) -> bool { self.failed.is_empty() }
}

pub(crate) fn millis(d: Duration) -> u64 { u64::try_from(d.as_millis()).unwrap_or(u64::MAX) }
