//! Sites, the namespace that owns every imported row.

use serde::{Deserialize, Serialize};

/// Store-assigned site identifier. Stable across re-imports of one name.
pub type SiteId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
  pub id:   SiteId,
  pub name: String,
}
