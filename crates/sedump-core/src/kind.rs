//! The five entity kinds found in a data-dump archive.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Element name of every record inside a container.
pub const ROW_TAG: &str = "row";

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumIter,
  EnumString,
  Serialize,
  Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Users,
  Tags,
  Badges,
  Posts,
  Comments,
}

impl EntityKind {
  /// Every kind, in the order the importer loads them.
  pub const ALL: [EntityKind; 5] = [
    EntityKind::Users,
    EntityKind::Tags,
    EntityKind::Badges,
    EntityKind::Posts,
    EntityKind::Comments,
  ];

  /// Name of the archive entry holding this kind, e.g. `Users.xml`.
  pub fn entry_name(self) -> &'static str {
    match self {
      EntityKind::Users => "Users.xml",
      EntityKind::Tags => "Tags.xml",
      EntityKind::Badges => "Badges.xml",
      EntityKind::Posts => "Posts.xml",
      EntityKind::Comments => "Comments.xml",
    }
  }

  /// Name of the container element wrapping the rows, e.g. `users`.
  pub fn root_tag(self) -> &'static str {
    match self {
      EntityKind::Users => "users",
      EntityKind::Tags => "tags",
      EntityKind::Badges => "badges",
      EntityKind::Posts => "posts",
      EntityKind::Comments => "comments",
    }
  }
}
