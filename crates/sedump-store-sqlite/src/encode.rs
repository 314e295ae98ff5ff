//! Column mappings between entity records and their SQLite tables.
//!
//! Timestamps are written with [`format_timestamp`] (three fraction digits),
//! booleans as `0`/`1`, optional fields as NULL when absent. Each `COLUMNS`
//! list is the exact order of the `params!` bound in `insert`.

use rusqlite::{Statement, params};
use sedump_core::{
  Badge, Comment, EntityKind, Post, SiteId, Tag, User, value::format_timestamp,
};

use crate::load::Table;

/// Destination table of each entity kind.
pub fn table_name(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::Users => User::TABLE,
    EntityKind::Tags => Tag::TABLE,
    EntityKind::Badges => Badge::TABLE,
    EntityKind::Posts => Post::TABLE,
    EntityKind::Comments => Comment::TABLE,
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

impl Table for User {
  const TABLE: &'static str = "users";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "site_id",
    "reputation",
    "creation_date",
    "display_name",
    "last_access_date",
    "website_url",
    "location",
    "about_me",
    "views",
    "up_votes",
    "down_votes",
    "profile_image_url",
    "account_id",
  ];

  fn insert(&self, site_id: SiteId, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
    stmt.execute(params![
      self.id,
      site_id,
      self.reputation,
      format_timestamp(&self.creation_date),
      self.display_name,
      format_timestamp(&self.last_access_date),
      self.website_url,
      self.location,
      self.about_me,
      self.views,
      self.up_votes,
      self.down_votes,
      self.profile_image_url,
      self.account_id,
    ])
  }
}

// ─── Tag ─────────────────────────────────────────────────────────────────────

impl Table for Tag {
  const TABLE: &'static str = "tags";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "site_id",
    "tag_name",
    "count",
    "excerpt_post_id",
    "wiki_post_id",
  ];

  fn insert(&self, site_id: SiteId, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
    stmt.execute(params![
      self.id,
      site_id,
      self.tag_name,
      self.count,
      self.excerpt_post_id,
      self.wiki_post_id,
    ])
  }
}

// ─── Badge ───────────────────────────────────────────────────────────────────

impl Table for Badge {
  const TABLE: &'static str = "badges";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "site_id",
    "user_id",
    "name",
    "date",
    "class",
    "tag_based",
  ];

  fn insert(&self, site_id: SiteId, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
    stmt.execute(params![
      self.id,
      site_id,
      self.user_id,
      self.name,
      format_timestamp(&self.date),
      self.class,
      self.tag_based,
    ])
  }
}

// ─── Post ────────────────────────────────────────────────────────────────────

impl Table for Post {
  const TABLE: &'static str = "posts";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "site_id",
    "post_type_id",
    "accepted_answer_id",
    "parent_id",
    "creation_date",
    "score",
    "view_count",
    "body",
    "owner_user_id",
    "last_activity_date",
    "title",
    "tags",
    "answer_count",
    "comment_count",
    "favorite_count",
    "last_editor_user_id",
    "last_edit_date",
    "community_owned_date",
    "closed_date",
    "owner_display_name",
  ];

  fn insert(&self, site_id: SiteId, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
    stmt.execute(params![
      self.id,
      site_id,
      self.post_type_id,
      self.accepted_answer_id,
      self.parent_id,
      format_timestamp(&self.creation_date),
      self.score,
      self.view_count,
      self.body,
      self.owner_user_id,
      format_timestamp(&self.last_activity_date),
      self.title,
      self.tags,
      self.answer_count,
      self.comment_count,
      self.favorite_count,
      self.last_editor_user_id,
      self.last_edit_date.as_ref().map(format_timestamp),
      self.community_owned_date.as_ref().map(format_timestamp),
      self.closed_date.as_ref().map(format_timestamp),
      self.owner_display_name,
    ])
  }
}

// ─── Comment ─────────────────────────────────────────────────────────────────

impl Table for Comment {
  const TABLE: &'static str = "comments";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "site_id",
    "post_id",
    "score",
    "text",
    "creation_date",
    "user_display_name",
    "user_id",
  ];

  fn insert(&self, site_id: SiteId, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
    stmt.execute(params![
      self.id,
      site_id,
      self.post_id,
      self.score,
      self.text,
      format_timestamp(&self.creation_date),
      self.user_display_name,
      self.user_id,
    ])
  }
}
