//! Record types for the five entity kinds of a data dump.
//!
//! Field names follow the dump's PascalCase attributes in snake case
//! (`WebsiteUrl` → `website_url`). `site_id` is not part of a record: rows
//! carry no site, the loader supplies it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{EntityKind, FromRow, Result, RowAttrs};

/// A record type that lives in its own archive entry.
pub trait Entity: FromRow {
  const KIND: EntityKind;

  /// Primary key within a site.
  fn id(&self) -> i64;
}

// ─── User ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id:                i64,
  pub reputation:        i64,
  pub creation_date:     NaiveDateTime,
  pub display_name:      Option<String>,
  pub last_access_date:  NaiveDateTime,
  pub website_url:       Option<String>,
  pub location:          Option<String>,
  pub about_me:          Option<String>,
  pub views:             i64,
  pub up_votes:          i64,
  pub down_votes:        i64,
  pub profile_image_url: Option<String>,
  pub account_id:        Option<i64>,
}

impl FromRow for User {
  fn from_row(row: &RowAttrs) -> Result<Self> {
    Ok(User {
      id:                row.required_int("Id")?,
      reputation:        row.required_int("Reputation")?,
      creation_date:     row.required_timestamp("CreationDate")?,
      display_name:      row.optional_str("DisplayName"),
      last_access_date:  row.required_timestamp("LastAccessDate")?,
      website_url:       row.optional_str("WebsiteUrl"),
      location:          row.optional_str("Location"),
      about_me:          row.optional_str("AboutMe"),
      views:             row.required_int("Views")?,
      up_votes:          row.required_int("UpVotes")?,
      down_votes:        row.required_int("DownVotes")?,
      profile_image_url: row.optional_str("ProfileImageUrl"),
      account_id:        row.optional_int("AccountId")?,
    })
  }
}

impl Entity for User {
  const KIND: EntityKind = EntityKind::Users;

  fn id(&self) -> i64 { self.id }
}

// ─── Tag ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
  pub id:              i64,
  pub tag_name:        String,
  pub count:           i64,
  pub excerpt_post_id: Option<i64>,
  pub wiki_post_id:    Option<i64>,
}

impl FromRow for Tag {
  fn from_row(row: &RowAttrs) -> Result<Self> {
    Ok(Tag {
      id:              row.required_int("Id")?,
      tag_name:        row.required_str("TagName")?,
      count:           row.required_int("Count")?,
      excerpt_post_id: row.optional_int("ExcerptPostId")?,
      wiki_post_id:    row.optional_int("WikiPostId")?,
    })
  }
}

impl Entity for Tag {
  const KIND: EntityKind = EntityKind::Tags;

  fn id(&self) -> i64 { self.id }
}

// ─── Badge ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
  pub id:        i64,
  pub user_id:   i64,
  pub name:      String,
  pub date:      NaiveDateTime,
  /// 1 = gold, 2 = silver, 3 = bronze.
  pub class:     i64,
  pub tag_based: bool,
}

impl FromRow for Badge {
  fn from_row(row: &RowAttrs) -> Result<Self> {
    Ok(Badge {
      id:        row.required_int("Id")?,
      user_id:   row.required_int("UserId")?,
      name:      row.required_str("Name")?,
      date:      row.required_timestamp("Date")?,
      class:     row.required_int("Class")?,
      tag_based: row.required_bool("TagBased")?,
    })
  }
}

impl Entity for Badge {
  const KIND: EntityKind = EntityKind::Badges;

  fn id(&self) -> i64 { self.id }
}

// ─── Post ────────────────────────────────────────────────────────────────────

/// A question, answer, wiki excerpt or other post.
///
/// Attributes that only some post types carry (titles and tags on questions,
/// parent ids on answers, edit and close dates) are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
  pub id:                   i64,
  pub post_type_id:         i64,
  pub accepted_answer_id:   Option<i64>,
  pub parent_id:            Option<i64>,
  pub creation_date:        NaiveDateTime,
  pub score:                i64,
  pub view_count:           Option<i64>,
  pub body:                 String,
  pub owner_user_id:        Option<i64>,
  pub last_activity_date:   NaiveDateTime,
  pub title:                Option<String>,
  pub tags:                 Option<String>,
  pub answer_count:         Option<i64>,
  pub comment_count:        Option<i64>,
  pub favorite_count:       Option<i64>,
  pub last_editor_user_id:  Option<i64>,
  pub last_edit_date:       Option<NaiveDateTime>,
  pub community_owned_date: Option<NaiveDateTime>,
  pub closed_date:          Option<NaiveDateTime>,
  pub owner_display_name:   Option<String>,
}

impl FromRow for Post {
  fn from_row(row: &RowAttrs) -> Result<Self> {
    Ok(Post {
      id:                   row.required_int("Id")?,
      post_type_id:         row.required_int("PostTypeId")?,
      accepted_answer_id:   row.optional_int("AcceptedAnswerId")?,
      parent_id:            row.optional_int("ParentId")?,
      creation_date:        row.required_timestamp("CreationDate")?,
      score:                row.required_int("Score")?,
      view_count:           row.optional_int("ViewCount")?,
      body:                 row.required_str("Body")?,
      owner_user_id:        row.optional_int("OwnerUserId")?,
      last_activity_date:   row.required_timestamp("LastActivityDate")?,
      title:                row.optional_str("Title"),
      tags:                 row.optional_str("Tags"),
      answer_count:         row.optional_int("AnswerCount")?,
      comment_count:        row.optional_int("CommentCount")?,
      favorite_count:       row.optional_int("FavoriteCount")?,
      last_editor_user_id:  row.optional_int("LastEditorUserId")?,
      last_edit_date:       row.optional_timestamp("LastEditDate")?,
      community_owned_date: row.optional_timestamp("CommunityOwnedDate")?,
      closed_date:          row.optional_timestamp("ClosedDate")?,
      owner_display_name:   row.optional_str("OwnerDisplayName"),
    })
  }
}

impl Entity for Post {
  const KIND: EntityKind = EntityKind::Posts;

  fn id(&self) -> i64 { self.id }
}

// ─── Comment ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id:                i64,
  pub post_id:           i64,
  pub score:             i64,
  pub text:              String,
  pub creation_date:     NaiveDateTime,
  pub user_display_name: Option<String>,
  pub user_id:           Option<i64>,
}

impl FromRow for Comment {
  fn from_row(row: &RowAttrs) -> Result<Self> {
    Ok(Comment {
      id:                row.required_int("Id")?,
      post_id:           row.required_int("PostId")?,
      score:             row.required_int("Score")?,
      text:              row.required_str("Text")?,
      creation_date:     row.required_timestamp("CreationDate")?,
      user_display_name: row.optional_str("UserDisplayName"),
      user_id:           row.optional_int("UserId")?,
    })
  }
}

impl Entity for Comment {
  const KIND: EntityKind = EntityKind::Comments;

  fn id(&self) -> i64 { self.id }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn user_row() -> RowAttrs {
    [
      ("Id", "1"),
      ("Reputation", "101"),
      ("CreationDate", "2010-07-28T16:38:27.683"),
      ("DisplayName", "Community"),
      ("LastAccessDate", "2010-07-28T16:38:27.683"),
      ("Location", "on the server farm"),
      ("AboutMe", "<p>Hi, I'm not really a person.</p>"),
      ("Views", "0"),
      ("UpVotes", "5007"),
      ("DownVotes", "1920"),
      ("AccountId", "-1"),
    ]
    .into_iter()
    .collect()
  }

  #[test]
  fn user_from_row() {
    let user = User::from_row(&user_row()).unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.display_name.as_deref(), Some("Community"));
    assert_eq!(user.website_url, None);
    assert_eq!(user.profile_image_url, None);
    assert_eq!(user.account_id, Some(-1));
    assert_eq!(user.up_votes, 5007);
  }

  #[test]
  fn user_empty_website_is_some_empty() {
    let mut row = user_row();
    row.push("WebsiteUrl", "");
    let user = User::from_row(&row).unwrap();
    assert_eq!(user.website_url, Some(String::new()));
  }

  #[test]
  fn unknown_attributes_are_ignored() {
    let mut row = user_row();
    row.push("ContentLicense", "CC BY-SA 4.0");
    assert!(User::from_row(&row).is_ok());
  }

  #[test]
  fn user_missing_reputation() {
    let row: RowAttrs = [("Id", "1")].into_iter().collect();
    assert_eq!(
      User::from_row(&row).unwrap_err(),
      Error::MissingField { field: "Reputation" }
    );
  }

  #[test]
  fn badge_tag_based() {
    let row: RowAttrs = [
      ("Id", "82946"),
      ("UserId", "3718"),
      ("Name", "Autobiographer"),
      ("Date", "2008-09-15T08:55:03.923"),
      ("Class", "3"),
      ("TagBased", "False"),
    ]
    .into_iter()
    .collect();
    let badge = Badge::from_row(&row).unwrap();
    assert!(!badge.tag_based);
    assert_eq!(badge.class, 3);
  }

  #[test]
  fn answer_post_without_title() {
    let row: RowAttrs = [
      ("Id", "5"),
      ("PostTypeId", "2"),
      ("ParentId", "1"),
      ("CreationDate", "2014-05-14T00:36:31.077"),
      ("Score", "9"),
      ("Body", "<p>Answer</p>"),
      ("OwnerUserId", "5"),
      ("LastActivityDate", "2014-05-14T00:36:31.077"),
      ("CommentCount", "1"),
    ]
    .into_iter()
    .collect();
    let post = Post::from_row(&row).unwrap();
    assert_eq!(post.parent_id, Some(1));
    assert_eq!(post.title, None);
    assert_eq!(post.closed_date, None);
    assert_eq!(post.comment_count, Some(1));
  }

  #[test]
  fn comment_bad_score() {
    let row: RowAttrs = [
      ("Id", "1"),
      ("PostId", "3"),
      ("Score", "high"),
      ("Text", "nice"),
      ("CreationDate", "2014-05-14T00:23:15.437"),
    ]
    .into_iter()
    .collect();
    assert_eq!(Comment::from_row(&row).unwrap_err().field(), "Score");
  }
}
