//! SQL schema for the dump store.
//!
//! Executed every time a store is opened; idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`. Entity tables are keyed by `(id, site_id)`
//! because ids restart for every site. Timestamps are TEXT in
//! `YYYY-MM-DDTHH:MM:SS.fff` form, which sorts chronologically.

pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS site (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT    NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS users (
    id                INTEGER NOT NULL,
    site_id           INTEGER NOT NULL REFERENCES site(id) ON DELETE CASCADE,
    reputation        INTEGER NOT NULL,
    creation_date     TEXT    NOT NULL,
    display_name      TEXT,
    last_access_date  TEXT    NOT NULL,
    website_url       TEXT,
    location          TEXT,
    about_me          TEXT,
    views             INTEGER NOT NULL,
    up_votes          INTEGER NOT NULL,
    down_votes        INTEGER NOT NULL,
    profile_image_url TEXT,
    account_id        INTEGER,
    PRIMARY KEY (id, site_id)
);

CREATE TABLE IF NOT EXISTS tags (
    id              INTEGER NOT NULL,
    site_id         INTEGER NOT NULL REFERENCES site(id) ON DELETE CASCADE,
    tag_name        TEXT    NOT NULL,
    count           INTEGER NOT NULL,
    excerpt_post_id INTEGER,
    wiki_post_id    INTEGER,
    PRIMARY KEY (id, site_id)
);

CREATE TABLE IF NOT EXISTS badges (
    id        INTEGER NOT NULL,
    site_id   INTEGER NOT NULL REFERENCES site(id) ON DELETE CASCADE,
    user_id   INTEGER NOT NULL,
    name      TEXT    NOT NULL,
    date      TEXT    NOT NULL,
    class     INTEGER NOT NULL,   -- 1 gold, 2 silver, 3 bronze
    tag_based INTEGER NOT NULL,   -- 0 | 1
    PRIMARY KEY (id, site_id)
);

CREATE TABLE IF NOT EXISTS posts (
    id                   INTEGER NOT NULL,
    site_id              INTEGER NOT NULL REFERENCES site(id) ON DELETE CASCADE,
    post_type_id         INTEGER NOT NULL,
    accepted_answer_id   INTEGER,
    parent_id            INTEGER,
    creation_date        TEXT    NOT NULL,
    score                INTEGER NOT NULL,
    view_count           INTEGER,
    body                 TEXT    NOT NULL,
    owner_user_id        INTEGER,
    last_activity_date   TEXT    NOT NULL,
    title                TEXT,
    tags                 TEXT,
    answer_count         INTEGER,
    comment_count        INTEGER,
    favorite_count       INTEGER,
    last_editor_user_id  INTEGER,
    last_edit_date       TEXT,
    community_owned_date TEXT,
    closed_date          TEXT,
    owner_display_name   TEXT,
    PRIMARY KEY (id, site_id)
);

CREATE TABLE IF NOT EXISTS comments (
    id                INTEGER NOT NULL,
    site_id           INTEGER NOT NULL REFERENCES site(id) ON DELETE CASCADE,
    post_id           INTEGER NOT NULL,
    score             INTEGER NOT NULL,
    text              TEXT    NOT NULL,
    creation_date     TEXT    NOT NULL,
    user_display_name TEXT,
    user_id           INTEGER,
    PRIMARY KEY (id, site_id)
);

CREATE INDEX IF NOT EXISTS users_site_idx    ON users(site_id);
CREATE INDEX IF NOT EXISTS tags_site_idx     ON tags(site_id);
CREATE INDEX IF NOT EXISTS badges_site_idx   ON badges(site_id);
CREATE INDEX IF NOT EXISTS posts_site_idx    ON posts(site_id);
CREATE INDEX IF NOT EXISTS comments_site_idx ON comments(site_id);
";
