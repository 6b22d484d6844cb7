//! Encoding and decoding helpers between domain records and SQLite rows.
//!
//! Every table has an `id INTEGER PRIMARY KEY` followed by the columns named
//! in [`Table::COLUMNS`]. Statuses are stored as their uppercase names;
//! timestamps are stored as the already-formatted strings the lifecycle
//! produced.

use std::str::FromStr as _;

use bugtrack_core::{Bug, Project, Record, Status, User};
use rusqlite::{Row, types::Value};

use crate::{Error, Result};

// ─── Table mapping ───────────────────────────────────────────────────────────

/// How a [`Record`] type maps onto its SQLite table.
pub trait Table: Record {
  const TABLE: &'static str;
  /// Data columns in bind order, excluding `id`.
  const COLUMNS: &'static [&'static str];

  /// Column values read on the database thread, decoded afterwards.
  type Raw: Send + 'static;

  /// Read a row selected as `id, COLUMNS...`.
  fn read(row: &Row<'_>) -> rusqlite::Result<Self::Raw>;

  fn decode(raw: Self::Raw) -> Result<Self>;

  /// Values for [`Self::COLUMNS`], in order.
  fn encode(&self) -> Vec<Value>;
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn encode_status(status: Status) -> String { status.as_ref().to_owned() }

pub fn decode_status(table: &'static str, s: &str) -> Result<Status> {
  Status::from_str(s).map_err(|_| Error::Decode {
    table,
    column: "status",
    message: format!("unknown status: {s:?}"),
  })
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:       i64,
  pub name:     String,
  pub username: String,
  pub email:    String,
  pub password: String,
}

impl Table for User {
  const TABLE: &'static str = "users";
  const COLUMNS: &'static [&'static str] =
    &["name", "username", "email", "password"];

  type Raw = RawUser;

  fn read(row: &Row<'_>) -> rusqlite::Result<RawUser> {
    Ok(RawUser {
      id:       row.get(0)?,
      name:     row.get(1)?,
      username: row.get(2)?,
      email:    row.get(3)?,
      password: row.get(4)?,
    })
  }

  fn decode(raw: RawUser) -> Result<Self> {
    Ok(User {
      id:       Some(raw.id),
      name:     raw.name,
      username: raw.username,
      email:    raw.email,
      password: raw.password,
    })
  }

  fn encode(&self) -> Vec<Value> {
    vec![
      self.name.clone().into(),
      self.username.clone().into(),
      self.email.clone().into(),
      self.password.clone().into(),
    ]
  }
}

// ─── Projects ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `projects` row.
pub struct RawProject {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
  pub status:      String,
  pub owner_id:    i64,
}

impl Table for Project {
  const TABLE: &'static str = "projects";
  const COLUMNS: &'static [&'static str] =
    &["name", "description", "status", "owner_id"];

  type Raw = RawProject;

  fn read(row: &Row<'_>) -> rusqlite::Result<RawProject> {
    Ok(RawProject {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      status:      row.get(3)?,
      owner_id:    row.get(4)?,
    })
  }

  fn decode(raw: RawProject) -> Result<Self> {
    Ok(Project {
      id:          Some(raw.id),
      name:        raw.name,
      description: raw.description,
      status:      decode_status(Self::TABLE, &raw.status)?,
      owner_id:    raw.owner_id,
    })
  }

  fn encode(&self) -> Vec<Value> {
    vec![
      self.name.clone().into(),
      self.description.clone().into(),
      encode_status(self.status).into(),
      self.owner_id.into(),
    ]
  }
}

// ─── Bugs ────────────────────────────────────────────────────────────────────

/// Raw values read directly from a `bugs` row.
pub struct RawBug {
  pub id:          i64,
  pub summary:     String,
  pub description: Option<String>,
  pub status:      String,
  pub project_id:  i64,
  pub creator_id:  i64,
  pub created_at:  Option<String>,
  pub updated_at:  Option<String>,
  pub closed_at:   Option<String>,
}

impl Table for Bug {
  const TABLE: &'static str = "bugs";
  const COLUMNS: &'static [&'static str] = &[
    "summary",
    "description",
    "status",
    "project_id",
    "creator_id",
    "created_at",
    "updated_at",
    "closed_at",
  ];

  type Raw = RawBug;

  fn read(row: &Row<'_>) -> rusqlite::Result<RawBug> {
    Ok(RawBug {
      id:          row.get(0)?,
      summary:     row.get(1)?,
      description: row.get(2)?,
      status:      row.get(3)?,
      project_id:  row.get(4)?,
      creator_id:  row.get(5)?,
      created_at:  row.get(6)?,
      updated_at:  row.get(7)?,
      closed_at:   row.get(8)?,
    })
  }

  fn decode(raw: RawBug) -> Result<Self> {
    Ok(Bug {
      id:          Some(raw.id),
      summary:     raw.summary,
      description: raw.description,
      status:      decode_status(Self::TABLE, &raw.status)?,
      project_id:  raw.project_id,
      creator_id:  raw.creator_id,
      created_at:  raw.created_at,
      updated_at:  raw.updated_at,
      closed_at:   raw.closed_at,
    })
  }

  fn encode(&self) -> Vec<Value> {
    vec![
      self.summary.clone().into(),
      self.description.clone().into(),
      encode_status(self.status).into(),
      self.project_id.into(),
      self.creator_id.into(),
      self.created_at.clone().into(),
      self.updated_at.clone().into(),
      self.closed_at.clone().into(),
    ]
  }
}

// ─── SQL builders ────────────────────────────────────────────────────────────

pub fn select_sql<T: Table>() -> String {
  format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

/// Insert letting SQLite assign the id.
pub fn insert_sql<T: Table>() -> String {
  let placeholders: Vec<String> =
    (1..=T::COLUMNS.len()).map(|i| format!("?{i}")).collect();
  format!(
    "INSERT INTO {} ({}) VALUES ({})",
    T::TABLE,
    T::COLUMNS.join(", "),
    placeholders.join(", "),
  )
}

/// Insert-or-overwrite keyed on an explicit id bound as `?1`.
pub fn upsert_sql<T: Table>() -> String {
  let placeholders: Vec<String> =
    (1..=T::COLUMNS.len() + 1).map(|i| format!("?{i}")).collect();
  let assignments: Vec<String> = T::COLUMNS
    .iter()
    .map(|c| format!("{c} = excluded.{c}"))
    .collect();
  format!(
    "INSERT INTO {} (id, {}) VALUES ({})
     ON CONFLICT(id) DO UPDATE SET {}",
    T::TABLE,
    T::COLUMNS.join(", "),
    placeholders.join(", "),
    assignments.join(", "),
  )
}
