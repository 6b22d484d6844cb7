//! Bug: a reported defect against a project.
//!
//! Bugs are the only records with timestamps. They are stored as formatted
//! strings (see [`crate::clock::TIMESTAMP_FORMAT`]) and each stays `None`
//! until the lifecycle sets it:
//!
//! - `created_at` on create,
//! - `updated_at` on every replace,
//! - `closed_at` when a replace moves the bug OPEN → CLOSED.
//!
//! An explicit close only flips the status; it does not set `closed_at`.

use serde::{Deserialize, Serialize};

use crate::{
  lifecycle::{Lifecycle, Status, Transition},
  record::{EntityKind, Record},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bug {
  pub id:          Option<i64>,
  pub summary:     String,
  pub description: Option<String>,
  pub status:      Status,
  pub project_id:  i64,
  /// The [`User`](crate::user::User) who reported the bug.
  pub creator_id:  i64,
  pub created_at:  Option<String>,
  pub updated_at:  Option<String>,
  pub closed_at:   Option<String>,
}

impl Record for Bug {
  const KIND: EntityKind = EntityKind::Bug;

  fn id(&self) -> Option<i64> { self.id }

  fn set_id(&mut self, id: Option<i64>) { self.id = id; }

  fn prepare_create(&mut self, now: &str) {
    self.status = Status::Open;
    self.created_at = Some(now.to_owned());
    self.updated_at = None;
    self.closed_at = None;
  }

  fn prepare_replace(&mut self, stored: &Self, now: &str) -> Transition {
    let transition = stored.status.transition_to(self.status);
    if transition.is_close() {
      self.closed_at = Some(now.to_owned());
    }
    self.updated_at = Some(now.to_owned());
    transition
  }
}

impl Lifecycle for Bug {
  fn status(&self) -> Status { self.status }

  fn set_status(&mut self, status: Status) { self.status = status; }
}
