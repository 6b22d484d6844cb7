//! Project: a container for bugs, owned by a user.

use serde::{Deserialize, Serialize};

use crate::{
  lifecycle::{Lifecycle, Status, Transition},
  record::{EntityKind, Record},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
  pub id:          Option<i64>,
  pub name:        String,
  pub description: Option<String>,
  pub status:      Status,
  /// The owning [`User`](crate::user::User).
  pub owner_id:    i64,
}

impl Record for Project {
  const KIND: EntityKind = EntityKind::Project;

  fn id(&self) -> Option<i64> { self.id }

  fn set_id(&mut self, id: Option<i64>) { self.id = id; }

  fn prepare_create(&mut self, _now: &str) { self.status = Status::Open; }

  fn prepare_replace(&mut self, stored: &Self, _now: &str) -> Transition {
    stored.status.transition_to(self.status)
  }
}

impl Lifecycle for Project {
  fn status(&self) -> Status { self.status }

  fn set_status(&mut self, status: Status) { self.status = status; }
}
