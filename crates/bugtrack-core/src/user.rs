//! User: an account that owns projects and reports bugs.

use serde::{Deserialize, Serialize};

use crate::record::{EntityKind, Record};

/// Users have no lifecycle; create and replace store them as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       Option<i64>,
  pub name:     String,
  pub username: String,
  pub email:    String,
  /// Stored verbatim and never echoed back in responses.
  #[serde(skip_serializing, default)]
  pub password: String,
}

impl Record for User {
  const KIND: EntityKind = EntityKind::User;

  fn id(&self) -> Option<i64> { self.id }

  fn set_id(&mut self, id: Option<i64>) { self.id = id; }
}
