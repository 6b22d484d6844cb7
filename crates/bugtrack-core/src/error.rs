//! Error types for `bugtrack-core`.

use thiserror::Error;

use crate::record::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("could not find {entity} {id}")]
  NotFound { entity: EntityKind, id: i64 },

  #[error("{entity} {id} is closed")]
  AlreadyClosed { entity: EntityKind, id: i64 },

  /// A required field is missing, blank, or refers to an unknown record.
  #[error("{field} {reason}")]
  ValidationFailed { field: &'static str, reason: String },

  #[error("invalid page parameters: page={page}, size={size}")]
  InvalidPageParameters { page: i64, size: i64 },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a storage backend error.
  pub fn storage<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(e))
  }

  pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
    Self::ValidationFailed { field, reason: reason.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
