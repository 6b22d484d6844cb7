//! Error type for `bugtrack-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored column could not be mapped back to a domain value.
  #[error("decode error in {table}.{column}: {message}")]
  Decode {
    table:   &'static str,
    column:  &'static str,
    message: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
