//! The storage gateway traits.
//!
//! The traits are implemented by storage backends (e.g.
//! `bugtrack-store-sqlite`, or [`MemoryStore`](crate::memory::MemoryStore)).
//! The lifecycle service and the HTTP layer depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  bug::Bug,
  lifecycle::{Lifecycle, Status},
  page::{Page, PageRequest},
  project::Project,
  record::Record,
  user::User,
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Durable keyed storage for one record type.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait Repository<T: Record>: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a record by id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<T>, Self::Error>> + Send + '_;

  /// One page of all records in ascending id order, with the total count.
  fn find_page(
    &self,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<T>, Self::Error>> + Send + '_;

  /// Insert when `record.id()` is unset or unknown, otherwise overwrite the
  /// stored row. Returns the record with its id assigned.
  fn save(
    &self,
    record: T,
  ) -> impl Future<Output = Result<T, Self::Error>> + Send + '_;

  /// Remove a record. Deleting an unknown id is not an error.
  fn delete_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Status updates for records with a lifecycle.
pub trait StatusRepository<T: Lifecycle>: Repository<T> {
  /// Set the status of `id` to `next` only if it is currently `expected`.
  ///
  /// Returns `false` when the row is missing or its status differs; no other
  /// column is written.
  fn compare_and_set_status(
    &self,
    id: i64,
    expected: Status,
    next: Status,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// A backend that stores every entity the tracker knows about.
pub trait TrackerStore:
  Repository<User>
  + Repository<Project>
  + Repository<Bug>
  + StatusRepository<Project>
  + StatusRepository<Bug>
  + 'static
{
}

impl<S> TrackerStore for S where
  S: Repository<User>
    + Repository<Project>
    + Repository<Bug>
    + StatusRepository<Project>
    + StatusRepository<Bug>
    + 'static
{
}
