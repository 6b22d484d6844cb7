//! The lifecycle service: creation defaults, replace semantics, and the
//! close guard.
//!
//! One generic [`Service`] serves every record type. Per-type behaviour
//! (forcing OPEN, stamping timestamps) lives in the [`Record`] impls; the
//! service owns sequencing, existence checks, and consistency.
//!
//! Replace and close read the stored record before writing it back. Both
//! run under a per-id lock, and close persists through
//! [`StatusRepository::compare_and_set_status`], so concurrent closes of the
//! same record produce exactly one success.

use std::{marker::PhantomData, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
  bug::Bug,
  clock::{Clock, SystemClock},
  lifecycle::Lifecycle,
  lock::KeyedLock,
  page::{Page, PagePolicy},
  project::Project,
  record::Record,
  store::{Repository, StatusRepository},
  user::User,
  Error, Result,
};

pub type UserService<S> = Service<User, S>;
pub type ProjectService<S> = Service<Project, S>;
pub type BugService<S> = Service<Bug, S>;

/// Lifecycle operations for one record type over a storage backend.
pub struct Service<T, S> {
  store:   Arc<S>,
  clock:   Arc<dyn Clock>,
  policy:  PagePolicy,
  locks:   KeyedLock,
  _record: PhantomData<fn() -> T>,
}

impl<T: Record, S: Repository<T>> Service<T, S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      clock: Arc::new(SystemClock),
      policy: PagePolicy::default(),
      locks: KeyedLock::default(),
      _record: PhantomData,
    }
  }

  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  pub fn with_policy(mut self, policy: PagePolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn policy(&self) -> PagePolicy { self.policy }

  /// One page of all records in storage order.
  pub async fn list_page(&self, page: i64, size: i64) -> Result<Page<T>> {
    let request = self.policy.request(page, size)?;
    self.store.find_page(request).await.map_err(Error::storage)
  }

  pub async fn find_by_id(&self, id: i64) -> Result<Option<T>> {
    self.store.find_by_id(id).await.map_err(Error::storage)
  }

  /// Like [`find_by_id`](Self::find_by_id), but a missing record is
  /// [`Error::NotFound`].
  pub async fn get_by_id(&self, id: i64) -> Result<T> {
    self
      .find_by_id(id)
      .await?
      .ok_or(Error::NotFound { entity: T::KIND, id })
  }

  /// Persist a new record. Any caller-supplied id is discarded; storage
  /// assigns one.
  pub async fn create(&self, mut record: T) -> Result<T> {
    record.set_id(None);
    record.prepare_create(&self.clock.stamp());
    let saved = self.store.save(record).await.map_err(Error::storage)?;
    debug!(entity = %T::KIND, id = ?saved.id(), "created");
    Ok(saved)
  }

  /// Overwrite the record stored under `id` with `record`, keeping `id`.
  pub async fn replace(&self, mut record: T, id: i64) -> Result<T> {
    let _guard = self.locks.lock(id).await;
    let stored = self.get_by_id(id).await?;

    record.set_id(Some(id));
    let transition = record.prepare_replace(&stored, &self.clock.stamp());
    let saved = self.store.save(record).await.map_err(Error::storage)?;

    if transition.is_close() {
      info!(entity = %T::KIND, id, "closed by replace");
    } else {
      debug!(entity = %T::KIND, id, "replaced");
    }
    Ok(saved)
  }

  /// Remove the record stored under `id`. Unknown ids are not an error at
  /// this layer; callers check existence first when they need `NotFound`.
  pub async fn delete(&self, id: i64) -> Result<()> {
    let _guard = self.locks.lock(id).await;
    self.store.delete_by_id(id).await.map_err(Error::storage)?;
    debug!(entity = %T::KIND, id, "deleted");
    Ok(())
  }
}

impl<T: Lifecycle, S: StatusRepository<T>> Service<T, S> {
  /// Move the record stored under `id` from OPEN to CLOSED.
  ///
  /// Only the status changes; timestamps are left as they are.
  pub async fn close(&self, id: i64) -> Result<()> {
    let _guard = self.locks.lock(id).await;
    let stored = self.get_by_id(id).await?;

    let current = stored.status();
    let Some(next) = current.close() else {
      warn!(entity = %T::KIND, id, "close rejected: already closed");
      return Err(Error::AlreadyClosed { entity: T::KIND, id });
    };

    let swapped = self
      .store
      .compare_and_set_status(id, current, next)
      .await
      .map_err(Error::storage)?;

    if !swapped {
      // Another writer got there between our read and the swap.
      return match self.find_by_id(id).await? {
        None => Err(Error::NotFound { entity: T::KIND, id }),
        Some(_) => {
          warn!(entity = %T::KIND, id, "close rejected: status changed");
          Err(Error::AlreadyClosed { entity: T::KIND, id })
        }
      };
    }

    info!(entity = %T::KIND, id, "closed");
    Ok(())
  }
}
