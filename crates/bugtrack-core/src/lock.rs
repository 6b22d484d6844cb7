//! Per-id mutual exclusion for read-modify-write sequences.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A set of async mutexes keyed by record id.
///
/// Slots are created on demand and dropped once no task holds or awaits
/// them.
#[derive(Debug, Default)]
pub struct KeyedLock {
  slots: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl KeyedLock {
  /// Wait for exclusive access to `id`. Released when the guard drops.
  pub async fn lock(&self, id: i64) -> OwnedMutexGuard<()> {
    let slot = {
      let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
      slots.retain(|_, slot| Arc::strong_count(slot) > 1);
      Arc::clone(slots.entry(id).or_default())
    };
    slot.lock_owned().await
  }

  /// Number of ids with a live slot.
  pub fn len(&self) -> usize {
    self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  #[tokio::test]
  async fn same_id_is_exclusive() {
    let locks = Arc::new(KeyedLock::default());
    let guard = locks.lock(1).await;

    let waiter = {
      let locks = Arc::clone(&locks);
      tokio::spawn(async move {
        let _g = locks.lock(1).await;
      })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    drop(guard);
    waiter.await.unwrap();
  }

  #[tokio::test]
  async fn different_ids_do_not_block() {
    let locks = KeyedLock::default();
    let _a = locks.lock(1).await;
    let _b = locks.lock(2).await;
    assert_eq!(locks.len(), 2);
  }

  #[tokio::test]
  async fn idle_slots_are_pruned() {
    let locks = KeyedLock::default();
    drop(locks.lock(1).await);
    drop(locks.lock(2).await);
    // The next acquisition sweeps both idle slots before adding its own.
    let _c = locks.lock(3).await;
    assert_eq!(locks.len(), 1);
  }
}
