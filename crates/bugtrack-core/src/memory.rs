//! In-memory storage backend.
//!
//! Suitable for tests and short-lived sessions. Every table is a `BTreeMap`
//! keyed by id, so natural order is ascending id, matching the SQLite
//! backend. Ids are never reused after a delete.

use std::{
  collections::BTreeMap,
  convert::Infallible,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
  bug::Bug,
  lifecycle::{Lifecycle, Status},
  page::{Page, PageRequest},
  project::Project,
  record::Record,
  store::{Repository, StatusRepository},
  user::User,
};

/// Rows of one record type plus its id sequence.
#[derive(Debug)]
pub struct Table<T> {
  rows:    BTreeMap<i64, T>,
  last_id: i64,
}

impl<T> Default for Table<T> {
  fn default() -> Self { Self { rows: BTreeMap::new(), last_id: 0 } }
}

#[derive(Debug, Default)]
pub struct Tables {
  users:    Table<User>,
  projects: Table<Project>,
  bugs:     Table<Bug>,
}

/// Maps a record type to its table inside [`Tables`].
pub trait InMemory: Record {
  fn table(tables: &mut Tables) -> &mut Table<Self>;
}

impl InMemory for User {
  fn table(tables: &mut Tables) -> &mut Table<Self> { &mut tables.users }
}

impl InMemory for Project {
  fn table(tables: &mut Tables) -> &mut Table<Self> { &mut tables.projects }
}

impl InMemory for Bug {
  fn table(tables: &mut Tables) -> &mut Table<Self> { &mut tables.bugs }
}

/// A tracker store held entirely in memory.
///
/// Cloning is cheap and clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn tables(&self) -> MutexGuard<'_, Tables> {
    self.tables.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T: InMemory> Repository<T> for MemoryStore {
  type Error = Infallible;

  async fn find_by_id(&self, id: i64) -> Result<Option<T>, Infallible> {
    let mut tables = self.tables();
    Ok(T::table(&mut tables).rows.get(&id).cloned())
  }

  async fn find_page(&self, request: PageRequest) -> Result<Page<T>, Infallible> {
    let mut tables = self.tables();
    let table = T::table(&mut tables);
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let content = table
      .rows
      .values()
      .skip(offset)
      .take(request.size as usize)
      .cloned()
      .collect();
    Ok(Page::new(content, request, table.rows.len() as u64))
  }

  async fn save(&self, mut record: T) -> Result<T, Infallible> {
    let mut tables = self.tables();
    let table = T::table(&mut tables);
    let id = match record.id() {
      Some(id) => id,
      None => table.last_id + 1,
    };
    table.last_id = table.last_id.max(id);
    record.set_id(Some(id));
    table.rows.insert(id, record.clone());
    Ok(record)
  }

  async fn delete_by_id(&self, id: i64) -> Result<(), Infallible> {
    let mut tables = self.tables();
    T::table(&mut tables).rows.remove(&id);
    Ok(())
  }
}

impl<T: InMemory + Lifecycle> StatusRepository<T> for MemoryStore {
  async fn compare_and_set_status(
    &self,
    id: i64,
    expected: Status,
    next: Status,
  ) -> Result<bool, Infallible> {
    let mut tables = self.tables();
    match T::table(&mut tables).rows.get_mut(&id) {
      Some(row) if row.status() == expected => {
        row.set_status(next);
        Ok(true)
      }
      _ => Ok(false),
    }
  }
}
