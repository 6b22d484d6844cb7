//! [`SqliteStore`]: the SQLite implementation of the storage gateway.

use std::path::Path;

use bugtrack_core::{
  Lifecycle, Page, PageRequest, Status,
  store::{Repository, StatusRepository},
};
use rusqlite::{OptionalExtension as _, types::Value};

use crate::{
  Result,
  encode::{Table, encode_status, insert_sql, select_sql, upsert_sql},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A tracker store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema ready");
    Ok(())
  }
}

// ─── Repository impl ─────────────────────────────────────────────────────────

impl<T: Table> Repository<T> for SqliteStore {
  type Error = crate::Error;

  async fn find_by_id(&self, id: i64) -> Result<Option<T>> {
    let sql = format!("{} WHERE id = ?1", select_sql::<T>());

    let raw: Option<T::Raw> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params![id], T::read).optional()?)
      })
      .await?;

    raw.map(T::decode).transpose()
  }

  async fn find_page(&self, request: PageRequest) -> Result<Page<T>> {
    let count_sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
    let page_sql = format!("{} ORDER BY id LIMIT ?1 OFFSET ?2", select_sql::<T>());
    let limit = i64::from(request.size);
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);

    // Count and slice inside one read transaction so they agree.
    let (raws, total): (Vec<T::Raw>, i64) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let total: i64 = tx.query_row(&count_sql, [], |r| r.get(0))?;
        let rows = {
          let mut stmt = tx.prepare(&page_sql)?;
          stmt
            .query_map(rusqlite::params![limit, offset], T::read)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;
        Ok((rows, total))
      })
      .await?;

    let content = raws
      .into_iter()
      .map(T::decode)
      .collect::<Result<Vec<_>>>()?;

    Ok(Page::new(content, request, total.max(0) as u64))
  }

  async fn save(&self, mut record: T) -> Result<T> {
    let values = record.encode();
    let explicit_id = record.id();
    let insert = insert_sql::<T>();
    let upsert = upsert_sql::<T>();

    let id = self
      .conn
      .call(move |conn| match explicit_id {
        None => {
          conn.execute(&insert, rusqlite::params_from_iter(values))?;
          Ok(conn.last_insert_rowid())
        }
        Some(id) => {
          let bound = std::iter::once(Value::Integer(id)).chain(values);
          conn.execute(&upsert, rusqlite::params_from_iter(bound))?;
          Ok(id)
        }
      })
      .await?;

    record.set_id(Some(id));
    Ok(record)
  }

  async fn delete_by_id(&self, id: i64) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params![id])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── StatusRepository impl ───────────────────────────────────────────────────

impl<T: Table + Lifecycle> StatusRepository<T> for SqliteStore {
  async fn compare_and_set_status(
    &self,
    id:       i64,
    expected: Status,
    next:     Status,
  ) -> Result<bool> {
    let sql = format!(
      "UPDATE {} SET status = ?1 WHERE id = ?2 AND status = ?3",
      T::TABLE
    );
    let next_str = encode_status(next);
    let expected_str = encode_status(expected);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &sql,
          rusqlite::params![next_str, id, expected_str],
        )?)
      })
      .await?;

    Ok(changed == 1)
  }
}
