//! Boundary checks on request bodies, run before the lifecycle services.

use bugtrack_core::{Error, Record, Repository, Result, Service};

/// A present, non-whitespace string.
pub fn non_blank(value: Option<String>, field: &'static str) -> Result<String> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    Some(_) => Err(Error::validation(field, "must not be blank")),
    None => Err(Error::validation(field, "is required")),
  }
}

pub fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
  value.ok_or_else(|| Error::validation(field, "is required"))
}

/// `id` names an existing record of `T`.
pub async fn exists<T, S>(
  service: &Service<T, S>,
  id: i64,
  field: &'static str,
) -> Result<()>
where
  T: Record,
  S: Repository<T>,
{
  match service.find_by_id(id).await? {
    Some(_) => Ok(()),
    None => Err(Error::validation(field, format!("refers to unknown {} {id}", T::KIND))),
  }
}
