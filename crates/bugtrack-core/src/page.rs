//! Paging types shared by the storage trait and list endpoints.

use serde::Serialize;

use crate::{Error, Result};

/// A validated request for one page of records, zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page: u64,
  pub size: u32,
}

impl PageRequest {
  /// Number of records preceding this page.
  pub fn offset(&self) -> u64 { self.page.saturating_mul(u64::from(self.size)) }
}

/// Limits applied to caller-supplied page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
  /// Size used when the caller does not ask for one.
  pub default_size: u32,
  /// Largest size accepted; anything above is rejected, not clamped.
  pub max_size:     u32,
}

impl Default for PagePolicy {
  fn default() -> Self { Self { default_size: 15, max_size: 100 } }
}

impl PagePolicy {
  /// Validate raw parameters. Fails with
  /// [`Error::InvalidPageParameters`] when `page < 0`, `size <= 0`, or
  /// `size` exceeds [`max_size`](Self::max_size).
  pub fn request(&self, page: i64, size: i64) -> Result<PageRequest> {
    let invalid = || Error::InvalidPageParameters { page, size };
    let page = u64::try_from(page).map_err(|_| invalid())?;
    let size = u32::try_from(size)
      .ok()
      .filter(|s| *s > 0 && *s <= self.max_size)
      .ok_or_else(invalid)?;
    Ok(PageRequest { page, size })
  }
}

/// A slice of an ordered sequence plus the total element count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
  pub content:        Vec<T>,
  pub page:           u64,
  pub size:           u32,
  pub total_elements: u64,
  pub total_pages:    u64,
}

impl<T> Page<T> {
  pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
    Self {
      content,
      page: request.page,
      size: request.size,
      total_elements,
      total_pages: total_elements.div_ceil(u64::from(request.size.max(1))),
    }
  }

  pub fn is_empty(&self) -> bool { self.content.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_negative_page_and_non_positive_size() {
    let policy = PagePolicy::default();
    assert!(matches!(
      policy.request(-1, 15),
      Err(Error::InvalidPageParameters { page: -1, size: 15 })
    ));
    assert!(policy.request(0, 0).is_err());
    assert!(policy.request(0, -5).is_err());
    assert!(policy.request(0, 101).is_err());
    assert_eq!(
      policy.request(2, 100).unwrap(),
      PageRequest { page: 2, size: 100 }
    );
  }

  #[test]
  fn offset_and_total_pages() {
    let request = PageRequest { page: 3, size: 15 };
    assert_eq!(request.offset(), 45);

    let page = Page::<()>::new(vec![], request, 46);
    assert_eq!(page.total_pages, 4);
    assert!(page.is_empty());

    let empty = Page::<()>::new(vec![], PageRequest { page: 0, size: 15 }, 0);
    assert_eq!(empty.total_pages, 0);
  }
}
