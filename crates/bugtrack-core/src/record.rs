//! The [`Record`] trait implemented by every stored entity.

/// The entity families the tracker stores.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
  User,
  Project,
  Bug,
}

/// A keyed entity managed by a [`Service`](crate::service::Service).
///
/// Identity is assigned by the storage backend on first save; `id()` is
/// `None` until then.
pub trait Record: Clone + Send + Sync + 'static {
  const KIND: EntityKind;

  fn id(&self) -> Option<i64>;
  fn set_id(&mut self, id: Option<i64>);

  /// Defaults applied on create, after the caller-supplied id is cleared.
  fn prepare_create(&mut self, _now: &str) {}

  /// Applied on replace, after the path id has been set. `stored` is the
  /// version currently persisted under that id.
  fn prepare_replace(
    &mut self,
    _stored: &Self,
    _now: &str,
  ) -> crate::lifecycle::Transition {
    crate::lifecycle::Transition::Overwrite
  }
}
