//! The OPEN/CLOSED status lifecycle shared by projects and bugs.
//!
//! OPEN is assigned at creation. CLOSED is terminal: there is no reopen
//! operation. A record moves OPEN → CLOSED either through an explicit close
//! or when a replacement carrying CLOSED is written over a stored OPEN
//! record. Writing OPEN over a stored CLOSED record is a plain overwrite,
//! not a transition.

use serde::{Deserialize, Serialize};

use crate::record::Record;

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Status {
  #[default]
  Open,
  Closed,
}

impl Status {
  pub fn is_open(self) -> bool { matches!(self, Self::Open) }

  pub fn is_closed(self) -> bool { matches!(self, Self::Closed) }

  /// Classify writing `next` over a record currently in `self`.
  pub fn transition_to(self, next: Status) -> Transition {
    match (self, next) {
      (Self::Open, Self::Closed) => Transition::Close,
      _ => Transition::Overwrite,
    }
  }

  /// The status an explicit close moves to, or `None` if already closed.
  pub fn close(self) -> Option<Status> {
    match self {
      Self::Open => Some(Self::Closed),
      Self::Closed => None,
    }
  }
}

// ─── Transition ──────────────────────────────────────────────────────────────

/// What a replace did to a record's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  /// Status written as data; no lifecycle event.
  Overwrite,
  /// The record moved OPEN → CLOSED.
  Close,
}

impl Transition {
  pub fn is_close(self) -> bool { matches!(self, Self::Close) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A [`Record`] with an OPEN/CLOSED lifecycle, eligible for
/// [`Service::close`](crate::service::Service::close).
pub trait Lifecycle: Record {
  fn status(&self) -> Status;
  fn set_status(&mut self, status: Status);
}
