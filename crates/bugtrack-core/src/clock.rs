//! Wall-clock source for lifecycle timestamps.

use chrono::{Local, NaiveDateTime};

/// `chrono` format for every stored timestamp, e.g. `27/02/2024 14:05`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

pub trait Clock: Send + Sync {
  fn now(&self) -> NaiveDateTime;

  /// The current time rendered with [`TIMESTAMP_FORMAT`].
  fn stamp(&self) -> String { self.now().format(TIMESTAMP_FORMAT).to_string() }
}

/// Local time of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> NaiveDateTime { Local::now().naive_local() }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime { self.0 }
}
