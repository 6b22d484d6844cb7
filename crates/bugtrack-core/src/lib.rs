//! Core types and trait definitions for the bug tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod bug;
pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod lock;
pub mod memory;
pub mod page;
pub mod project;
pub mod record;
pub mod service;
pub mod store;
pub mod user;

pub use bug::Bug;
pub use error::{Error, Result};
pub use lifecycle::{Lifecycle, Status, Transition};
pub use page::{Page, PagePolicy, PageRequest};
pub use project::Project;
pub use record::{EntityKind, Record};
pub use service::{BugService, ProjectService, Service, UserService};
pub use store::{Repository, StatusRepository, TrackerStore};
pub use user::User;
