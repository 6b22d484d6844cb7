//! JSON REST API for the bug tracker.
//!
//! Exposes an axum [`Router`] backed by any [`TrackerStore`]. Handlers do
//! boundary validation and existence checks, then delegate to the lifecycle
//! services. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = bugtrack_api::AppState::new(Arc::new(store), clock, policy);
//! axum::serve(listener, bugtrack_api::api_router(state)).await?;
//! ```

pub mod bugs;
pub mod error;
pub mod extract;
pub mod projects;
pub mod users;

mod validate;

use std::sync::Arc;

use axum::{
  Json, Router,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
  routing::{get, put},
};
use bugtrack_core::{
  BugService, PagePolicy, ProjectService, Record, Service, TrackerStore,
  UserService, clock::Clock,
};
use serde::{Deserialize, Serialize};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers: one lifecycle service per
/// entity over the same store.
pub struct AppState<S> {
  pub users:    Arc<UserService<S>>,
  pub projects: Arc<ProjectService<S>>,
  pub bugs:     Arc<BugService<S>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      users:    Arc::clone(&self.users),
      projects: Arc::clone(&self.projects),
      bugs:     Arc::clone(&self.bugs),
    }
  }
}

impl<S: TrackerStore> AppState<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, policy: PagePolicy) -> Self {
    Self {
      users:    Arc::new(
        Service::new(Arc::clone(&store))
          .with_clock(Arc::clone(&clock))
          .with_policy(policy),
      ),
      projects: Arc::new(
        Service::new(Arc::clone(&store))
          .with_clock(Arc::clone(&clock))
          .with_policy(policy),
      ),
      bugs:     Arc::new(Service::new(store).with_clock(clock).with_policy(policy)),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: TrackerStore>(state: AppState<S>) -> Router<()> {
  Router::new()
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::replace::<S>)
        .delete(users::delete_one::<S>),
    )
    // Projects
    .route("/projects", get(projects::list::<S>).post(projects::create::<S>))
    .route(
      "/projects/{id}",
      get(projects::get_one::<S>)
        .put(projects::replace::<S>)
        .delete(projects::delete_one::<S>),
    )
    .route("/projects/{id}/close", put(projects::close_one::<S>))
    // Bugs
    .route("/bugs", get(bugs::list::<S>).post(bugs::create::<S>))
    .route(
      "/bugs/{id}",
      get(bugs::get_one::<S>)
        .put(bugs::replace::<S>)
        .delete(bugs::delete_one::<S>),
    )
    .route("/bugs/{id}/close", put(bugs::close_one::<S>))
    .with_state(state)
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// `?page=<n>&size=<n>` on list endpoints; page defaults to 0 and size to
/// the configured default.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
  pub page: Option<i64>,
  pub size: Option<i64>,
}

impl PageParams {
  fn resolve(&self, policy: PagePolicy) -> (i64, i64) {
    (
      self.page.unwrap_or(0),
      self.size.unwrap_or(i64::from(policy.default_size)),
    )
  }
}

/// `201 Created` with the record as body and `Location: /{collection}/{id}`.
fn created<T: Record + Serialize>(collection: &str, record: T) -> Response {
  let mut response = (StatusCode::CREATED, Json(&record)).into_response();
  if let Some(id) = record.id()
    && let Ok(location) = HeaderValue::from_str(&format!("/{collection}/{id}"))
  {
    response.headers_mut().insert(header::LOCATION, location);
  }
  response
}

#[cfg(test)]
mod tests;
