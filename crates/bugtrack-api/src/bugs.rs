//! Handlers for `/bugs` endpoints.
//!
//! | Method   | Path               | Notes |
//! |----------|--------------------|-------|
//! | `GET`    | `/bugs`            | `?page&size`; returns a [`Page`] |
//! | `GET`    | `/bugs/{id}`       | Single bug |
//! | `POST`   | `/bugs`            | Body: [`BugBody`]; OPEN with `created_at` set |
//! | `PUT`    | `/bugs/{id}`       | Body: [`BugBody`]; stamps `updated_at`, and `closed_at` on OPEN → CLOSED |
//! | `DELETE` | `/bugs/{id}`       | 204 |
//! | `PUT`    | `/bugs/{id}/close` | 204, or 409 when already closed |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::Response,
};
use bugtrack_core::{Bug, Page, Status, TrackerStore};
use serde::Deserialize;

use crate::{
  AppState, PageParams, created,
  error::ApiError,
  extract::{JsonBody, PathParam, QueryParams},
  validate::{exists, non_blank, required},
};

// ─── Body ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /bugs` and `PUT /bugs/{id}`.
///
/// On create, `status` and the timestamps are ignored. On replace, `status`
/// is required and every field overwrites the stored bug.
#[derive(Debug, Default, Deserialize)]
pub struct BugBody {
  pub summary:     Option<String>,
  pub description: Option<String>,
  pub status:      Option<Status>,
  pub project_id:  Option<i64>,
  pub creator_id:  Option<i64>,
  pub created_at:  Option<String>,
  pub updated_at:  Option<String>,
  pub closed_at:   Option<String>,
}

impl TryFrom<BugBody> for Bug {
  type Error = bugtrack_core::Error;

  fn try_from(b: BugBody) -> Result<Self, Self::Error> {
    Ok(Bug {
      id:          None,
      summary:     non_blank(b.summary, "summary")?,
      description: b.description,
      status:      b.status.unwrap_or_default(),
      project_id:  required(b.project_id, "project_id")?,
      creator_id:  required(b.creator_id, "creator_id")?,
      created_at:  b.created_at,
      updated_at:  b.updated_at,
      closed_at:   b.closed_at,
    })
  }
}

impl<S: TrackerStore> AppState<S> {
  async fn bug_from(&self, body: BugBody) -> Result<Bug, ApiError> {
    let bug = Bug::try_from(body)?;
    exists(&*self.projects, bug.project_id, "project_id").await?;
    exists(&*self.users, bug.creator_id, "creator_id").await?;
    Ok(bug)
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /bugs?page=<n>&size=<n>`
pub async fn list<S: TrackerStore>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Page<Bug>>, ApiError> {
  let (page, size) = params.resolve(state.bugs.policy());
  Ok(Json(state.bugs.list_page(page, size).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /bugs/{id}`
pub async fn get_one<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<Json<Bug>, ApiError> {
  Ok(Json(state.bugs.get_by_id(id).await?))
}

// ─── Create / replace ─────────────────────────────────────────────────────────

/// `POST /bugs`
pub async fn create<S: TrackerStore>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<BugBody>,
) -> Result<Response, ApiError> {
  let bug = state.bug_from(body).await?;
  let bug = state.bugs.create(bug).await?;
  Ok(created("bugs", bug))
}

/// `PUT /bugs/{id}`
pub async fn replace<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
  JsonBody(body): JsonBody<BugBody>,
) -> Result<Json<Bug>, ApiError> {
  state.bugs.get_by_id(id).await?;
  required(body.status, "status")?;
  let bug = state.bug_from(body).await?;
  Ok(Json(state.bugs.replace(bug, id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /bugs/{id}`
pub async fn delete_one<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<StatusCode, ApiError> {
  state.bugs.get_by_id(id).await?;
  state.bugs.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Close ────────────────────────────────────────────────────────────────────

/// `PUT /bugs/{id}/close`: flips the status only; `closed_at` is untouched.
pub async fn close_one<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<StatusCode, ApiError> {
  state.bugs.close(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
