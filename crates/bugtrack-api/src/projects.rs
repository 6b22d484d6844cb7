//! Handlers for `/projects` endpoints.
//!
//! | Method   | Path                   | Notes |
//! |----------|------------------------|-------|
//! | `GET`    | `/projects`            | `?page&size`; returns a [`Page`] |
//! | `GET`    | `/projects/{id}`       | Single project |
//! | `POST`   | `/projects`            | Body: [`ProjectBody`]; status forced to OPEN |
//! | `PUT`    | `/projects/{id}`       | Body: [`ProjectBody`]; full overwrite |
//! | `DELETE` | `/projects/{id}`       | 204; the project's bugs are kept |
//! | `PUT`    | `/projects/{id}/close` | 204, or 409 when already closed |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::Response,
};
use bugtrack_core::{Page, Project, Status, TrackerStore};
use serde::Deserialize;

use crate::{
  AppState, PageParams, created,
  error::ApiError,
  extract::{JsonBody, PathParam, QueryParams},
  validate::{exists, non_blank, required},
};

// ─── Body ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /projects` and `PUT /projects/{id}`.
///
/// `status` is ignored on create and required on replace.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectBody {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub status:      Option<Status>,
  pub owner_id:    Option<i64>,
}

impl TryFrom<ProjectBody> for Project {
  type Error = bugtrack_core::Error;

  fn try_from(b: ProjectBody) -> Result<Self, Self::Error> {
    Ok(Project {
      id:          None,
      name:        non_blank(b.name, "name")?,
      description: b.description,
      status:      b.status.unwrap_or_default(),
      owner_id:    required(b.owner_id, "owner_id")?,
    })
  }
}

impl<S: TrackerStore> AppState<S> {
  async fn project_from(&self, body: ProjectBody) -> Result<Project, ApiError> {
    let project = Project::try_from(body)?;
    exists(&*self.users, project.owner_id, "owner_id").await?;
    Ok(project)
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /projects?page=<n>&size=<n>`
pub async fn list<S: TrackerStore>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Page<Project>>, ApiError> {
  let (page, size) = params.resolve(state.projects.policy());
  Ok(Json(state.projects.list_page(page, size).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /projects/{id}`
pub async fn get_one<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<Json<Project>, ApiError> {
  Ok(Json(state.projects.get_by_id(id).await?))
}

// ─── Create / replace ─────────────────────────────────────────────────────────

/// `POST /projects`
pub async fn create<S: TrackerStore>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<ProjectBody>,
) -> Result<Response, ApiError> {
  let project = state.project_from(body).await?;
  let project = state.projects.create(project).await?;
  Ok(created("projects", project))
}

/// `PUT /projects/{id}`
pub async fn replace<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
  JsonBody(body): JsonBody<ProjectBody>,
) -> Result<Json<Project>, ApiError> {
  state.projects.get_by_id(id).await?;
  required(body.status, "status")?;
  let project = state.project_from(body).await?;
  Ok(Json(state.projects.replace(project, id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /projects/{id}`
pub async fn delete_one<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<StatusCode, ApiError> {
  state.projects.get_by_id(id).await?;
  state.projects.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Close ────────────────────────────────────────────────────────────────────

/// `PUT /projects/{id}/close`
pub async fn close_one<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<StatusCode, ApiError> {
  state.projects.close(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
