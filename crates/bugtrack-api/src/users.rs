//! Handlers for `/users` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/users`      | `?page&size`; returns a [`Page`] |
//! | `GET`    | `/users/{id}` | Single user |
//! | `POST`   | `/users`      | Body: [`UserBody`]; returns 201 + stored user |
//! | `PUT`    | `/users/{id}` | Body: [`UserBody`]; full overwrite |
//! | `DELETE` | `/users/{id}` | 204 |
//!
//! Passwords are required in every body but never rendered in responses, so
//! a replace must send the password again.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::Response,
};
use bugtrack_core::{Page, TrackerStore, User};
use serde::Deserialize;

use crate::{
  AppState, PageParams, created,
  error::ApiError,
  extract::{JsonBody, PathParam, QueryParams},
  validate::non_blank,
};

// ─── Body ─────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UserBody {
  pub name:     Option<String>,
  pub username: Option<String>,
  pub email:    Option<String>,
  pub password: Option<String>,
}

impl TryFrom<UserBody> for User {
  type Error = bugtrack_core::Error;

  fn try_from(b: UserBody) -> Result<Self, Self::Error> {
    Ok(User {
      id:       None,
      name:     non_blank(b.name, "name")?,
      username: non_blank(b.username, "username")?,
      email:    non_blank(b.email, "email")?,
      password: non_blank(b.password, "password")?,
    })
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users?page=<n>&size=<n>`
pub async fn list<S: TrackerStore>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Page<User>>, ApiError> {
  let (page, size) = params.resolve(state.users.policy());
  Ok(Json(state.users.list_page(page, size).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<Json<User>, ApiError> {
  Ok(Json(state.users.get_by_id(id).await?))
}

// ─── Create / replace ─────────────────────────────────────────────────────────

/// `POST /users`
pub async fn create<S: TrackerStore>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<UserBody>,
) -> Result<Response, ApiError> {
  let user = state.users.create(User::try_from(body)?).await?;
  Ok(created("users", user))
}

/// `PUT /users/{id}`
pub async fn replace<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
  JsonBody(body): JsonBody<UserBody>,
) -> Result<Json<User>, ApiError> {
  state.users.get_by_id(id).await?;
  let user = User::try_from(body)?;
  Ok(Json(state.users.replace(user, id).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`. Bugs and projects referring to the user are left
/// in place.
pub async fn delete_one<S: TrackerStore>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<i64>,
) -> Result<StatusCode, ApiError> {
  state.users.get_by_id(id).await?;
  state.users.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
