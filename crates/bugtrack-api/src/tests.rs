//! HTTP-level tests driving [`api_router`] over an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use bugtrack_core::{PagePolicy, clock::FixedClock};
use bugtrack_store_sqlite::SqliteStore;
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, api_router};

const NOW: &str = "14/03/2024 09:30";

async fn make_state() -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let at = NaiveDate::from_ymd_opt(2024, 3, 14)
    .unwrap()
    .and_hms_opt(9, 30, 0)
    .unwrap();
  AppState::new(Arc::new(store), Arc::new(FixedClock(at)), PagePolicy::default())
}

async fn send(
  state: &AppState<SqliteStore>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> Response {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(json) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(json.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  api_router(state.clone()).oneshot(req).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

/// A user, a project owned by it, and an OPEN bug against both. Returns the
/// bug id.
async fn seed_bug(state: &AppState<SqliteStore>) -> i64 {
  let resp = send(
    state,
    "POST",
    "/users",
    Some(json!({
      "name": "Grace Hopper",
      "username": "grace",
      "email": "grace@example.com",
      "password": "cobol"
    })),
  )
  .await;
  let user = json_body(resp).await["id"].as_i64().unwrap();

  let resp = send(
    state,
    "POST",
    "/projects",
    Some(json!({ "name": "Compiler", "owner_id": user })),
  )
  .await;
  let project = json_body(resp).await["id"].as_i64().unwrap();

  let resp = send(
    state,
    "POST",
    "/bugs",
    Some(json!({
      "summary": "Off-by-one in lexer",
      "project_id": project,
      "creator_id": user
    })),
  )
  .await;
  json_body(resp).await["id"].as_i64().unwrap()
}

// ── Create ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_bug_returns_201_open_with_location() {
  let state = make_state().await;
  let id = seed_bug(&state).await;

  let resp = send(&state, "GET", &format!("/bugs/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let bug = json_body(resp).await;
  assert_eq!(bug["status"], "OPEN");
  assert_eq!(bug["created_at"], NOW);
  assert!(bug["updated_at"].is_null());
  assert!(bug["closed_at"].is_null());

  let resp = send(
    &state,
    "POST",
    "/bugs",
    Some(json!({
      "summary": "Second",
      "status": "CLOSED",
      "project_id": bug["project_id"],
      "creator_id": bug["creator_id"]
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let location = resp.headers()[header::LOCATION].to_str().unwrap().to_owned();
  let created = json_body(resp).await;
  assert_eq!(location, format!("/bugs/{}", created["id"]));
  assert_eq!(created["status"], "OPEN");
}

#[tokio::test]
async fn created_user_hides_password() {
  let state = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/users",
    Some(json!({
      "name": "Alan",
      "username": "alan",
      "email": "alan@example.com",
      "password": "enigma"
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let user = json_body(resp).await;
  assert_eq!(user["username"], "alan");
  assert!(user.get("password").is_none());
}

// ── Validation ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn blank_summary_is_422() {
  let state = make_state().await;
  let id = seed_bug(&state).await;
  let bug = json_body(send(&state, "GET", &format!("/bugs/{id}"), None).await).await;

  let resp = send(
    &state,
    "POST",
    "/bugs",
    Some(json!({
      "summary": "   ",
      "project_id": bug["project_id"],
      "creator_id": bug["creator_id"]
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(json_body(resp).await["error"], "summary must not be blank");
}

#[tokio::test]
async fn unknown_references_are_422() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/projects",
    Some(json!({ "name": "Orphan", "owner_id": 99 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(
    json_body(resp).await["error"],
    "owner_id refers to unknown user 99"
  );

  let resp = send(
    &state,
    "POST",
    "/bugs",
    Some(json!({ "summary": "S", "project_id": 5, "creator_id": 5 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn replace_without_status_is_422() {
  let state = make_state().await;
  let id = seed_bug(&state).await;
  let bug = json_body(send(&state, "GET", &format!("/bugs/{id}"), None).await).await;

  let resp = send(
    &state,
    "PUT",
    &format!("/bugs/{id}"),
    Some(json!({
      "summary": "No status",
      "project_id": bug["project_id"],
      "creator_id": bug["creator_id"]
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(json_body(resp).await["error"], "status is required");
}

// ── Get / list ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_bug_is_404_with_message() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/bugs/7", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["error"], "could not find bug 7");
}

#[tokio::test]
async fn empty_list_uses_default_page() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/projects", None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let page = json_body(resp).await;
  assert_eq!(page["content"], json!([]));
  assert_eq!(page["page"], 0);
  assert_eq!(page["size"], 15);
  assert_eq!(page["total_elements"], 0);
  assert_eq!(page["total_pages"], 0);
}

#[tokio::test]
async fn invalid_page_parameters_are_400() {
  let state = make_state().await;
  for uri in ["/bugs?page=-1", "/bugs?size=0", "/bugs?size=101"] {
    let resp = send(&state, "GET", uri, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
  }
}

#[tokio::test]
async fn list_pages_in_id_order() {
  let state = make_state().await;
  seed_bug(&state).await;
  seed_bug(&state).await;
  seed_bug(&state).await;

  let page = json_body(send(&state, "GET", "/bugs?page=1&size=2", None).await).await;
  assert_eq!(page["total_elements"], 3);
  assert_eq!(page["total_pages"], 2);
  assert_eq!(page["content"].as_array().unwrap().len(), 1);
  assert_eq!(page["content"][0]["id"], 3);
}

// ── Replace ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_to_closed_stamps_closed_at() {
  let state = make_state().await;
  let id = seed_bug(&state).await;
  let bug = json_body(send(&state, "GET", &format!("/bugs/{id}"), None).await).await;

  let resp = send(
    &state,
    "PUT",
    &format!("/bugs/{id}"),
    Some(json!({
      "summary": "Off-by-one in lexer",
      "description": "fixed in tokenizer",
      "status": "CLOSED",
      "project_id": bug["project_id"],
      "creator_id": bug["creator_id"],
      "created_at": bug["created_at"]
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let replaced = json_body(resp).await;
  assert_eq!(replaced["id"], id);
  assert_eq!(replaced["status"], "CLOSED");
  assert_eq!(replaced["updated_at"], NOW);
  assert_eq!(replaced["closed_at"], NOW);

  let fetched = json_body(send(&state, "GET", &format!("/bugs/{id}"), None).await).await;
  assert_eq!(fetched, replaced);
}

#[tokio::test]
async fn replace_missing_is_404() {
  let state = make_state().await;
  let resp = send(
    &state,
    "PUT",
    "/projects/3",
    Some(json!({ "name": "Ghost", "status": "OPEN", "owner_id": 1 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["error"], "could not find project 3");
}

// ── Close ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn close_twice_is_409() {
  let state = make_state().await;
  let id = seed_bug(&state).await;
  let uri = format!("/bugs/{id}/close");

  let resp = send(&state, "PUT", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let bug = json_body(send(&state, "GET", &format!("/bugs/{id}"), None).await).await;
  assert_eq!(bug["status"], "CLOSED");
  assert!(bug["closed_at"].is_null());

  let resp = send(&state, "PUT", &uri, None).await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
  assert_eq!(json_body(resp).await["error"], format!("bug {id} is closed"));
}

#[tokio::test]
async fn close_project_and_missing_project() {
  let state = make_state().await;
  let id = seed_bug(&state).await;
  let bug = json_body(send(&state, "GET", &format!("/bugs/{id}"), None).await).await;
  let project = bug["project_id"].as_i64().unwrap();

  let resp = send(&state, "PUT", &format!("/projects/{project}/close"), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = send(&state, "PUT", "/projects/404/close", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn users_have_no_close_route() {
  let state = make_state().await;
  let resp = send(&state, "PUT", "/users/1/close", None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ── Delete ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_delete_again() {
  let state = make_state().await;
  let id = seed_bug(&state).await;
  let uri = format!("/bugs/{id}");

  assert_eq!(send(&state, "DELETE", &uri, None).await.status(), StatusCode::NO_CONTENT);
  assert_eq!(send(&state, "GET", &uri, None).await.status(), StatusCode::NOT_FOUND);
  assert_eq!(send(&state, "DELETE", &uri, None).await.status(), StatusCode::NOT_FOUND);
}

// ── Users ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn user_without_password_is_422() {
  let state = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/users",
    Some(json!({ "name": "Ada", "username": "ada", "email": "ada@example.com" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(json_body(resp).await["error"], "password is required");
}

#[tokio::test]
async fn replacing_user_with_fetched_body_keeps_password() {
  let state = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/users",
    Some(json!({
      "name": "Alan",
      "username": "alan",
      "email": "alan@example.com",
      "password": "enigma"
    })),
  )
  .await;
  let id = json_body(resp).await["id"].as_i64().unwrap();
  let uri = format!("/users/{id}");

  // The fetched representation has no password, so putting it back is
  // rejected instead of blanking the stored one.
  let fetched = json_body(send(&state, "GET", &uri, None).await).await;
  let resp = send(&state, "PUT", &uri, Some(fetched)).await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(state.users.get_by_id(id).await.unwrap().password, "enigma");

  let resp = send(
    &state,
    "PUT",
    &uri,
    Some(json!({
      "name": "Alan Turing",
      "username": "alan",
      "email": "alan@example.com",
      "password": "bombe"
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let stored = state.users.get_by_id(id).await.unwrap();
  assert_eq!(stored.name, "Alan Turing");
  assert_eq!(stored.password, "bombe");
}

// ── Rejections ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_status_is_422_json() {
  let state = make_state().await;
  let id = seed_bug(&state).await;
  let bug = json_body(send(&state, "GET", &format!("/bugs/{id}"), None).await).await;

  let resp = send(
    &state,
    "PUT",
    &format!("/bugs/{id}"),
    Some(json!({
      "summary": "S",
      "status": "REOPENED",
      "project_id": bug["project_id"],
      "creator_id": bug["creator_id"]
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
  assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn malformed_json_is_400_json() {
  let state = make_state().await;
  let req = Request::builder()
    .method("POST")
    .uri("/projects")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{\"name\": "))
    .unwrap();
  let resp = api_router(state).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn non_numeric_id_is_400_json() {
  let state = make_state().await;
  for (method, uri) in [("GET", "/bugs/abc"), ("PUT", "/projects/x/close")] {
    let resp = send(&state, method, uri, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    assert!(json_body(resp).await["error"].is_string(), "{uri}");
  }
}

#[tokio::test]
async fn non_numeric_page_is_400_json() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/users?page=first", None).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(json_body(resp).await["error"].is_string());
}

#[tokio::test]
async fn replace_checks_existence_before_body() {
  let state = make_state().await;
  let resp = send(&state, "PUT", "/bugs/12", Some(json!({ "summary": "" }))).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert_eq!(json_body(resp).await["error"], "could not find bug 12");
}
