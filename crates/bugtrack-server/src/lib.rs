//! Server assembly for the bug tracker: configuration, the traced router,
//! and the demo data set.

pub mod seed;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use axum::{Router, extract::Request};
use bugtrack_api::AppState;
use bugtrack_core::{PagePolicy, TrackerStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BUGTRACK_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub store_path:        PathBuf,
  pub default_page_size: u32,
  pub max_page_size:     u32,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let paging = PagePolicy::default();
    Self {
      host:              "127.0.0.1".to_string(),
      port:              8080,
      store_path:        PathBuf::from("bugtrack.db"),
      default_page_size: paging.default_size,
      max_page_size:     paging.max_size,
    }
  }
}

impl ServerConfig {
  /// Layer the TOML file at `path` (optional) under `BUGTRACK_*` variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("BUGTRACK").try_parsing(true))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn page_policy(&self) -> anyhow::Result<PagePolicy> {
    anyhow::ensure!(
      self.default_page_size > 0 && self.default_page_size <= self.max_page_size,
      "default_page_size ({}) must be between 1 and max_page_size ({})",
      self.default_page_size,
      self.max_page_size,
    );
    Ok(PagePolicy {
      default_size: self.default_page_size,
      max_size:     self.max_page_size,
    })
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API router wrapped in request tracing. Each request runs in a span
/// carrying a fresh request id.
pub fn app<S: TrackerStore>(state: AppState<S>) -> Router {
  bugtrack_api::api_router(state).layer(TraceLayer::new_for_http().make_span_with(
    |req: &Request| {
      tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %req.method(),
        uri = %req.uri(),
      )
    },
  ))
}
