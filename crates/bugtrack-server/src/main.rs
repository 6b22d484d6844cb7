//! bugtrack server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `BUGTRACK_*` environment variables, opens an in-process SQLite store, and
//! serves the JSON API over HTTP.
//!
//! ```text
//! cargo run -p bugtrack-server -- --in-memory --seed
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use bugtrack_api::AppState;
use bugtrack_core::clock::SystemClock;
use bugtrack_server::{ServerConfig, expand_tilde, seed};
use bugtrack_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Bug tracker JSON API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Insert the demo data set if the store is empty.
  #[arg(long)]
  seed: bool,

  /// Use a throwaway in-memory database instead of `store_path`.
  #[arg(long)]
  in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;
  let policy = server_cfg.page_policy()?;

  let store = if cli.in_memory {
    SqliteStore::open_in_memory()
      .await
      .context("failed to open in-memory store")?
  } else {
    let store_path = expand_tilde(&server_cfg.store_path);
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?
  };

  if cli.seed {
    seed::seed_if_empty(&store)
      .await
      .context("failed to seed demo data")?;
  }

  let state = AppState::new(Arc::new(store), Arc::new(SystemClock), policy);
  let app = bugtrack_server::app(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
