//! retraite server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, ingests any workbooks waiting in the configured
//! drop directory, and serves the JSON API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{Json, Router, routing::get};
use clap::Parser;
use retraite_api::ApiConfig;
use retraite_ingest::Ingestor;
use retraite_store_sqlite::SqliteStore;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` plus
/// `RETRAITE_*` environment overrides.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:               String,
  #[serde(default = "default_port")]
  port:               u16,
  #[serde(default = "default_store_path")]
  store_path:         PathBuf,
  /// Directory scanned for workbooks at startup; absent = no startup ingest.
  #[serde(default)]
  spreadsheet_dir:    Option<PathBuf>,
  #[serde(default = "default_page_limit")]
  default_page_limit: u64,
  #[serde(default = "default_ingest_concurrency")]
  ingest_concurrency: usize,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("retraite.db") }
fn default_page_limit() -> u64 { 10 }
fn default_ingest_concurrency() -> usize { 4 }

#[derive(Parser)]
#[command(author, version, about = "retraite pension-risk API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("RETRAITE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;
  let store = Arc::new(store);

  // Drain the spreadsheet drop directory before serving.
  if let Some(dir) = &server_cfg.spreadsheet_dir {
    ingest_directory(dir, Arc::clone(&store), server_cfg.ingest_concurrency)
      .await;
  }

  let api_config = ApiConfig {
    default_page_limit: server_cfg.default_page_limit,
    ingest_concurrency: server_cfg.ingest_concurrency,
  };

  // The frontend is served from a different origin.
  let app = Router::new()
    .route("/ping", get(ping))
    .nest(
      "/api/v1",
      retraite_api::api_router(Arc::clone(&store), api_config),
    )
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Health check.
async fn ping() -> Json<serde_json::Value> {
  Json(json!({ "message": "pong" }))
}

// ─── Startup ingest ──────────────────────────────────────────────────────────

/// Ingest every workbook waiting in `dir`.
///
/// A file that cannot be read is logged and skipped; startup always
/// continues.
async fn ingest_directory(
  dir: &Path,
  store: Arc<SqliteStore>,
  concurrency: usize,
) {
  let entries = match std::fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(e) => {
      tracing::warn!(
        dir = %dir.display(),
        error = %e,
        "spreadsheet directory not readable; skipping startup ingest"
      );
      return;
    }
  };

  let ingestor = Ingestor::new(store, concurrency);
  for entry in entries.flatten() {
    let path = entry.path();
    if !path.is_file() {
      continue;
    }
    match ingestor.ingest_file(&path).await {
      Ok(summary) => tracing::info!(
        file = %path.display(),
        accepted = summary.accepted,
        rejected = summary.rejected,
        "workbook ingested"
      ),
      Err(e) => tracing::warn!(
        file = %path.display(),
        error = %e,
        "workbook skipped"
      ),
    }
  }
}
