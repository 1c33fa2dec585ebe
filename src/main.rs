//! Exercise backend · problem rendering and submission adaptation
//!
//! - Axum HTTP API over the tasks loaded from a TOML catalog
//! - Problem variants: code, single-line code, file upload, multiple choice, match, extra test
//! - Seeded multiple-choice selection, reproducible per (problem, language, seed)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   TASKS_CONFIG_PATH  : path to the TOML task catalog
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use exercise_backend::routes::build_router;
use exercise_backend::state::AppState;
use exercise_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Load the task catalog once; tasks are read-only from here on.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "exercise_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "exercise_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "exercise_backend", "Shutdown signal received");
}
