//! Axum-based HTTP server for gemconvert.
//!
//! Exposes the conversion orchestrator, the explanation variant and the
//! preference store as a JSON API that a browser front end (or curl) can
//! drive.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual API endpoints (convert, explain, preferences, health, metrics).
//! - `middleware`: Request ID tracking and per-route metrics.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthResponse, HealthStatus};
pub use routes::{create_router, AppState};
