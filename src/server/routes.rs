// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    convert_handler, explain_handler, health_handler, languages_handler, metrics_handler,
    preferences_handler, put_draft_handler, put_languages_handler,
};
use super::middleware::{request_id_layers, track_metrics};
use crate::config::AppConfig;
use crate::converter::CodeConverter;
use crate::error::Result;
use crate::gemini::GeminiClient;
use crate::preferences::Preferences;
use axum::{middleware, routing::{get, post, put}, Router};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub converter: CodeConverter,
    pub preferences: Preferences,
    /// Present when the converter talks to the real Gemini API; used by the
    /// deep health check.
    pub gemini_client: Option<Arc<GeminiClient>>,
}

pub fn create_router(
    config: AppConfig,
    converter: CodeConverter,
    preferences: Preferences,
    gemini_client: Option<Arc<GeminiClient>>,
) -> Result<Router> {
    let max_body_bytes = config.server.max_body_bytes;
    let enable_cors = config.server.enable_cors;

    let state = AppState {
        config,
        converter,
        preferences,
        gemini_client,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/v1/languages", get(languages_handler))
        .route("/v1/convert", post(convert_handler))
        .route("/v1/explain", post(explain_handler))
        .route("/v1/preferences", get(preferences_handler))
        .route("/v1/preferences/languages", put(put_languages_handler))
        .route("/v1/preferences/drafts/:language", put(put_draft_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    let app = if enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    Ok(app)
}
