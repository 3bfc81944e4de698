// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::{ConverterError, OperationError};
use crate::metrics;
use crate::models::api::{
    ConversionRequest, ConversionResponse, DraftUpdate, ExplanationRequest, ExplanationResponse,
    LanguageSelection, LanguagesResponse, PreferencesResponse,
};
use crate::models::mapping::{DEFAULT_INPUT_LANGUAGE, DEFAULT_OUTPUT_LANGUAGE, LANGUAGES};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

impl HealthCheck {
    fn ok(message: String) -> Self {
        Self { status: "ok".to_string(), message }
    }

    fn error(message: String) -> Self {
        Self { status: "error".to_string(), message }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HealthQuery {
    /// Also send a minimal request to Gemini.
    #[serde(default)]
    pub deep: bool,
}

pub async fn health_handler(
    State(state): State<AppState>,
    Query(query): Query<HealthQuery>,
) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // A missing key does not stop the server, but every conversion will fail
    let key_check = if state.config.has_api_key() {
        HealthCheck::ok("API key configured".to_string())
    } else {
        overall_status = HealthStatus::Degraded;
        HealthCheck::error("API key missing; set GEMINI_API_KEY".to_string())
    };
    checks.insert("api_key".to_string(), key_check);

    checks.insert(
        "model".to_string(),
        HealthCheck::ok(format!("Model: {}", state.converter.model())),
    );

    checks.insert(
        "result_cache".to_string(),
        HealthCheck::ok(format!(
            "{} conversions, {} explanations cached",
            state.converter.conversion_cache().len().await,
            state.converter.explanation_cache().len().await
        )),
    );

    if query.deep {
        let connectivity = match &state.gemini_client {
            Some(client) => match client.check_connectivity().await {
                Ok(latency) => HealthCheck::ok(format!("Gemini reachable in {} ms", latency.as_millis())),
                Err(e) => {
                    overall_status = HealthStatus::Unhealthy;
                    HealthCheck::error(e.to_string())
                }
            },
            None => HealthCheck::ok("No remote client attached".to_string()),
        };
        checks.insert("gemini_connectivity".to_string(), connectivity);
    }

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

pub async fn languages_handler() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: LANGUAGES.iter().map(|l| l.to_string()).collect(),
        default_input_language: DEFAULT_INPUT_LANGUAGE.to_string(),
        default_output_language: DEFAULT_OUTPUT_LANGUAGE.to_string(),
    })
}

/// Deserialize a raw body, reporting failures in the API error envelope
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ConverterError> {
    serde_json::from_str(body).map_err(|e| {
        debug!("Rejected request body: {}", e);
        ConverterError::InvalidRequest(format!("JSON deserialization error: {}", e))
    })
}

fn require_language(field: &str, value: &str) -> Result<(), ConverterError> {
    if value.trim().is_empty() {
        return Err(ConverterError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Handler for /v1/convert
pub async fn convert_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ConversionResponse>, OperationError> {
    let req: ConversionRequest = parse_body(&body).map_err(OperationError::convert)?;
    require_language("sourceLanguage", &req.source_language).map_err(OperationError::convert)?;
    require_language("targetLanguage", &req.target_language).map_err(OperationError::convert)?;

    // Nothing to convert: refuse before the orchestrator sees it
    if !req.is_same_language() && req.source_code.trim().is_empty() {
        return Err(OperationError::convert(ConverterError::EmptySource));
    }

    info!(
        "Received convert request: {} -> {}, {} bytes",
        req.source_language,
        req.target_language,
        req.source_code.len()
    );

    let (converted_code, outcome) = state.converter.convert_request(&req).await.map_err(|e| {
        error!("Conversion failed: {}", e);
        OperationError::convert(e)
    })?;

    Ok(Json(ConversionResponse {
        converted_code,
        source_language: req.source_language,
        target_language: req.target_language,
        outcome,
    }))
}

/// Handler for /v1/explain
pub async fn explain_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ExplanationResponse>, OperationError> {
    let req: ExplanationRequest = parse_body(&body).map_err(OperationError::explain)?;
    require_language("language", &req.language).map_err(OperationError::explain)?;

    if req.code.trim().is_empty() {
        return Err(OperationError::explain(ConverterError::EmptySource));
    }

    info!("Received explain request: {}, {} bytes", req.language, req.code.len());

    let (explanation, outcome) = state.converter.explain_request(&req).await.map_err(|e| {
        error!("Explanation failed: {}", e);
        OperationError::explain(e)
    })?;

    Ok(Json(ExplanationResponse {
        explanation,
        language: req.language,
        outcome,
    }))
}

/// Run a preference-store operation on the blocking pool, since it may
/// write the preference file.
async fn blocking<T, F>(operation: F) -> Result<T, ConverterError>
where
    F: FnOnce() -> Result<T, ConverterError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| ConverterError::Internal(format!("Preference task failed: {}", e)))?
}

pub async fn preferences_handler(
    State(state): State<AppState>,
) -> Result<Json<PreferencesResponse>, ConverterError> {
    let preferences = state.preferences.clone();
    Ok(Json(blocking(move || preferences.snapshot()).await?))
}

pub async fn put_languages_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<StatusCode, ConverterError> {
    let selection: LanguageSelection = parse_body(&body)?;
    let preferences = state.preferences.clone();
    blocking(move || preferences.set_languages(&selection)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn put_draft_handler(
    State(state): State<AppState>,
    Path(language): Path<String>,
    body: String,
) -> Result<StatusCode, ConverterError> {
    let update: DraftUpdate = parse_body(&body)?;
    let preferences = state.preferences.clone();
    blocking(move || preferences.save_draft(&language, &update.code)).await?;
    Ok(StatusCode::NO_CONTENT)
}
