// Gemini API client for the public generateContent endpoint
// Author: kelexine (https://github.com/kelexine)

use super::TextGenerator;
use crate::config::GeminiConfig;
use crate::error::{ConverterError, Result};
use crate::metrics;
use crate::models::gemini::{
    ErrorResponse, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use zeroize::Zeroizing;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Google Gemini API.
///
/// Construction never touches the network and never fails on a missing API
/// key; calls made without a key fail with [`ConverterError::MissingApiKey`].
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
    api_key: Option<Zeroizing<String>>,
}

impl GeminiClient {
    /// Create a new Gemini client with a pooled HTTP connection.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| ConverterError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Zeroizing::new(key.clone()));

        if api_key.is_none() {
            warn!("Gemini API key is not configured; conversions will fail until one is set");
        }

        debug!("Created Gemini client for model {}", config.model);

        Ok(Self {
            http_client,
            config: config.clone(),
            api_key,
        })
    }

    /// Whether an API key is available
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            model
        )
    }

    fn generation_config(&self) -> Option<GenerationConfig> {
        self.config.temperature.map(|temperature| GenerationConfig {
            max_output_tokens: None,
            temperature: Some(temperature),
        })
    }

    /// Call Gemini `generateContent` for `model`.
    ///
    /// No retries: every failure is reported once to the caller.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
        model: &str,
    ) -> Result<GenerateContentResponse> {
        let api_key = self.api_key.as_ref().ok_or(ConverterError::MissingApiKey)?;
        let url = self.endpoint(model);
        debug!("Calling generateContent API for model: {}", model);

        let start = Instant::now();
        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, api_key.as_str())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                metrics::record_gemini_call(model, 0, start.elapsed().as_secs_f64());
                let message = sanitize(&e.to_string());
                error!("Gemini request failed: {}", message);
                ConverterError::RemoteCall(format!("HTTP error: {}", message))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ConverterError::RemoteCall(format!("Failed to read response body: {}", sanitize(&e.to_string())))
        })?;
        metrics::record_gemini_call(model, status.as_u16(), start.elapsed().as_secs_f64());

        if !status.is_success() {
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            let message = sanitize(&message);
            error!("Gemini API error: HTTP {} - {}", status, message);
            return Err(ConverterError::RemoteCall(format!(
                "HTTP {}: {}",
                status.as_u16(),
                message
            )));
        }

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            response_text.chars().take(500).collect::<String>()
        );

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            ConverterError::RemoteCall(format!("Response parsing error: {}", e))
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Token usage: prompt={:?}, output={:?}, total={:?}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        Ok(parsed)
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        let error = serde_json::from_str::<ErrorResponse>(response_text).ok()?.error?;
        error.message.or(error.status)
    }

    /// Check connectivity to Gemini API.
    ///
    /// Sends a minimal request ("hi", one output token) to verify the API is
    /// reachable and the key is accepted.
    pub async fn check_connectivity(&self) -> Result<Duration> {
        let start = Instant::now();
        let request = GenerateContentRequest::from_prompt(
            "hi",
            Some(GenerationConfig {
                max_output_tokens: Some(1),
                temperature: None,
            }),
        );

        self.generate_content(&request, &self.config.model).await?;

        let latency = start.elapsed();
        debug!("API connectivity check passed in {:?}", latency);
        Ok(latency)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest::from_prompt(prompt, self.generation_config());
        let response = self.generate_content(&request, &self.config.model).await?;

        response.text().ok_or_else(|| {
            let reason = response
                .finish_reason()
                .or_else(|| response.block_reason())
                .unwrap_or("unknown")
                .to_string();
            warn!("Gemini returned no text (finish reason: {})", reason);
            ConverterError::RemoteCall(format!("No text in Gemini response (finish reason: {})", reason))
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
