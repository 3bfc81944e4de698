// Conversion orchestrator - cache lookup, prompt, remote call, extraction
// Author: kelexine (https://github.com/kelexine)

use super::extract::{extract_code, strip_emphasis};
use super::inflight::InflightGates;
use super::prompt::{conversion_prompt, explanation_prompt};
use crate::cache::{CacheKey, ResultCache};
use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::gemini::TextGenerator;
use crate::metrics;
use crate::models::api::{ConversionRequest, ExplanationRequest, Outcome};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Memoizing front for the remote generation capability.
///
/// Owns one result cache for conversions and one for explanations. Cloning
/// shares both caches.
#[derive(Clone)]
pub struct CodeConverter {
    generator: Arc<dyn TextGenerator>,
    conversions: ResultCache,
    explanations: ResultCache,
    gates: Option<InflightGates>,
}

impl CodeConverter {
    pub fn new(generator: Arc<dyn TextGenerator>, config: &ConverterConfig) -> Self {
        Self {
            generator,
            conversions: ResultCache::new("conversion"),
            explanations: ResultCache::new("explanation"),
            gates: config.deduplicate_inflight.then(InflightGates::new),
        }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub fn conversion_cache(&self) -> &ResultCache {
        &self.conversions
    }

    pub fn explanation_cache(&self) -> &ResultCache {
        &self.explanations
    }

    /// Convert `source_code` from `source_language` to `target_language`.
    pub async fn convert(
        &self,
        source_code: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String> {
        let request = ConversionRequest::new(source_code, source_language, target_language);
        self.convert_request(&request).await.map(|(code, _)| code)
    }

    /// [`CodeConverter::convert`] that also reports how the answer was produced.
    ///
    /// Identical languages return the input untouched without consulting the
    /// cache or the model. Whitespace-only input is refused before any lookup.
    pub async fn convert_request(&self, request: &ConversionRequest) -> Result<(String, Outcome)> {
        if request.is_same_language() {
            debug!("Source and target are both {}, returning input", request.source_language);
            metrics::record_conversion("convert", Outcome::Passthrough.as_str());
            return Ok((request.source_code.clone(), Outcome::Passthrough));
        }

        if request.source_code.trim().is_empty() {
            metrics::record_conversion("convert", "rejected");
            return Err(ConverterError::EmptySource);
        }

        info!(
            "Converting {} -> {} ({} bytes)",
            request.source_language,
            request.target_language,
            request.source_code.len()
        );

        let prompt = || {
            conversion_prompt(
                &request.source_code,
                &request.source_language,
                &request.target_language,
            )
        };

        let result = self
            .memoize(&self.conversions, request.cache_key(), prompt, |raw| extract_code(&raw))
            .await;
        record_outcome("convert", &result);
        result
    }

    /// Explain `code` written in `language`.
    pub async fn explain(&self, code: &str, language: &str) -> Result<String> {
        let request = ExplanationRequest::new(code, language);
        self.explain_request(&request).await.map(|(text, _)| text)
    }

    pub async fn explain_request(&self, request: &ExplanationRequest) -> Result<(String, Outcome)> {
        if request.code.trim().is_empty() {
            metrics::record_conversion("explain", "rejected");
            return Err(ConverterError::EmptySource);
        }

        info!("Explaining {} code ({} bytes)", request.language, request.code.len());

        let prompt = || explanation_prompt(&request.code, &request.language);

        let result = self
            .memoize(&self.explanations, request.cache_key(), prompt, |raw| strip_emphasis(&raw))
            .await;
        record_outcome("explain", &result);
        result
    }

    /// Cache-then-remote discipline shared by convert and explain.
    async fn memoize<P, F>(
        &self,
        cache: &ResultCache,
        key: CacheKey,
        prompt: P,
        postprocess: F,
    ) -> Result<(String, Outcome)>
    where
        P: FnOnce() -> String,
        F: FnOnce(String) -> String,
    {
        if let Some(hit) = cache.get(&key).await {
            return Ok((hit, Outcome::Cached));
        }

        let _permit = match &self.gates {
            Some(gates) => {
                let permit = gates.acquire(&key).await;
                // Another caller may have filled the entry while we waited
                if let Some(hit) = cache.peek(&key).await {
                    debug!("{} filled by concurrent request: {}", cache.name(), key);
                    return Ok((hit, Outcome::Cached));
                }
                Some(permit)
            }
            None => None,
        };

        let raw = self.generator.generate(&prompt()).await.map_err(|e| {
            error!("Remote generation failed for {}: {}", key, e);
            if matches!(e, ConverterError::RemoteCall(_) | ConverterError::MissingApiKey) {
                e
            } else {
                ConverterError::RemoteCall(e.to_string())
            }
        })?;

        let output = postprocess(raw);
        if output.is_empty() {
            warn!("Model returned empty output for {}, not caching", key);
            return Ok((output, Outcome::Generated));
        }

        let stored = cache.insert(key, output).await;
        Ok((stored, Outcome::Generated))
    }
}

fn record_outcome(operation: &str, result: &Result<(String, Outcome)>) {
    match result {
        Ok((_, outcome)) => metrics::record_conversion(operation, outcome.as_str()),
        Err(_) => metrics::record_conversion(operation, "failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGenerator {
        reply: String,
        calls: AtomicUsize,
    }

    impl FixedGenerator {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let generator = FixedGenerator::new("```python\nprint(1)\n```");
        let converter = CodeConverter::new(generator.clone(), &ConverterConfig::default());

        let first = converter.convert_request(&ConversionRequest::new("console.log(1)", "JavaScript", "Python")).await.unwrap();
        let second = converter.convert_request(&ConversionRequest::new("console.log(1)", "JavaScript", "Python")).await.unwrap();

        assert_eq!(first, ("print(1)".to_string(), Outcome::Generated));
        assert_eq!(second, ("print(1)".to_string(), Outcome::Cached));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_output_is_not_cached() {
        let generator = FixedGenerator::new("```\n```");
        let converter = CodeConverter::new(generator.clone(), &ConverterConfig::default());

        assert_eq!(converter.convert("x", "Go", "Java").await.unwrap(), "");
        assert_eq!(converter.convert("x", "Go", "Java").await.unwrap(), "");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
        assert!(converter.conversion_cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_explanations_use_their_own_cache() {
        let generator = FixedGenerator::new("**Prints** one");
        let converter = CodeConverter::new(generator.clone(), &ConverterConfig::default());

        assert_eq!(converter.explain("print(1)", "Python").await.unwrap(), "Prints one");
        assert_eq!(converter.explain("print(1)", "Python").await.unwrap(), "Prints one");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(converter.explanation_cache().len().await, 1);
        assert!(converter.conversion_cache().is_empty().await);
    }
}
