// Inbound API types (convert, explain, preferences)
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cache::CacheKey;

/// A request to convert code between two languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub source_code: String,
    pub source_language: String,
    pub target_language: String,
}

impl ConversionRequest {
    pub fn new(
        source_code: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::conversion(&self.source_language, &self.target_language, &self.source_code)
    }

    /// Source and target are the same language (exact match).
    pub fn is_same_language(&self) -> bool {
        self.source_language == self.target_language
    }
}

/// A request to explain a piece of code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub code: String,
    pub language: String,
}

impl ExplanationRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::explanation(&self.language, &self.code)
    }
}

/// How an orchestrator call was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Served from the result cache.
    Cached,
    /// Produced by a remote call.
    Generated,
    /// Same source and target language; input returned as is.
    Passthrough,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Cached => "cached",
            Outcome::Generated => "generated",
            Outcome::Passthrough => "passthrough",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub converted_code: String,
    pub source_language: String,
    pub target_language: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationResponse {
    pub explanation: String,
    pub language: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagesResponse {
    pub languages: Vec<String>,
    pub default_input_language: String,
    pub default_output_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSelection {
    pub input_language: String,
    pub output_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftUpdate {
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub input_language: String,
    pub output_language: String,
    /// Unexpired drafts keyed by source language.
    pub drafts: BTreeMap<String, String>,
}
