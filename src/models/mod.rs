//! Data models for the inbound API and the Gemini API.
//!
//! This module contains the type definitions for request/response bodies used by:
//! - The inbound convert/explain/preferences API (`api`)
//! - The upstream Google Gemini API (`gemini`)
//! - The language catalog and fence tags (`mapping`)

// Author: kelexine (https://github.com/kelexine)

pub mod api;
pub mod gemini;
pub mod mapping;

pub use api::{
    ConversionRequest, ConversionResponse, DraftUpdate, ExplanationRequest, ExplanationResponse,
    LanguageSelection, LanguagesResponse, Outcome, PreferencesResponse,
};
pub use gemini::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
pub use mapping::{fence_tag, LANGUAGES};
