// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;

/// The remote text-generation capability: prompt in, generated text out.
///
/// `GeminiClient` is the production implementation; tests substitute their
/// own to count invocations or inject failures.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send `prompt` and return the raw generated text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier used for every call.
    fn model(&self) -> &str;
}
