//! Conversion orchestration.
//!
//! Turns (code, source language, target language) into converted code by
//! consulting a result cache, prompting the model on a miss, and extracting
//! the fenced block from its reply. Explanations follow the same path with a
//! different prompt and post-processing.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod extract;
pub mod inflight;
mod orchestrator;
pub mod prompt;

pub use extract::{extract_code, strip_emphasis, ParsedResponse, Segment};
pub use orchestrator::CodeConverter;
