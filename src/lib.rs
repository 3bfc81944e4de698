// gemconvert - Convert and explain source code with Gemini
// Author: kelexine (https://github.com/kelexine)

pub mod cache;
pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod models;
pub mod preferences;
pub mod server;
pub mod utils;
