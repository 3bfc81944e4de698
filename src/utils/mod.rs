//! Utility functions and helpers for gemconvert.
//!
//! This module provides cross-cutting concerns like structured logging
//! and API key sanitization.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization with security filters.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
