//! Structured logging
//!
//! Synchronous JSON logs with deterministic key ordering. One line per
//! event, no buffering.

mod logger;

pub use logger::{LogLevel, Logger};
