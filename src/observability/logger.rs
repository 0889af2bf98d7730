//! Structured JSON logger
//!
//! Conventions:
//! - one log line = one event
//! - synchronous, unbuffered
//! - deterministic key ordering (event, level, then fields alphabetically)
//!
//! The engine emits a handful of lifecycle events (version commits,
//! retirements, integrity sweeps); everything else stays quiet.

use std::fmt;
use std::io::{self, Write};

/// Log levels, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger.
pub struct Logger;

impl Logger {
    /// Logs one event to stdout. Fields are emitted in alphabetical key
    /// order for deterministic output.
    pub fn log(level: LogLevel, event: &str, fields: &[(&str, &str)]) {
        Self::write_line(level, event, fields, &mut io::stdout());
    }

    /// Logs one event to stderr.
    pub fn log_stderr(level: LogLevel, event: &str, fields: &[(&str, &str)]) {
        Self::write_line(level, event, fields, &mut io::stderr());
    }

    fn write_line<W: Write>(level: LogLevel, event: &str, fields: &[(&str, &str)], out: &mut W) {
        let mut line = String::with_capacity(128);
        line.push_str("{\"event\":\"");
        escape_into(&mut line, event);
        line.push_str("\",\"level\":\"");
        line.push_str(level.as_str());
        line.push('"');

        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        for (key, value) in sorted {
            line.push_str(",\"");
            escape_into(&mut line, key);
            line.push_str("\":\"");
            escape_into(&mut line, value);
            line.push('"');
        }
        line.push_str("}\n");

        // One write, then flush; log failures are not surfaced.
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}
