//! Version manager error types
//!
//! Per ERRORS.md:
//! - LIN_VERSION_NOT_FOUND (ERROR severity)
//! - LIN_MANIFEST_CONFLICT (ERROR severity)
//! - LIN_VERSION_IO_ERROR (ERROR severity), always names the unreadable uri

use std::fmt;
use std::io;

use crate::errors::Severity;

/// Version chain errors. IO failures carry the specific uri so build
/// aborts report the offending file, not a generic failure.
#[derive(Debug)]
pub enum VersionError {
    /// Unknown version tag.
    VersionNotFound(String),

    /// A build targeted a tag already present in the chain.
    ManifestConflict(String),

    /// An input file was unreadable during build/update.
    Io { uri: String, source: io::Error },
}

impl VersionError {
    pub fn io_error(uri: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            uri: uri.into(),
            source,
        }
    }

    /// Returns the stable string code per ERRORS.md.
    pub fn code(&self) -> &'static str {
        match self {
            VersionError::VersionNotFound(_) => "LIN_VERSION_NOT_FOUND",
            VersionError::ManifestConflict(_) => "LIN_MANIFEST_CONFLICT",
            VersionError::Io { .. } => "LIN_VERSION_IO_ERROR",
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> Severity {
        Severity::Error
    }
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::VersionNotFound(tag) => write!(
                f,
                "[{}] {}: unknown version {}",
                self.severity(),
                self.code(),
                tag
            ),
            VersionError::ManifestConflict(tag) => write!(
                f,
                "[{}] {}: version {} already exists in the chain",
                self.severity(),
                self.code(),
                tag
            ),
            VersionError::Io { uri, source } => write!(
                f,
                "[{}] {}: unreadable input {}: {}",
                self.severity(),
                self.code(),
                uri,
                source
            ),
        }
    }
}

impl std::error::Error for VersionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VersionError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for version operations.
pub type VersionResult<T> = Result<T, VersionError>;
