//! Error types shared across the vhs-action crates.

use miette::Diagnostic;
use thiserror::Error;

/// Result type for vhs-action operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while acquiring or running tools.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Requested release tag does not exist.
    #[error("No release found for {repo} at tag '{tag}'")]
    ReleaseNotFound {
        /// The `owner/repo` identifier.
        repo: String,
        /// The tag that was requested.
        tag: String,
    },

    /// No release asset matched the expected naming pattern.
    #[error("No asset matching {rule} in {repo} for platform {platform}")]
    AssetNotFound {
        /// The `owner/repo` identifier.
        repo: String,
        /// Human-readable description of the match rule.
        rule: String,
        /// The platform the rule was derived for.
        platform: String,
    },

    /// Current OS/arch has no defined acquisition strategy.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Request to {url} failed with HTTP {status}")]
    HttpStatus {
        /// The URL that was requested.
        url: String,
        /// The response status code.
        status: u16,
    },

    /// Archive could not be opened or extracted.
    #[error("Failed to extract '{archive}': {message}")]
    Extraction {
        /// The archive file name.
        archive: String,
        /// Error message.
        message: String,
    },

    /// An external command exited unsuccessfully.
    #[error("Command '{program}' failed with status {status}")]
    CommandFailed {
        /// The program that was invoked.
        program: String,
        /// Its exit status.
        status: i32,
    },

    /// A path resolved from an archive does not exist.
    #[error("Expected path '{0}' not found in extracted archive")]
    MissingPath(String),

    /// Input configuration is invalid.
    #[error("Invalid input: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a release-not-found error.
    #[must_use]
    pub fn release_not_found(repo: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::ReleaseNotFound {
            repo: repo.into(),
            tag: tag.into(),
        }
    }

    /// Create an asset-not-found error.
    #[must_use]
    pub fn asset_not_found(
        repo: impl Into<String>,
        rule: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self::AssetNotFound {
            repo: repo.into(),
            rule: rule.into(),
            platform: platform.into(),
        }
    }

    /// Create an unsupported-platform error.
    #[must_use]
    pub fn unsupported_platform(platform: impl Into<String>) -> Self {
        Self::UnsupportedPlatform(platform.into())
    }

    /// Create an extraction error.
    #[must_use]
    pub fn extraction(archive: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.into(),
            message: message.into(),
        }
    }

    /// Create a config error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error is a not-found condition rather than a transient
    /// failure. Callers use this to decide between alternate lookups and
    /// propagation.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ReleaseNotFound { .. } | Self::AssetNotFound { .. } | Self::MissingPath(_)
        ) || matches!(self, Self::HttpStatus { status: 404, .. })
    }
}
