//! Action configuration.
//!
//! Built once at the entry point from CLI flags and runner-provided inputs,
//! then passed by reference into every component. Components never read
//! ambient state themselves.

use std::path::PathBuf;

/// Recognized action inputs.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Version selector for vhs ("latest" or an explicit tag).
    pub version: String,
    /// Tape script to execute. Absent means install-only mode.
    pub path: Option<PathBuf>,
    /// Whether to install the monospaced font set.
    pub install_fonts: bool,
    /// Install everything but skip running the script.
    pub install_only: bool,
    /// Bearer credential for release API calls and downloads.
    pub token: Option<String>,
    /// After recording, publish the result and surface its URL.
    pub publish: bool,
}

impl Config {
    /// Token with empty strings treated as absent (the runner passes unset
    /// inputs through as empty strings).
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether the script should be executed after installation.
    #[must_use]
    pub fn should_run_script(&self) -> bool {
        !self.install_only && self.path.is_some()
    }
}
