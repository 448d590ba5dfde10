//! Tool installers.
//!
//! One installer per dependency, all running against the same shared
//! context. Installation order matters only in that vhs goes last so the
//! orchestrator can hand its binary to the tape run.

use std::path::PathBuf;

use async_trait::async_trait;
use vhs_action_core::{Platform, Result, ToolCache};
use vhs_action_github::ReleaseClient;

pub mod ffmpeg;
pub mod ttyd;
pub mod vhs;

pub use ffmpeg::FfmpegInstaller;
pub use ttyd::TtydInstaller;
pub use vhs::VhsInstaller;

/// Shared state every installer runs against.
pub struct InstallContext {
    pub platform: Platform,
    pub cache: ToolCache,
    pub client: ReleaseClient,
}

/// Outcome of a tool installation.
#[derive(Debug)]
pub struct InstalledTool {
    pub name: &'static str,
    /// Absolute path to the binary when the cache manages it; `None` when a
    /// system package manager already put the tool on `PATH`.
    pub binary: Option<PathBuf>,
}

impl InstalledTool {
    fn cached(name: &'static str, binary: PathBuf) -> Self {
        Self {
            name,
            binary: Some(binary),
        }
    }

    fn on_path(name: &'static str) -> Self {
        Self { name, binary: None }
    }
}

/// A tool that can be installed into the run environment.
#[async_trait]
pub trait ToolInstaller: Send + Sync {
    /// Logical tool name, also the cache key.
    fn name(&self) -> &'static str;

    /// Install the tool, going through the cache where possible.
    async fn install(&self, ctx: &InstallContext) -> Result<InstalledTool>;
}
