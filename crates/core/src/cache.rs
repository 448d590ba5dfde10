//! Versioned tool cache.
//!
//! Directories are keyed by `(name, version)` under a single cache root:
//!
//! ```text
//! <root>/
//! ├── vhs/
//! │   └── 0.7.1/        # extracted release archive
//! ├── ffmpeg/
//! │   └── release/
//! └── jetbrains-mono/
//!     └── latest/
//! ```
//!
//! Lookups are pure reads and are consulted before any network call. A
//! populated entry is treated as immutable; `store` for an existing key with
//! different content is last-write-wins (documented limitation, single
//! writer per key by construction).

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::error::Result;

/// Keyed directory store for installed tools and fonts.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
}

impl Default for ToolCache {
    fn default() -> Self {
        Self::new(default_cache_root())
    }
}

impl ToolCache {
    /// Create a cache at the specified root directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the directory an entry would occupy, whether or not it exists.
    #[must_use]
    pub fn entry_path(&self, name: &str, version: &str) -> PathBuf {
        self.root.join(name).join(version)
    }

    /// Look up a previously stored entry.
    ///
    /// Pure read, no side effects, no network.
    #[must_use]
    pub fn find(&self, name: &str, version: &str) -> Option<PathBuf> {
        let path = self.entry_path(name, version);
        if path.is_dir() {
            trace!(name, version, ?path, "Cache hit");
            Some(path)
        } else {
            trace!(name, version, "Cache miss");
            None
        }
    }

    /// Copy `source`'s contents into the cache under `(name, version)` and
    /// return the final path.
    ///
    /// This is the only write path into the cache namespace; acquisition
    /// stages everything elsewhere and publishes here as its last step.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails.
    pub fn store(&self, source: &Path, name: &str, version: &str) -> Result<PathBuf> {
        let dest = self.entry_path(name, version);
        std::fs::create_dir_all(&dest)?;
        copy_tree(source, &dest)?;
        debug!(name, version, ?dest, "Stored in cache");
        Ok(dest)
    }
}

/// Recursively copy a directory tree.
fn copy_tree(source: &Path, dest: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir_all(&target)?;
            copy_tree(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Default cache root: the runner's durable tool cache when available,
/// otherwise the user cache directory.
#[must_use]
pub fn default_cache_root() -> PathBuf {
    if let Ok(dir) = std::env::var("RUNNER_TOOL_CACHE") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("vhs-action")
        .join("tools")
}
