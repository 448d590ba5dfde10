//! The acquire pipeline: cache lookup, download, staged extraction, publish.
//!
//! Every acquisition path (vhs, ttyd, ffmpeg, every font source) goes
//! through [`acquire`]. The cache is checked first; everything else happens
//! in temporary staging, and only the final step writes under the cache
//! namespace, so a failure at any stage leaves no entry keyed as complete.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};
use vhs_action_core::{Error, Result, ToolCache};

use crate::download::{DownloadAuth, download};
use crate::extract::{ArchiveKind, asset_stem, extract};

/// One typed segment of a path template into an extracted tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal directory name.
    Literal(String),
    /// The selected asset's file name minus its archive extension; some
    /// archives nest their content under exactly this directory.
    AssetStem,
}

impl PathSegment {
    /// Literal segment.
    #[must_use]
    pub fn literal(s: impl Into<String>) -> Self {
        Self::Literal(s.into())
    }
}

/// Resolve a path template against the staging directory.
fn resolve_static_path(base: &Path, segments: &[PathSegment], asset_name: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in segments {
        match segment {
            PathSegment::Literal(s) => path.push(s),
            PathSegment::AssetStem => path.push(asset_stem(asset_name)),
        }
    }
    path
}

/// Everything needed to materialize one cached artifact.
#[derive(Debug, Clone)]
pub struct AcquirePlan {
    /// Cache key name.
    pub name: String,
    /// Cache key version.
    pub version: String,
    /// Download URL.
    pub url: String,
    /// Asset file name; drives archive detection and stem derivation.
    pub asset_name: String,
    /// Attach the bearer token and octet-stream accept header (API asset
    /// endpoints require both).
    pub authenticated: bool,
    /// Archive format; `None` for raw binaries.
    pub kind: ArchiveKind,
    /// Leading path components to drop during extraction.
    pub strip_components: usize,
    /// Subtree of the extracted archive to publish into the cache.
    pub static_path: Vec<PathSegment>,
    /// File names (relative to the published entry) to mark executable on
    /// POSIX platforms. For raw assets, the single payload is renamed to the
    /// first entry.
    pub executables: Vec<String>,
}

impl AcquirePlan {
    /// Plan for an archive asset with no subtree selection.
    #[must_use]
    pub fn archive(
        name: impl Into<String>,
        version: impl Into<String>,
        url: impl Into<String>,
        asset_name: impl Into<String>,
    ) -> Self {
        let asset_name = asset_name.into();
        Self {
            name: name.into(),
            version: version.into(),
            url: url.into(),
            kind: ArchiveKind::detect(&asset_name),
            asset_name,
            authenticated: false,
            strip_components: 0,
            static_path: Vec::new(),
            executables: Vec::new(),
        }
    }

    /// Attach bearer auth to the download.
    #[must_use]
    pub fn with_auth(mut self) -> Self {
        self.authenticated = true;
        self
    }

    /// Drop leading path components during extraction.
    #[must_use]
    pub fn with_strip_components(mut self, n: usize) -> Self {
        self.strip_components = n;
        self
    }

    /// Publish only a subtree of the extracted archive.
    #[must_use]
    pub fn with_static_path(mut self, segments: Vec<PathSegment>) -> Self {
        self.static_path = segments;
        self
    }

    /// Mark binaries executable after publish (and name the payload of a raw
    /// asset).
    #[must_use]
    pub fn with_executables(mut self, names: Vec<String>) -> Self {
        self.executables = names;
        self
    }
}

/// Acquire an artifact into the cache and return its directory.
///
/// # Errors
///
/// Propagates download, extraction, and cache-store failures; a missing
/// `static_path` subtree surfaces as [`Error::MissingPath`].
pub async fn acquire(
    plan: &AcquirePlan,
    cache: &ToolCache,
    http: &reqwest::Client,
    token: Option<&str>,
) -> Result<PathBuf> {
    if let Some(dir) = cache.find(&plan.name, &plan.version) {
        info!(name = %plan.name, version = %plan.version, "Found cached version");
        return Ok(dir);
    }

    info!(name = %plan.name, version = %plan.version, url = %plan.url, "Downloading");

    let staging = TempDir::new()?;
    let payload = staging.path().join(&plan.asset_name);
    let auth = DownloadAuth {
        token: if plan.authenticated { token } else { None },
        octet_stream: plan.authenticated,
    };
    download(http, &plan.url, auth, &payload).await?;

    let publish_root = if plan.kind == ArchiveKind::None {
        // Raw binary: rename to its target name under a staging subdir.
        let dir = staging.path().join("payload");
        std::fs::create_dir_all(&dir)?;
        let target = plan
            .executables
            .first()
            .cloned()
            .unwrap_or_else(|| plan.asset_name.clone());
        std::fs::rename(&payload, dir.join(target))?;
        dir
    } else {
        let extracted = staging.path().join("extracted");
        extract(&payload, &extracted, plan.kind, plan.strip_components).await?;
        let subtree = resolve_static_path(&extracted, &plan.static_path, &plan.asset_name);
        if !subtree.is_dir() {
            return Err(Error::MissingPath(
                subtree
                    .strip_prefix(&extracted)
                    .unwrap_or(&subtree)
                    .display()
                    .to_string(),
            ));
        }
        subtree
    };

    let cached = cache.store(&publish_root, &plan.name, &plan.version)?;

    #[cfg(unix)]
    for exe in &plan.executables {
        use std::os::unix::fs::PermissionsExt;
        let path = cached.join(exe);
        if path.is_file() {
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
            debug!(?path, "Marked executable");
        }
    }

    info!(name = %plan.name, version = %plan.version, ?cached, "Cached");
    Ok(cached)
}
