//! Best-effort font installation.
//!
//! Fonts are decorative: a missing family degrades a recording, it doesn't
//! break it. Every source is acquired independently and concurrently;
//! failures are collected and logged, never propagated. Only after all
//! sources have settled does Linux get its one `fc-cache` rebuild.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use vhs_action_core::{Error, Os, Platform, Result, ToolCache};
use vhs_action_fetch::{AcquirePlan, acquire};
use vhs_action_github::{ReleaseClient, VersionSelector, select};

use crate::source::FontSource;

/// Fonts are cached at this pseudo-version: their sources either have no
/// release API or are only ever wanted at their newest release.
const FONT_VERSION: &str = "latest";

/// Outcome of a font installation run.
#[derive(Debug, Default)]
pub struct FontReport {
    /// Families whose files were installed.
    pub installed: Vec<String>,
    /// Families that failed, with the reason. Non-fatal by design.
    pub failed: Vec<(String, Error)>,
}

/// Installs font families into the OS font registry.
pub struct FontInstaller<'a> {
    cache: &'a ToolCache,
    client: &'a ReleaseClient,
    platform: Platform,
    font_dir: Option<PathBuf>,
}

impl<'a> FontInstaller<'a> {
    /// Create an installer targeting the OS default font directory.
    #[must_use]
    pub fn new(cache: &'a ToolCache, client: &'a ReleaseClient, platform: Platform) -> Self {
        Self {
            cache,
            client,
            platform,
            font_dir: default_font_dir(platform.os),
        }
    }

    /// Override the target font directory (tests, non-standard layouts).
    #[must_use]
    pub fn with_font_dir(mut self, dir: PathBuf) -> Self {
        self.font_dir = Some(dir);
        self
    }

    /// Install every source in the catalog, best-effort.
    ///
    /// # Errors
    ///
    /// Only setup failures (creating the font directory) propagate;
    /// per-source failures are collected in the report.
    pub async fn install_all(&self, sources: &[FontSource]) -> Result<FontReport> {
        if let Some(dir) = &self.font_dir {
            std::fs::create_dir_all(dir)?;
        }

        let outcomes =
            futures::future::join_all(sources.iter().map(|s| self.install_source(s))).await;

        let mut report = FontReport::default();
        for (source, outcome) in sources.iter().zip(outcomes) {
            match outcome {
                Ok(count) => {
                    info!(font = source.name(), files = count, "Installed font");
                    report.installed.push(source.name().to_string());
                }
                Err(e) => {
                    warn!(font = source.name(), error = %e, "Font installation failed; continuing");
                    report.failed.push((source.name().to_string(), e));
                }
            }
        }

        if self.platform.os == Os::Linux {
            rebuild_font_cache().await;
        }

        Ok(report)
    }

    /// Acquire one source into the cache and install its `.ttf` files.
    async fn install_source(&self, source: &FontSource) -> Result<usize> {
        let dir = self.acquire_source(source).await?;
        self.install_dir(&dir).await
    }

    async fn acquire_source(&self, source: &FontSource) -> Result<PathBuf> {
        if let Some(dir) = self.cache.find(source.name(), FONT_VERSION) {
            debug!(font = source.name(), "Found cached version");
            return Ok(dir);
        }

        let plan = match source {
            FontSource::GithubRelease {
                identity,
                rule,
                static_path,
            } => {
                let release = self
                    .client
                    .resolve(identity, &VersionSelector::Latest)
                    .await?;
                let asset = select(&release.assets, rule, &identity.slug(), self.platform)?;
                AcquirePlan::archive(
                    identity.name.clone(),
                    FONT_VERSION,
                    asset.url.clone(),
                    asset.name.clone(),
                )
                .with_auth()
                .with_static_path(static_path.clone())
            }
            FontSource::Direct {
                name,
                url,
                asset_name,
                static_path,
            } => AcquirePlan::archive(name.clone(), FONT_VERSION, url.clone(), asset_name.clone())
                .with_static_path(static_path.clone()),
        };

        acquire(&plan, self.cache, self.client.http(), self.client.token()).await
    }

    /// Install every `.ttf` in `dir` into the OS font registry.
    async fn install_dir(&self, dir: &Path) -> Result<usize> {
        let ttf_files = list_ttf_files(dir)?;

        match self.platform.os {
            Os::Linux | Os::Darwin => {
                let target = self
                    .font_dir
                    .as_ref()
                    .ok_or_else(|| Error::config("no font directory available"))?;
                for file in &ttf_files {
                    let name = file.file_name().unwrap_or_default();
                    std::fs::copy(file, target.join(name))?;
                }
            }
            Os::Windows => {
                if !ttf_files.is_empty() {
                    register_windows_fonts(dir).await?;
                }
            }
        }
        Ok(ttf_files.len())
    }
}

/// Enumerate `.ttf` files directly inside `dir`.
fn list_ttf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf"))
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// OS font-scan directory; `None` on Windows, which registers fonts instead
/// of scanning a user directory.
fn default_font_dir(os: Os) -> Option<PathBuf> {
    match os {
        Os::Linux => dirs::home_dir().map(|h| h.join(".local/share/fonts")),
        Os::Darwin => dirs::home_dir().map(|h| h.join("Library/Fonts")),
        Os::Windows => None,
    }
}

/// Copying files into place is not enough on Windows; each font has to be
/// registered with the shell's font namespace.
async fn register_windows_fonts(dir: &Path) -> Result<()> {
    let script = format!(
        "$shell = New-Object -ComObject Shell.Application; \
         $fonts = $shell.Namespace(0x14); \
         Get-ChildItem -Path '{}' -Filter *.ttf | \
         ForEach-Object {{ $fonts.CopyHere($_.FullName, 0x10) }}",
        dir.display()
    );
    let status = tokio::process::Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", &script])
        .status()
        .await?;
    if !status.success() {
        return Err(Error::CommandFailed {
            program: "powershell".into(),
            status: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

/// One rebuild of the fontconfig index, after all sources have settled.
async fn rebuild_font_cache() {
    match tokio::process::Command::new("fc-cache")
        .arg("-f")
        .status()
        .await
    {
        Ok(status) if status.success() => debug!("Rebuilt font cache"),
        Ok(status) => warn!(?status, "fc-cache exited unsuccessfully"),
        Err(e) => warn!(error = %e, "Failed to run fc-cache"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vhs_action_core::Arch;
    use vhs_action_fetch::PathSegment;

    fn linux() -> Platform {
        Platform::new(Os::Linux, Arch::X86_64)
    }

    fn populate(cache: &ToolCache, name: &str, files: &[&str]) {
        let temp = TempDir::new().unwrap();
        for file in files {
            std::fs::write(temp.path().join(file), b"font-bytes").unwrap();
        }
        cache.store(temp.path(), name, FONT_VERSION).unwrap();
    }

    fn direct_source(name: &str, url: &str) -> FontSource {
        FontSource::Direct {
            name: name.into(),
            url: url.into(),
            asset_name: format!("{name}.zip"),
            static_path: vec![],
        }
    }

    #[test]
    fn test_list_ttf_files_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.ttf"), b"b").unwrap();
        std::fs::write(temp.path().join("a.ttf"), b"a").unwrap();
        std::fs::write(temp.path().join("readme.md"), b"r").unwrap();
        std::fs::write(temp.path().join("c.otf"), b"c").unwrap();

        let files = list_ttf_files(temp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.ttf", "b.ttf"]);
    }

    #[tokio::test]
    async fn test_cached_source_installs_without_network() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().join("cache"));
        populate(&cache, "hack", &["Hack-Regular.ttf", "Hack-Bold.ttf"]);

        let client = ReleaseClient::new(None);
        let font_dir = temp.path().join("fonts");
        let installer =
            FontInstaller::new(&cache, &client, linux()).with_font_dir(font_dir.clone());

        // Unreachable URL: only the cache can satisfy this source.
        let report = installer
            .install_all(&[direct_source("hack", "http://127.0.0.1:1/hack.zip")])
            .await
            .unwrap();

        assert_eq!(report.installed, ["hack"]);
        assert!(report.failed.is_empty());
        assert!(font_dir.join("Hack-Regular.ttf").exists());
        assert!(font_dir.join("Hack-Bold.ttf").exists());
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_neighbors() {
        let temp = TempDir::new().unwrap();
        let cache = ToolCache::new(temp.path().join("cache"));
        populate(&cache, "first", &["First-Regular.ttf"]);
        populate(&cache, "third", &["Third-Regular.ttf"]);

        let client = ReleaseClient::new(None);
        let font_dir = temp.path().join("fonts");
        let installer =
            FontInstaller::new(&cache, &client, linux()).with_font_dir(font_dir.clone());

        let sources = [
            direct_source("first", "http://127.0.0.1:1/first.zip"),
            // Not cached and unreachable: this one fails.
            direct_source("second", "http://127.0.0.1:1/second.zip"),
            direct_source("third", "http://127.0.0.1:1/third.zip"),
        ];
        let report = installer.install_all(&sources).await.unwrap();

        assert_eq!(report.installed, ["first", "third"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "second");
        assert!(font_dir.join("First-Regular.ttf").exists());
        assert!(font_dir.join("Third-Regular.ttf").exists());
    }

    #[test]
    fn test_font_source_static_path_shapes() {
        // The derived-segment case resolves against the asset name, not a
        // literal; everything else is literal segments.
        let segments = vec![PathSegment::AssetStem, PathSegment::literal("ttf")];
        assert_eq!(segments[0], PathSegment::AssetStem);
    }
}
