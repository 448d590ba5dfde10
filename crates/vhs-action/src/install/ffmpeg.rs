//! Static ffmpeg builds.
//!
//! There is no first-party release channel; each OS has a well-known static
//! build host instead. Those hosts track "current release" URLs with no tag
//! to resolve, so the cache key is the pseudo-version `release`. When a host
//! is unreachable the system package manager is the fallback.

use async_trait::async_trait;
use tracing::warn;
use vhs_action_core::{Arch, Error, Os, Platform, Result};
use vhs_action_fetch::{AcquirePlan, acquire};

use super::{InstallContext, InstalledTool, ToolInstaller};

/// Static build hosts publish rolling "release" builds without tags.
const FFMPEG_VERSION: &str = "release";

pub struct FfmpegInstaller;

/// Where to get a static build for one platform, and where the binary sits
/// inside the published entry.
struct BuildSource {
    url: String,
    asset_name: &'static str,
    strip_components: usize,
    binary: &'static str,
}

impl BuildSource {
    fn for_platform(platform: Platform) -> Result<Self> {
        match platform.os {
            // johnvansickle wraps everything in ffmpeg-<build>-static/.
            Os::Linux => Ok(Self {
                url: format!(
                    "https://johnvansickle.com/ffmpeg/releases/ffmpeg-release-{}-static.tar.xz",
                    linux_build_name(platform.arch)?
                ),
                asset_name: "ffmpeg-release-static.tar.xz",
                strip_components: 1,
                binary: "ffmpeg",
            }),
            // evermeet ships the bare binary zipped, nothing to strip.
            Os::Darwin => Ok(Self {
                url: "https://evermeet.cx/ffmpeg/getrelease/zip".to_string(),
                asset_name: "ffmpeg.zip",
                strip_components: 0,
                binary: "ffmpeg",
            }),
            // gyan's full build nests binaries under bin/.
            Os::Windows => Ok(Self {
                url: "https://www.gyan.dev/ffmpeg/builds/ffmpeg-release-full.7z".to_string(),
                asset_name: "ffmpeg-release-full.7z",
                strip_components: 1,
                binary: "bin/ffmpeg.exe",
            }),
        }
    }
}

#[async_trait]
impl ToolInstaller for FfmpegInstaller {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn install(&self, ctx: &InstallContext) -> Result<InstalledTool> {
        let source = BuildSource::for_platform(ctx.platform)?;

        if let Some(dir) = ctx.cache.find(self.name(), FFMPEG_VERSION) {
            return Ok(InstalledTool::cached(self.name(), dir.join(source.binary)));
        }

        let plan = AcquirePlan::archive(self.name(), FFMPEG_VERSION, &source.url, source.asset_name)
            .with_strip_components(source.strip_components)
            .with_executables(vec![source.binary.to_string()]);

        match acquire(&plan, &ctx.cache, ctx.client.http(), None).await {
            Ok(dir) => Ok(InstalledTool::cached(self.name(), dir.join(source.binary))),
            Err(e) => {
                warn!(error = %e, "Static ffmpeg build unavailable; falling back to the system package manager");
                package_manager_install(ctx.platform.os).await?;
                Ok(InstalledTool::on_path(self.name()))
            }
        }
    }
}

/// The build name johnvansickle uses per architecture.
fn linux_build_name(arch: Arch) -> Result<&'static str> {
    match arch {
        Arch::X86_64 => Ok("amd64"),
        Arch::I386 => Ok("i686"),
        Arch::Arm64 => Ok("arm64"),
        Arch::Armv7 => Ok("armhf"),
    }
}

async fn package_manager_install(os: Os) -> Result<()> {
    let commands: &[(&str, &[&str])] = match os {
        Os::Linux => &[
            ("sudo", &["apt-get", "update"]),
            ("sudo", &["apt-get", "install", "-y", "ffmpeg"]),
        ],
        Os::Darwin => &[
            ("brew", &["update", "--quiet"]),
            ("brew", &["install", "ffmpeg"]),
        ],
        Os::Windows => &[("choco", &["install", "ffmpeg", "-y"])],
    };

    for (program, args) in commands {
        let status = tokio::process::Command::new(program)
            .args(*args)
            .status()
            .await?;
        if !status.success() {
            return Err(Error::CommandFailed {
                program: (*program).to_string(),
                status: status.code().unwrap_or(-1),
            });
        }
    }
    Ok(())
}
