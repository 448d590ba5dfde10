//! The ttyd terminal server, which vhs drives to render frames.
//!
//! Upstream publishes raw binaries (no archive) named by build target, with
//! one Windows build suffixed `win10.exe`. macOS has no release binary at
//! all; Homebrew covers it instead.

use async_trait::async_trait;
use tracing::info;
use vhs_action_core::{Arch, Error, Os, Result};
use vhs_action_fetch::{AcquirePlan, acquire};
use vhs_action_github::{AssetRule, ToolIdentity, VersionSelector, select};

use super::{InstallContext, InstalledTool, ToolInstaller};

pub struct TtydInstaller {
    selector: VersionSelector,
}

impl TtydInstaller {
    #[must_use]
    pub fn new(selector: VersionSelector) -> Self {
        Self { selector }
    }

    fn identity() -> ToolIdentity {
        ToolIdentity::new("tsl0922", "ttyd", "ttyd")
    }

    /// Match rule for the platform's raw binary asset.
    fn asset_rule(platform: vhs_action_core::Platform) -> AssetRule {
        match platform.os {
            Os::Windows => AssetRule::ends_with("win10.exe"),
            _ => AssetRule::ends_with(release_target(platform.arch)),
        }
    }

    async fn install_from_release(&self, ctx: &InstallContext) -> Result<InstalledTool> {
        let exe = ctx.platform.os.exe_name("ttyd");

        if let VersionSelector::Tag(tag) = &self.selector
            && let Some(dir) = ctx.cache.find(self.name(), tag)
        {
            return Ok(InstalledTool::cached(self.name(), dir.join(exe)));
        }

        let identity = Self::identity();
        let release = ctx.client.resolve(&identity, &self.selector).await?;

        let rule = Self::asset_rule(ctx.platform);
        let asset = select(&release.assets, &rule, &identity.slug(), ctx.platform)?;

        // Raw binary asset: the pipeline renames it to the executable name
        // instead of extracting.
        let plan = AcquirePlan::archive(self.name(), &release.version, &asset.url, &asset.name)
            .with_auth()
            .with_executables(vec![exe.clone()]);
        let dir = acquire(&plan, &ctx.cache, ctx.client.http(), ctx.client.token()).await?;

        Ok(InstalledTool::cached(self.name(), dir.join(exe)))
    }

    /// Homebrew path for macOS; `--HEAD` tracks upstream when no explicit
    /// tag was requested.
    async fn install_with_brew(&self) -> Result<InstalledTool> {
        info!("Installing ttyd through Homebrew");
        run_checked("brew", &["update", "--quiet"]).await?;
        match &self.selector {
            VersionSelector::Latest => run_checked("brew", &["install", "ttyd", "--HEAD"]).await?,
            VersionSelector::Tag(_) => run_checked("brew", &["install", "ttyd"]).await?,
        }
        Ok(InstalledTool::on_path(self.name()))
    }
}

#[async_trait]
impl ToolInstaller for TtydInstaller {
    fn name(&self) -> &'static str {
        "ttyd"
    }

    async fn install(&self, ctx: &InstallContext) -> Result<InstalledTool> {
        match ctx.platform.os {
            Os::Darwin => self.install_with_brew().await,
            Os::Linux | Os::Windows => self.install_from_release(ctx).await,
        }
    }
}

/// The build-target suffix upstream names its Linux binaries with.
fn release_target(arch: Arch) -> &'static str {
    match arch {
        Arch::X86_64 => "x86_64",
        Arch::I386 => "i686",
        Arch::Arm64 => "aarch64",
        Arch::Armv7 => "armhf",
    }
}

async fn run_checked(program: &str, args: &[&str]) -> Result<()> {
    let status = tokio::process::Command::new(program)
        .args(args)
        .status()
        .await?;
    if !status.success() {
        return Err(Error::CommandFailed {
            program: program.to_string(),
            status: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
