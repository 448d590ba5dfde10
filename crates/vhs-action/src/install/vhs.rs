//! The vhs recorder itself.
//!
//! Release archives follow the `vhs_{version}_{Os}_{arch}.{ext}` convention,
//! so once the selector resolves to a concrete version the asset name is
//! known exactly.

use async_trait::async_trait;
use vhs_action_core::{Os, Result};
use vhs_action_fetch::{AcquirePlan, acquire};
use vhs_action_github::{AssetRule, ToolIdentity, VersionSelector, select};

use super::{InstallContext, InstalledTool, ToolInstaller};

pub struct VhsInstaller {
    selector: VersionSelector,
}

impl VhsInstaller {
    #[must_use]
    pub fn new(selector: VersionSelector) -> Self {
        Self { selector }
    }

    fn identity() -> ToolIdentity {
        ToolIdentity::new("charmbracelet", "vhs", "vhs")
    }

    /// The exact asset file name for a resolved version on this platform.
    fn asset_name(ctx: &InstallContext, version: &str) -> String {
        let ext = match ctx.platform.os {
            Os::Windows => "zip",
            _ => "tar.gz",
        };
        format!(
            "vhs_{version}_{}_{}.{ext}",
            ctx.platform.os.asset_name(),
            ctx.platform.arch.asset_name()
        )
    }
}

#[async_trait]
impl ToolInstaller for VhsInstaller {
    fn name(&self) -> &'static str {
        "vhs"
    }

    async fn install(&self, ctx: &InstallContext) -> Result<InstalledTool> {
        let exe = ctx.platform.os.exe_name("vhs");

        // An explicit tag can be answered from the cache without touching
        // the release API at all. `latest` has to resolve first.
        if let VersionSelector::Tag(tag) = &self.selector
            && let Some(dir) = ctx.cache.find(self.name(), tag)
        {
            return Ok(InstalledTool::cached(self.name(), dir.join(exe)));
        }

        let identity = Self::identity();
        let release = ctx.client.resolve(&identity, &self.selector).await?;

        let rule = AssetRule::exact(Self::asset_name(ctx, &release.version));
        let asset = select(&release.assets, &rule, &identity.slug(), ctx.platform)?;

        let plan = AcquirePlan::archive(self.name(), &release.version, &asset.url, &asset.name)
            .with_auth()
            .with_executables(vec![exe.clone()]);
        let dir = acquire(&plan, &ctx.cache, ctx.client.http(), ctx.client.token()).await?;

        Ok(InstalledTool::cached(self.name(), dir.join(exe)))
    }
}
