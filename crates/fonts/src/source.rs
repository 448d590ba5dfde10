//! The font catalog.
//!
//! Each source is declarative: where the archive lives, how to pick it, and
//! which subtree of it holds the `.ttf` files. Sources are independent of
//! each other; the installer treats every one as best-effort.

use vhs_action_fetch::PathSegment;
use vhs_action_github::{AssetRule, ToolIdentity};

/// One font family to acquire and install.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// Archive attached to a repository's latest release.
    GithubRelease {
        identity: ToolIdentity,
        rule: AssetRule,
        static_path: Vec<PathSegment>,
    },
    /// Direct archive download with no release API in front of it. Caching
    /// is approximate (keyed at `latest`) since there is no tag to resolve.
    Direct {
        name: String,
        url: String,
        asset_name: String,
        static_path: Vec<PathSegment>,
    },
}

impl FontSource {
    /// Cache key name for this source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::GithubRelease { identity, .. } => &identity.name,
            Self::Direct { name, .. } => name,
        }
    }
}

/// Build a Google Fonts direct-download source.
fn google_font(family: &str, static_path: Vec<PathSegment>) -> FontSource {
    let escaped = family.replace(' ', "%20");
    FontSource::Direct {
        name: family.to_lowercase().replace(' ', "-"),
        url: format!("https://fonts.google.com/download?family={escaped}"),
        asset_name: format!("{}.zip", family.replace(' ', "")),
        static_path,
    }
}

/// The full monospaced font set the recorder's themes reference.
#[must_use]
pub fn catalog() -> Vec<FontSource> {
    use PathSegment::{AssetStem, Literal};

    vec![
        FontSource::GithubRelease {
            identity: ToolIdentity::new("adobe-fonts", "source-code-pro", "source-code-pro"),
            rule: AssetRule::pattern("TTF", ".zip"),
            static_path: vec![],
        },
        FontSource::GithubRelease {
            identity: ToolIdentity::new("dejavu-fonts", "dejavu-fonts", "dejavu-fonts"),
            rule: AssetRule::pattern("dejavu-fonts-ttf", ".zip"),
            // The zip nests everything under a directory named after the
            // archive itself (dejavu-fonts-ttf-2.37/ttf).
            static_path: vec![AssetStem, Literal("ttf".into())],
        },
        FontSource::GithubRelease {
            identity: ToolIdentity::new("tonsky", "FiraCode", "fira-code"),
            rule: AssetRule::pattern("Fira_Code", ".zip"),
            static_path: vec![Literal("ttf".into())],
        },
        FontSource::GithubRelease {
            identity: ToolIdentity::new("source-foundry", "Hack", "hack"),
            rule: AssetRule::pattern("Hack", "-ttf.zip"),
            static_path: vec![],
        },
        FontSource::GithubRelease {
            identity: ToolIdentity::new("JetBrains", "JetBrainsMono", "jetbrains-mono"),
            rule: AssetRule::pattern("JetBrainsMono", ".zip"),
            static_path: vec![Literal("fonts".into()), Literal("ttf".into())],
        },
        google_font(
            "Inconsolata",
            vec![Literal("static".into()), Literal("Inconsolata".into())],
        ),
        google_font(
            "Noto Sans Mono",
            vec![Literal("static".into()), Literal("NotoSansMono".into())],
        ),
        google_font("Roboto Mono", vec![Literal("static".into())]),
        google_font("Ubuntu Mono", vec![]),
        // Liberation publishes its archives in release notes, not as release
        // assets, hence the pinned direct URL.
        FontSource::Direct {
            name: "liberation".into(),
            url: "https://github.com/liberationfonts/liberation-fonts/files/7261482/liberation-fonts-ttf-2.1.5.tar.gz".into(),
            asset_name: "liberation-fonts-ttf-2.1.5.tar.gz".into(),
            static_path: vec![PathSegment::AssetStem],
        },
    ]
}
