//! Asset selection.
//!
//! Each platform gets one match rule per tool; selection is first match in
//! the release's asset list, which keeps the choice deterministic for a
//! fixed input list. A miss names the expected pattern and platform, since
//! upstream renaming its assets is the most common failure in practice.

use vhs_action_core::{Error, Platform, Result};

use crate::release::ReleaseAsset;

/// Naming rule used to pick one asset out of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRule {
    /// The asset's exact file name.
    Exact(String),
    /// Prefix/suffix match; either side may be empty.
    Pattern {
        starts_with: String,
        ends_with: String,
    },
}

impl AssetRule {
    /// Exact-name rule.
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Prefix/suffix rule.
    #[must_use]
    pub fn pattern(starts_with: impl Into<String>, ends_with: impl Into<String>) -> Self {
        Self::Pattern {
            starts_with: starts_with.into(),
            ends_with: ends_with.into(),
        }
    }

    /// Suffix-only rule.
    #[must_use]
    pub fn ends_with(suffix: impl Into<String>) -> Self {
        Self::pattern("", suffix)
    }

    /// Whether an asset name satisfies this rule.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(expected) => name == expected,
            Self::Pattern {
                starts_with,
                ends_with,
            } => name.starts_with(starts_with.as_str()) && name.ends_with(ends_with.as_str()),
        }
    }
}

impl std::fmt::Display for AssetRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(name) => write!(f, "'{name}'"),
            Self::Pattern {
                starts_with,
                ends_with,
            } => write!(f, "'{starts_with}*{ends_with}'"),
        }
    }
}

/// Pick the first asset satisfying `rule`, in input list order.
///
/// # Errors
///
/// Returns [`Error::AssetNotFound`] naming the rule and platform when no
/// asset matches; there is no fallback to an unrelated asset.
pub fn select<'a>(
    assets: &'a [ReleaseAsset],
    rule: &AssetRule,
    repo: &str,
    platform: Platform,
) -> Result<&'a ReleaseAsset> {
    assets
        .iter()
        .find(|asset| rule.matches(&asset.name))
        .ok_or_else(|| Error::asset_not_found(repo, rule.to_string(), platform.to_string()))
}
