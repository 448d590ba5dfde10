//! Version selectors.
//!
//! Input versions are normalized here, once, at parse time: a leading `v` is
//! stripped so that `v1.2.3` and `1.2.3` produce the same selector and the
//! same cache key everywhere downstream.

/// A requested version: the moving `latest` or an explicit tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// The most recent published release.
    Latest,
    /// An explicit tag, normalized (no leading `v`).
    Tag(String),
}

impl VersionSelector {
    /// Parse an input version string. Empty input means `latest`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("latest") {
            Self::Latest
        } else {
            Self::Tag(normalize(trimmed))
        }
    }
}

impl std::fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// Strip a single leading `v` from a tag.
#[must_use]
pub fn normalize(tag: &str) -> String {
    tag.strip_prefix('v').unwrap_or(tag).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latest() {
        assert_eq!(VersionSelector::parse("latest"), VersionSelector::Latest);
        assert_eq!(VersionSelector::parse("LATEST"), VersionSelector::Latest);
        assert_eq!(VersionSelector::parse(""), VersionSelector::Latest);
        assert_eq!(VersionSelector::parse("  "), VersionSelector::Latest);
    }

    #[test]
    fn test_parse_strips_leading_v() {
        assert_eq!(
            VersionSelector::parse("v1.2.3"),
            VersionSelector::Tag("1.2.3".into())
        );
        assert_eq!(
            VersionSelector::parse("1.2.3"),
            VersionSelector::Tag("1.2.3".into())
        );
    }

    #[test]
    fn test_prefixed_and_bare_selectors_are_identical() {
        // Same selector means the same cache key downstream.
        assert_eq!(
            VersionSelector::parse("v1.2.3"),
            VersionSelector::parse("1.2.3")
        );
    }

    #[test]
    fn test_normalize_only_strips_one_prefix() {
        assert_eq!(normalize("v0.7.1"), "0.7.1");
        assert_eq!(normalize("0.7.1"), "0.7.1");
        // Tags that genuinely start with "vv" keep the inner v.
        assert_eq!(normalize("vv1"), "v1");
    }
}
