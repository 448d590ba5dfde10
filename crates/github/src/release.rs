//! GitHub release resolution.
//!
//! Two read operations are consumed from the release API: latest release and
//! release by tag. Each is a single attempt, fail fast; the caller decides
//! whether a failure is fatal.

use serde::Deserialize;
use tracing::debug;
use vhs_action_core::{Error, Result};

use crate::version::{VersionSelector, normalize};

/// Where a tool's releases are published, and the key it is cached under.
#[derive(Debug, Clone)]
pub struct ToolIdentity {
    /// Repository owner (e.g., "charmbracelet").
    pub owner: String,
    /// Repository name (e.g., "vhs").
    pub repo: String,
    /// Logical name used for cache keys.
    pub name: String,
}

impl ToolIdentity {
    /// Create a new tool identity.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            name: name.into(),
        }
    }

    /// The `owner/repo` slug used in URLs and error messages.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// One downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset file name.
    pub name: String,
    /// API asset endpoint; needs `Accept: application/octet-stream` and the
    /// bearer token, but works for private/rate-limited sources.
    pub url: String,
    /// Public direct-download link.
    pub browser_download_url: String,
}

/// Release metadata from the API.
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    assets: Vec<ReleaseAsset>,
}

/// A release resolved to a concrete version.
///
/// `version` always derives from the release's actual tag (leading `v`
/// stripped), never from the input selector, so that `latest` cache-keys
/// under a stable string.
#[derive(Debug)]
pub struct ResolvedRelease {
    /// Concrete version string, e.g. "0.7.1".
    pub version: String,
    /// The release's downloadable assets, in API order.
    pub assets: Vec<ReleaseAsset>,
}

/// Client for the release API.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl ReleaseClient {
    /// Create a client, optionally authenticated.
    ///
    /// # Panics
    ///
    /// Building the underlying HTTP client only fails on broken TLS backend
    /// initialization, which is a fundamental environment issue.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("vhs-action")
                .build()
                .expect("Failed to create HTTP client - TLS backend initialization failed"),
            token,
        }
    }

    /// The underlying HTTP client, shared with the download pipeline.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Resolve a selector against a repository's releases.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReleaseNotFound`] when no release exists for the
    /// selector, or a transport error for network failures.
    pub async fn resolve(
        &self,
        identity: &ToolIdentity,
        selector: &VersionSelector,
    ) -> Result<ResolvedRelease> {
        let release = match selector {
            VersionSelector::Latest => {
                debug!(repo = %identity.slug(), "Getting latest release");
                self.get_release(identity, "latest", "releases/latest").await?
            }
            VersionSelector::Tag(tag) => {
                debug!(repo = %identity.slug(), %tag, "Getting release by tag");
                // Tags are normalized on input; upstream may publish either
                // `v1.2.3` or `1.2.3`, so try both candidates in order.
                match self
                    .get_release(identity, tag, &format!("releases/tags/v{tag}"))
                    .await
                {
                    Ok(release) => release,
                    Err(e) if e.is_not_found() => {
                        self.get_release(identity, tag, &format!("releases/tags/{tag}"))
                            .await?
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        let version = normalize(&release.tag_name);
        debug!(repo = %identity.slug(), %version, assets = release.assets.len(), "Resolved release");

        Ok(ResolvedRelease {
            version,
            assets: release.assets,
        })
    }

    async fn get_release(
        &self,
        identity: &ToolIdentity,
        tag: &str,
        endpoint: &str,
    ) -> Result<Release> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/{endpoint}",
            identity.owner, identity.repo
        );

        let mut request = self.http.get(&url);
        if let Some(token) = self.token() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::release_not_found(identity.slug(), tag));
        }
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_deserializes_api_shape() {
        let json = r#"{
            "tag_name": "v0.7.1",
            "assets": [
                {
                    "name": "vhs_0.7.1_Linux_x86_64.tar.gz",
                    "url": "https://api.github.com/repos/charmbracelet/vhs/releases/assets/1",
                    "browser_download_url": "https://github.com/charmbracelet/vhs/releases/download/v0.7.1/vhs_0.7.1_Linux_x86_64.tar.gz"
                }
            ]
        }"#;
        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v0.7.1");
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].name, "vhs_0.7.1_Linux_x86_64.tar.gz");
    }

    #[test]
    fn test_resolved_version_derives_from_tag() {
        // The version string comes from the tag, normalized, regardless of
        // how the release was looked up.
        assert_eq!(normalize("v1.3.0"), "1.3.0");
        assert_eq!(normalize("1.3.0"), "1.3.0");
    }

    #[test]
    fn test_identity_slug() {
        let id = ToolIdentity::new("tsl0922", "ttyd", "ttyd");
        assert_eq!(id.slug(), "tsl0922/ttyd");
        assert_eq!(id.name, "ttyd");
    }
}
