//! GitHub release resolution and asset selection.
//!
//! The resolver turns a version selector into a concrete release with its
//! asset list; the selector picks exactly one asset by naming rule. Both are
//! consulted only after a cache miss.

pub mod asset;
pub mod release;
pub mod version;

pub use asset::{AssetRule, select};
pub use release::{ReleaseAsset, ReleaseClient, ResolvedRelease, ToolIdentity};
pub use version::VersionSelector;
