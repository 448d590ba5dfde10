//! Download, extract, and cache pipeline.

pub mod download;
pub mod extract;
pub mod pipeline;

pub use download::{DownloadAuth, download};
pub use extract::{ArchiveKind, asset_stem, extract};
pub use pipeline::{AcquirePlan, PathSegment, acquire};
