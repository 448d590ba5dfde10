//! Core types for the vhs-action workspace.
//!
//! This crate holds what every other member needs: the error taxonomy, the
//! action configuration, platform identification, the versioned tool cache,
//! and the runner command-file surfaces.

pub mod cache;
pub mod config;
pub mod error;
pub mod platform;
pub mod runner;

pub use cache::{ToolCache, default_cache_root};
pub use config::Config;
pub use error::{Error, Result};
pub use platform::{Arch, Os, Platform};
