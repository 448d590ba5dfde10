//! Font acquisition and installation.
//!
//! A declarative catalog of monospaced families, acquired through the same
//! cache-first pipeline as the tools, installed into the OS font registry
//! best-effort.

pub mod install;
pub mod source;

pub use install::{FontInstaller, FontReport};
pub use source::{FontSource, catalog};
