//! Platform identification for asset selection.
//!
//! Exactly one `(os, arch)` pair is active per run; it is detected once at
//! startup and passed into every acquisition call site. Release archives are
//! named per platform, so both halves also carry the spelling each upstream
//! uses in its asset names.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Platform identifier combining OS and architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the platform the current process runs on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] when either half has no
    /// acquisition strategy. This is checked before any network call.
    pub fn detect() -> Result<Self> {
        Self::from_consts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Build a platform from `std::env::consts`-style OS and arch names.
    pub fn from_consts(os: &str, arch: &str) -> Result<Self> {
        let os = Os::parse(os).ok_or_else(|| Error::unsupported_platform(os))?;
        let arch = Arch::parse(arch).ok_or_else(|| Error::unsupported_platform(arch))?;
        Ok(Self { os, arch })
    }

    /// Parse from string like "linux-x86_64".
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (os, arch) = s.split_once('-')?;
        Some(Self {
            os: Os::parse(os)?,
            arch: Arch::parse(arch)?,
        })
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Darwin,
    Windows,
}

impl Os {
    /// Parse from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Some(Self::Linux),
            "darwin" | "macos" => Some(Self::Darwin),
            "windows" | "win32" => Some(Self::Windows),
            _ => None,
        }
    }

    /// The capitalized spelling used in vhs release asset names
    /// (`vhs_0.7.1_Linux_x86_64.tar.gz`).
    #[must_use]
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Darwin => "Darwin",
            Self::Windows => "Windows",
        }
    }

    /// Whether executables need explicit permission bits after extraction.
    #[must_use]
    pub fn is_unix(self) -> bool {
        matches!(self, Self::Linux | Self::Darwin)
    }

    /// Platform-appropriate name for an executable file.
    #[must_use]
    pub fn exe_name(self, base: &str) -> String {
        match self {
            Self::Windows => format!("{base}.exe"),
            _ => base.to_string(),
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Darwin => write!(f, "darwin"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86_64,
    I386,
    Arm64,
    Armv7,
}

impl Arch {
    /// Parse from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Some(Self::X86_64),
            "x86" | "i386" | "i686" | "x32" => Some(Self::I386),
            "arm64" | "aarch64" => Some(Self::Arm64),
            "arm" | "armv7" => Some(Self::Armv7),
            _ => None,
        }
    }

    /// The spelling used in vhs release asset names.
    #[must_use]
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::I386 => "i386",
            Self::Arm64 => "arm64",
            Self::Armv7 => "armv7",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X86_64 => write!(f, "x86_64"),
            Self::I386 => write!(f, "i386"),
            Self::Arm64 => write!(f, "arm64"),
            Self::Armv7 => write!(f, "armv7"),
        }
    }
}
