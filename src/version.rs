//! Version and build information
//!
//! Provides access to build-time embedded information.

use std::fmt;

/// Build information embedded at compile time
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Package version from Cargo.toml
    pub version: &'static str,
    /// Package name
    pub name: &'static str,
    /// Git commit hash (short)
    pub git_hash: &'static str,
    /// Raw git dirty string ("true" or "false")
    git_dirty_str: &'static str,
    /// Build timestamp
    pub build_timestamp: &'static str,
    /// Target triple (e.g., x86_64-unknown-linux-gnu)
    pub target: &'static str,
    /// Build profile (debug/release)
    pub profile: &'static str,
}

impl BuildInfo {
    /// Get the current build information
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            name: env!("CARGO_PKG_NAME"),
            git_hash: env!("BOOTLOADER_GIT_HASH"),
            git_dirty_str: env!("BOOTLOADER_GIT_DIRTY"),
            build_timestamp: env!("BOOTLOADER_BUILD_TIMESTAMP"),
            target: env!("BOOTLOADER_TARGET"),
            profile: env!("BOOTLOADER_PROFILE"),
        }
    }

    /// Whether the working directory was dirty at build time
    pub fn git_dirty(&self) -> bool {
        self.git_dirty_str == "true"
    }

    /// Get the full version string (e.g., "0.1.0-abc1234")
    pub fn full_version(&self) -> String {
        if self.git_dirty() {
            format!("{}-{}-dirty", self.version, self.git_hash)
        } else {
            format!("{}-{}", self.version, self.git_hash)
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.full_version())?;
        writeln!(f)?;
        writeln!(f, "Build Information:")?;
        writeln!(f, "  Git Hash:   {}{}", self.git_hash, if self.git_dirty() { " (dirty)" } else { "" })?;
        writeln!(f, "  Built:      {}", self.build_timestamp)?;
        writeln!(f, "  Profile:    {}", self.profile)?;
        write!(f, "  Target:     {}", self.target)
    }
}

/// Get the current build info
pub fn build_info() -> BuildInfo {
    BuildInfo::current()
}

/// Multi-line version text shown by `--version`
pub fn long_version() -> String {
    build_info().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_exists() {
        let info = build_info();
        assert!(!info.version.is_empty());
        assert_eq!(info.name, "persona-bootloader");
    }

    #[test]
    fn test_full_version_format() {
        let info = build_info();
        let full = info.full_version();

        assert!(full.starts_with(info.version));
        assert!(full.contains(info.git_hash));
    }

    #[test]
    fn test_long_version_lists_build_details() {
        let text = long_version();
        assert!(text.contains("Build Information:"));
        assert!(text.contains("Git Hash:"));
        assert!(text.contains("Target:"));
    }
}
