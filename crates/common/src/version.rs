use std::fmt;

use serde::Serialize;

/// Version and build details reported at startup and by `trustvault version`.
///  Everything but `version` is stamped in by the build script.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub repo_version: &'static str,
    pub build_profile: &'static str,
    pub build_timestamp: &'static str,
    pub rust_version: &'static str,
    pub build_target: Option<&'static str>,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trustvault {} ({}, {})",
            self.version, self.repo_version, self.build_profile
        )?;
        if let Some(target) = self.build_target {
            write!(f, " {}", target)?;
        }
        write!(f, "\nbuilt {} with {}", self.build_timestamp, self.rust_version)
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        repo_version: env!("REPO_VERSION"),
        build_profile: env!("BUILD_PROFILE"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
        rust_version: env!("RUST_VERSION"),
        build_target: option_env!("BUILD_TARGET"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_build_info_is_stamped() {
        let info = build_info();
        assert!(!info.repo_version.is_empty());
        assert_ne!(info.build_profile, "unknown");
        assert!(info.build_target.is_some());

        let rendered = info.to_string();
        assert!(rendered.starts_with("trustvault "));
        assert!(rendered.contains(env!("CARGO_PKG_VERSION")));
        assert!(rendered.contains(info.build_profile));
    }
}
