//! Build profiles.
//!
//! A profile is a JSON file mapping compiler toolchain names to flag lists:
//!
//! ```json
//! { "GCC_ARM": { "common": ["-Os"], "c": ["-std=gnu99"], "ld": ["-Wl,--gc-sections"] } }
//! ```
//!
//! Several profiles can be given; their flags are concatenated in order.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::prelude::*;

/// Flags of one compiler toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainFlags {
    /// Flags passed to every compiler invocation.
    #[serde(default)]
    pub common: Vec<String>,
    #[serde(default)]
    pub c: Vec<String>,
    #[serde(default)]
    pub cxx: Vec<String>,
    #[serde(default)]
    pub asm: Vec<String>,
    #[serde(default)]
    pub ld: Vec<String>,
}

impl ToolchainFlags {
    /// Append the flags of `other` after ours.
    pub fn merge(&mut self, other: ToolchainFlags) {
        self.common.extend(other.common);
        self.c.extend(other.c);
        self.cxx.extend(other.cxx);
        self.asm.extend(other.asm);
        self.ld.extend(other.ld);
    }
}

/// Merge the flags for `toolchain` from every profile file, in order.
///
/// Profiles without a section for the toolchain contribute nothing.
pub fn extract_profile(profiles: &[PathBuf], toolchain: &str) -> Result<ToolchainFlags> {
    let mut flags = ToolchainFlags::default();
    for path in profiles {
        let contents = std::fs::read_to_string(path)?;
        let mut profile: std::collections::HashMap<String, ToolchainFlags> =
            serde_json::from_str(&contents).map_err(|source| Error::Profile {
                path: path.clone(),
                source,
            })?;
        match profile.remove(toolchain) {
            Some(section) => flags.merge(section),
            None => debug!("Profile {:?} has no section for {toolchain}", path),
        }
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_profile(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write profile");
        path
    }

    #[test]
    fn profiles_are_merged_in_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let develop = write_profile(
            &dir,
            "develop.json",
            r#"{"GCC_ARM": {"common": ["-Os"], "c": ["-std=gnu99"]}, "ARM": {"common": ["-O3"]}}"#,
        );
        let debug = write_profile(
            &dir,
            "debug.json",
            r#"{"GCC_ARM": {"common": ["-g3"], "ld": ["-Wl,--gc-sections"]}}"#,
        );

        let flags = extract_profile(&[develop, debug], "GCC_ARM")?;
        assert_eq!(flags.common, vec!["-Os", "-g3"]);
        assert_eq!(flags.c, vec!["-std=gnu99"]);
        assert_eq!(flags.ld, vec!["-Wl,--gc-sections"]);
        assert!(flags.cxx.is_empty());
        Ok(())
    }

    #[test]
    fn missing_section_contributes_nothing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let profile = write_profile(&dir, "p.json", r#"{"ARM": {"common": ["-O3"]}}"#);
        assert_eq!(extract_profile(&[profile], "IAR")?, ToolchainFlags::default());
        assert_eq!(extract_profile(&[], "IAR")?, ToolchainFlags::default());
        Ok(())
    }

    #[test]
    fn invalid_json_names_the_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let profile = write_profile(&dir, "broken.json", "{ not json");
        match extract_profile(&[profile.clone()], "GCC_ARM") {
            Err(Error::Profile { path, .. }) => assert_eq!(path, profile),
            other => panic!("Expected a profile error, got {other:?}"),
        }
        Ok(())
    }
}
