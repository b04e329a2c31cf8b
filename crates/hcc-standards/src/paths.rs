//! Standards directory path resolution.

use std::path::PathBuf;

use hcc_model::ModelVersion;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "HCC_STANDARDS_DIR";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `HCC_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
///
/// # Example
///
/// ```rust,ignore
/// let root = hcc_standards::standards_root();
/// let manifest = root.join("manifest.toml");
/// ```
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

/// Directory holding one version's tables.
pub fn version_dir(version: ModelVersion) -> PathBuf {
    standards_root().join(version.as_str())
}
