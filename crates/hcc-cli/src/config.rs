//! Engine configuration for the CLI: an optional TOML file, then flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hcc_model::{EngineConfig, ModelVersion, PayerModel};
use hcc_standards::standards_root;
use tracing::debug;

/// Values given on the command line that win over the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    pub version: Option<ModelVersion>,
    pub model: Option<PayerModel>,
    pub base_rate: Option<f64>,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: EngineConfig) -> EngineConfig {
        if let Some(version) = self.version {
            config.version = version;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(base_rate) = self.base_rate {
            config.base_rate = base_rate;
        }
        config
    }
}

/// Reads an [`EngineConfig`] from TOML. Missing keys take their defaults.
pub fn read_config_file(path: &Path) -> Result<EngineConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let config: EngineConfig =
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
    debug!(path = %path.display(), version = %config.version, "loaded config file");
    Ok(config)
}

/// File values (or defaults) with the flag overrides applied.
pub fn load_engine_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<EngineConfig> {
    let base = match path {
        Some(path) => read_config_file(path)?,
        None => EngineConfig::default(),
    };
    Ok(overrides.apply(base))
}

/// `--standards-dir`, else `HCC_STANDARDS_DIR`, else the bundled snapshot.
pub fn resolve_standards_dir(flag: Option<&Path>) -> PathBuf {
    flag.map_or_else(standards_root, Path::to_path_buf)
}
