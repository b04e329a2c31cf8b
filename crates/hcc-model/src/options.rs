//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::enums::{ModelVersion, PayerModel};

/// CMS Medicare Advantage base rate used when none is supplied.
pub const DEFAULT_BASE_RATE: f64 = 868.0;

/// Defaults applied to every calculation unless a call overrides them.
///
/// Loaded from TOML by the CLI; missing keys fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub version: ModelVersion,
    pub model: PayerModel,
    /// Monthly base rate multiplied into premiums.
    pub base_rate: f64,
    /// Report unpriced categories and unknown diagnoses with zero values.
    pub verbose: bool,
    /// Keep every mapped category even when a parent is present.
    pub never_trump: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: ModelVersion::default(),
            model: PayerModel::default(),
            base_rate: DEFAULT_BASE_RATE,
            verbose: true,
            never_trump: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: ModelVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_model(mut self, model: PayerModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_base_rate(mut self, base_rate: f64) -> Self {
        self.base_rate = base_rate;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_never_trump(mut self, never_trump: bool) -> Self {
        self.never_trump = never_trump;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"version": "v24", "model": "INS"}"#).unwrap();
        assert_eq!(config.version, ModelVersion::V24);
        assert_eq!(config.model, PayerModel::Institutional);
        assert_eq!(config.base_rate, DEFAULT_BASE_RATE);
        assert!(config.verbose);
        assert!(!config.never_trump);
    }

    #[test]
    fn unknown_model_is_rejected() {
        let parsed = serde_json::from_str::<EngineConfig>(r#"{"model": "XYZ"}"#);
        assert!(parsed.is_err());
    }
}
