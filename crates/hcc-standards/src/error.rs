#![deny(unsafe_code)]

use std::path::PathBuf;

use hcc_model::{CategoryCode, ModelError, ModelVersion};

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON table {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("missing required role in manifest for {version}: {role}")]
    MissingRole { version: ModelVersion, role: String },

    #[error("duplicate role in manifest for {version}: {role}")]
    DuplicateRole { version: ModelVersion, role: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("invalid manifest path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("{version} hierarchy: {category} lists unknown {relation} {reference}")]
    DanglingReference {
        version: ModelVersion,
        category: CategoryCode,
        relation: &'static str,
        reference: CategoryCode,
    },

    #[error("no lookup tables loaded for {version}")]
    MissingVersion { version: ModelVersion },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }
}
