#![deny(unsafe_code)]

use std::fmt;

use hcc_model::ModelVersion;
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "manifest.toml";
pub const MANIFEST_SCHEMA: &str = "hcc-raf.standards-manifest";
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest: ManifestHeader,
    #[serde(default)]
    pub notes: Option<ManifestNotes>,
    pub pins: Pins,
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub schema: String,
    pub schema_version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestNotes {
    pub summary: Option<String>,
}

/// Model versions the snapshot claims to cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pins {
    pub versions: Vec<ModelVersion>,
}

/// Which lookup table a manifest entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableRole {
    /// Diagnosis code to category list.
    Dxmap,
    /// Category descriptions with parent and child lists.
    Hccmap,
    /// `{MODEL}_{CODE}` to coefficient.
    Coefficients,
}

impl TableRole {
    pub const ALL: [TableRole; 3] = [TableRole::Dxmap, TableRole::Hccmap, TableRole::Coefficients];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableRole::Dxmap => "dxmap",
            TableRole::Hccmap => "hccmap",
            TableRole::Coefficients => "coefficients",
        }
    }
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    pub kind: String,
    pub role: TableRole,
    pub version: ModelVersion,
    #[serde(default)]
    pub notes: Option<String>,
}
