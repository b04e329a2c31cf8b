#![deny(unsafe_code)]

use hcc_model::{CategoryCode, DiagnosisCode, ModelVersion};

use crate::hierarchy::HierarchyViolation;
use crate::manifest::ManifestFile;
use crate::registry::{VerifySummary, VersionCounts};
use crate::tables::LookupTables;

#[derive(Debug, Clone, serde::Serialize)]
pub struct DoctorReport {
    pub schema: String,
    pub schema_version: u32,
    pub pinned_versions: Vec<ModelVersion>,
    pub files: Vec<ManifestFile>,
    pub versions: Vec<VersionDoctor>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VersionDoctor {
    #[serde(flatten)]
    pub counts: VersionCounts,
    pub inverse_violations: Vec<HierarchyViolation>,
    pub unmapped_categories: Vec<UnmappedCategory>,
}

/// A diagnosis that maps to a category the hierarchy does not define.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UnmappedCategory {
    pub diagnosis: DiagnosisCode,
    pub category: CategoryCode,
}

impl DoctorReport {
    pub fn from_verify_summary(summary: &VerifySummary, tables: &LookupTables) -> Self {
        let versions = summary
            .versions
            .iter()
            .map(|counts| {
                let (inverse_violations, unmapped_categories) = tables
                    .get(counts.version)
                    .map(|t| {
                        let unmapped = t
                            .unmapped_categories()
                            .into_iter()
                            .map(|(diagnosis, category)| UnmappedCategory {
                                diagnosis,
                                category,
                            })
                            .collect();
                        (t.hierarchy.inverse_violations(), unmapped)
                    })
                    .unwrap_or_default();
                VersionDoctor {
                    counts: counts.clone(),
                    inverse_violations,
                    unmapped_categories,
                }
            })
            .collect();

        Self {
            schema: "hcc-raf.standards-doctor".to_string(),
            schema_version: 1,
            pinned_versions: summary.pinned_versions.clone(),
            files: summary.files.clone(),
            versions,
        }
    }

    /// True when any version's parent and child lists disagree.
    pub fn has_violations(&self) -> bool {
        self.versions
            .iter()
            .any(|v| !v.inverse_violations.is_empty())
    }
}
