#![deny(unsafe_code)]

//! Versioned CMS-HCC lookup tables.
//!
//! A standards directory holds, per model version, a diagnosis map, a
//! category hierarchy map and a coefficient table, all pinned by sha256 in
//! `manifest.toml`. [`StandardsRegistry::verify_and_load`] checks and types
//! them into an immutable [`LookupTables`] snapshot.

pub mod doctor;
pub mod error;
pub mod hash;
pub mod hierarchy;
pub mod manifest;
pub mod paths;
pub mod registry;
pub mod tables;

pub use crate::doctor::DoctorReport;
pub use crate::error::StandardsError;
pub use crate::hierarchy::{CategoryHierarchy, CategoryId, HierarchyNode, HierarchyViolation};
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
pub use crate::registry::{StandardsRegistry, VerifySummary, VersionCounts};
pub use crate::tables::{
    CoefficientTable, DiagnosisEntry, LookupTables, VersionTables, VersionTablesBuilder,
};

/// Loads and verifies the snapshot under [`standards_root`].
pub fn load_default_tables() -> Result<LookupTables, StandardsError> {
    let (tables, _) = StandardsRegistry::verify_and_load(&standards_root())?;
    Ok(tables)
}
