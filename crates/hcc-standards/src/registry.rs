#![deny(unsafe_code)]

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use hcc_model::ModelVersion;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::StandardsError;
use crate::hash::read_with_digest;
use crate::manifest::{
    MANIFEST_FILE, MANIFEST_SCHEMA, MANIFEST_SCHEMA_VERSION, Manifest, ManifestFile, TableRole,
};
use crate::tables::{LookupTables, VersionTables};

const ALLOWED_KINDS: &[&str] = &["json"];

/// Per-version table sizes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VersionCounts {
    pub version: ModelVersion,
    pub diagnoses: usize,
    pub categories: usize,
    pub coefficients: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct VerifySummary {
    pub standards_dir: PathBuf,
    pub schema: String,
    pub schema_version: u32,
    pub summary: Option<String>,
    pub pinned_versions: Vec<ModelVersion>,
    pub files: Vec<ManifestFile>,
    pub versions: Vec<VersionCounts>,
}

/// Loader for a standards directory.
pub struct StandardsRegistry;

impl StandardsRegistry {
    /// Verifies the manifest and every listed file, then types the tables.
    ///
    /// Nothing is parsed until every checksum matches.
    pub fn verify_and_load(
        standards_dir: &Path,
    ) -> Result<(LookupTables, VerifySummary), StandardsError> {
        let manifest = load_manifest(&standards_dir.join(MANIFEST_FILE))?;
        validate_manifest(&manifest)?;

        let mut files = manifest.files.clone();
        files.sort_by(|a, b| (a.version, a.role).cmp(&(b.version, b.role)));

        let mut contents = Vec::with_capacity(files.len());
        for file in &files {
            contents.push(verify_file(standards_dir, file)?);
        }

        let mut tables = LookupTables::new();
        let mut versions = Vec::new();
        for version in &manifest.pins.versions {
            let (dx_path, dx_bytes) = role_contents(&files, &contents, *version, TableRole::Dxmap)?;
            let (hcc_path, hcc_bytes) =
                role_contents(&files, &contents, *version, TableRole::Hccmap)?;
            let (coef_path, coef_bytes) =
                role_contents(&files, &contents, *version, TableRole::Coefficients)?;

            let version_tables = VersionTables::from_raw(
                *version,
                parse_json(dx_path, dx_bytes)?,
                parse_json(hcc_path, hcc_bytes)?,
                parse_json(coef_path, coef_bytes)?,
            )?;

            let counts = VersionCounts {
                version: *version,
                diagnoses: version_tables.diagnoses.len(),
                categories: version_tables.hierarchy.len(),
                coefficients: version_tables.coefficients.len(),
            };
            debug!(
                version = %counts.version,
                diagnoses = counts.diagnoses,
                categories = counts.categories,
                coefficients = counts.coefficients,
                "loaded version tables"
            );
            versions.push(counts);
            tables.insert(version_tables);
        }

        info!(
            dir = %standards_dir.display(),
            files = files.len(),
            versions = versions.len(),
            "standards verified"
        );

        let summary = VerifySummary {
            standards_dir: standards_dir.to_path_buf(),
            schema: manifest.manifest.schema.clone(),
            schema_version: manifest.manifest.schema_version,
            summary: manifest.notes.as_ref().and_then(|n| n.summary.clone()),
            pinned_versions: manifest.pins.versions.clone(),
            files,
            versions,
        };

        Ok((tables, summary))
    }
}

fn load_manifest(path: &Path) -> Result<Manifest, StandardsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

fn validate_manifest(manifest: &Manifest) -> Result<(), StandardsError> {
    if manifest.manifest.schema != MANIFEST_SCHEMA {
        return Err(StandardsError::invalid_manifest(format!(
            "unsupported schema: {}",
            manifest.manifest.schema
        )));
    }
    if manifest.manifest.schema_version != MANIFEST_SCHEMA_VERSION {
        return Err(StandardsError::invalid_manifest(format!(
            "unsupported schema_version: {}",
            manifest.manifest.schema_version
        )));
    }
    if manifest.pins.versions.is_empty() {
        return Err(StandardsError::invalid_manifest("no versions pinned"));
    }

    let mut seen: BTreeSet<(ModelVersion, TableRole)> = BTreeSet::new();
    for file in &manifest.files {
        if !seen.insert((file.version, file.role)) {
            return Err(StandardsError::DuplicateRole {
                version: file.version,
                role: file.role.to_string(),
            });
        }
        if !manifest.pins.versions.contains(&file.version) {
            return Err(StandardsError::invalid_manifest(format!(
                "{} is listed for unpinned version {}",
                file.path, file.version
            )));
        }
        if !ALLOWED_KINDS.contains(&file.kind.as_str()) {
            return Err(StandardsError::invalid_manifest(format!(
                "unsupported kind '{}' for {}",
                file.kind, file.path
            )));
        }
        validate_sha(&file.sha256, &file.path)?;
        validate_path(&file.path)?;
    }

    for version in &manifest.pins.versions {
        for role in TableRole::ALL {
            if !seen.contains(&(*version, role)) {
                return Err(StandardsError::MissingRole {
                    version: *version,
                    role: role.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn validate_sha(sha: &str, path: &str) -> Result<(), StandardsError> {
    if sha.len() != 64 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StandardsError::InvalidSha256 {
            path: PathBuf::from(path),
            message: "expected 64 hex characters".to_string(),
        });
    }
    Ok(())
}

fn validate_path(path: &str) -> Result<(), StandardsError> {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return Err(StandardsError::InvalidPath {
            path: candidate.to_path_buf(),
            message: "must be relative".to_string(),
        });
    }
    if candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(StandardsError::InvalidPath {
            path: candidate.to_path_buf(),
            message: "must not leave the standards directory".to_string(),
        });
    }
    Ok(())
}

fn verify_file(
    standards_dir: &Path,
    file: &ManifestFile,
) -> Result<(PathBuf, Vec<u8>), StandardsError> {
    let full_path = standards_dir.join(&file.path);
    let (bytes, actual) = read_with_digest(&full_path)?;
    let expected = file.sha256.to_ascii_lowercase();
    if actual != expected {
        return Err(StandardsError::Sha256Mismatch {
            path: full_path,
            expected,
            actual,
        });
    }
    Ok((full_path, bytes))
}

fn role_contents<'a>(
    files: &'a [ManifestFile],
    contents: &'a [(PathBuf, Vec<u8>)],
    version: ModelVersion,
    role: TableRole,
) -> Result<(&'a Path, &'a [u8]), StandardsError> {
    files
        .iter()
        .zip(contents)
        .find(|(f, _)| f.version == version && f.role == role)
        .map(|(_, (path, bytes))| (path.as_path(), bytes.as_slice()))
        .ok_or_else(|| StandardsError::MissingRole {
            version,
            role: role.to_string(),
        })
}

fn parse_json<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T, StandardsError> {
    serde_json::from_slice(bytes).map_err(|e| StandardsError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}
