//! Typed, read-only lookup tables.
//!
//! [`LookupTables`] is the snapshot the engine is built over: one
//! [`VersionTables`] per model version, never mutated after construction.

use std::collections::{BTreeMap, HashMap};

use hcc_model::{CategoryCode, DiagnosisCode, ModelVersion, PayerModel};
use serde::Deserialize;

use crate::error::StandardsError;
use crate::hierarchy::{CategoryHierarchy, CategoryRecord};

/// `dxmap.json` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDiagnosisEntry {
    pub desc: String,
    #[serde(default)]
    pub hccs: Vec<String>,
}

/// `hccmap.json` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCategoryEntry {
    pub desc: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub children: Vec<String>,
}

pub type RawDiagnosisMap = BTreeMap<String, RawDiagnosisEntry>;
pub type RawCategoryMap = BTreeMap<String, RawCategoryEntry>;
pub type RawCoefficients = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisEntry {
    pub description: String,
    /// Categories as listed, which may include codes the hierarchy lacks.
    pub categories: Vec<CategoryCode>,
}

/// Coefficients keyed by `{MODEL}_{CODE}`.
#[derive(Debug, Clone, Default)]
pub struct CoefficientTable {
    values: HashMap<String, f64>,
}

impl CoefficientTable {
    pub fn key(model: PayerModel, code: impl std::fmt::Display) -> String {
        format!("{}_{}", model.as_str(), code)
    }

    pub fn get(&self, model: PayerModel, code: impl std::fmt::Display) -> Option<f64> {
        self.values.get(&Self::key(model, code)).copied()
    }

    pub fn get_key(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for CoefficientTable {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Every table for one model version.
#[derive(Debug, Clone)]
pub struct VersionTables {
    pub version: ModelVersion,
    pub diagnoses: HashMap<DiagnosisCode, DiagnosisEntry>,
    pub hierarchy: CategoryHierarchy,
    pub coefficients: CoefficientTable,
}

impl VersionTables {
    pub fn builder(version: ModelVersion) -> VersionTablesBuilder {
        VersionTablesBuilder::new(version)
    }

    /// Types the three raw JSON tables. Keys and category references are
    /// canonicalized on the way in.
    pub fn from_raw(
        version: ModelVersion,
        dxmap: RawDiagnosisMap,
        hccmap: RawCategoryMap,
        coefficients: RawCoefficients,
    ) -> Result<Self, StandardsError> {
        let mut diagnoses = HashMap::with_capacity(dxmap.len());
        for (code, entry) in dxmap {
            let categories = entry
                .hccs
                .iter()
                .map(CategoryCode::new)
                .collect::<Result<Vec<_>, _>>()?;
            diagnoses.insert(
                DiagnosisCode::new(&code)?,
                DiagnosisEntry {
                    description: entry.desc,
                    categories,
                },
            );
        }

        let mut records = BTreeMap::new();
        for (code, entry) in hccmap {
            let parse_all = |codes: &[String]| -> Result<Vec<CategoryCode>, StandardsError> {
                codes
                    .iter()
                    .map(|c| CategoryCode::new(c).map_err(StandardsError::from))
                    .collect()
            };
            records.insert(
                CategoryCode::new(&code)?,
                CategoryRecord {
                    description: entry.desc,
                    parents: parse_all(&entry.parents)?,
                    children: parse_all(&entry.children)?,
                },
            );
        }
        let hierarchy = CategoryHierarchy::from_records(version, records)?;

        Ok(Self {
            version,
            diagnoses,
            hierarchy,
            coefficients: coefficients.into_iter().collect(),
        })
    }

    pub fn diagnosis(&self, code: &DiagnosisCode) -> Option<&DiagnosisEntry> {
        self.diagnoses.get(code)
    }

    /// Diagnosis mappings that point at categories absent from the hierarchy.
    pub fn unmapped_categories(&self) -> Vec<(DiagnosisCode, CategoryCode)> {
        let mut missing: Vec<(DiagnosisCode, CategoryCode)> = self
            .diagnoses
            .iter()
            .flat_map(|(dx, entry)| {
                entry
                    .categories
                    .iter()
                    .filter(|category| !self.hierarchy.contains(**category))
                    .map(move |category| (dx.clone(), *category))
            })
            .collect();
        missing.sort();
        missing
    }
}

/// In-memory construction of [`VersionTables`] without touching disk.
#[derive(Debug, Clone)]
pub struct VersionTablesBuilder {
    version: ModelVersion,
    dxmap: RawDiagnosisMap,
    hccmap: RawCategoryMap,
    coefficients: RawCoefficients,
}

impl VersionTablesBuilder {
    pub fn new(version: ModelVersion) -> Self {
        Self {
            version,
            dxmap: BTreeMap::new(),
            hccmap: BTreeMap::new(),
            coefficients: BTreeMap::new(),
        }
    }

    pub fn diagnosis(mut self, code: &str, description: &str, categories: &[&str]) -> Self {
        self.dxmap.insert(
            code.to_string(),
            RawDiagnosisEntry {
                desc: description.to_string(),
                hccs: categories.iter().map(|c| c.to_string()).collect(),
            },
        );
        self
    }

    /// Adds a category with its children. Parent lists are derived as the
    /// inverse of every child list when the tables are built.
    pub fn category(mut self, code: &str, description: &str, children: &[&str]) -> Self {
        let entry = self
            .hccmap
            .entry(code.to_string())
            .or_insert_with(|| RawCategoryEntry {
                desc: String::new(),
                parents: Vec::new(),
                children: Vec::new(),
            });
        entry.desc = description.to_string();
        entry.children = children.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn coefficient(mut self, key: &str, value: f64) -> Self {
        self.coefficients.insert(key.to_string(), value);
        self
    }

    pub fn build(mut self) -> Result<VersionTables, StandardsError> {
        let links: Vec<(String, String)> = self
            .hccmap
            .iter()
            .flat_map(|(parent, entry)| {
                entry
                    .children
                    .iter()
                    .map(move |child| (parent.clone(), child.clone()))
            })
            .collect();
        for (parent, child) in links {
            if let Some(entry) = self.hccmap.get_mut(&child) {
                entry.parents.push(parent);
            }
        }
        VersionTables::from_raw(self.version, self.dxmap, self.hccmap, self.coefficients)
    }
}

/// The full snapshot, one entry per loaded version.
#[derive(Debug, Clone, Default)]
pub struct LookupTables {
    versions: BTreeMap<ModelVersion, VersionTables>,
}

impl LookupTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, tables: VersionTables) -> Self {
        self.insert(tables);
        self
    }

    pub fn insert(&mut self, tables: VersionTables) {
        self.versions.insert(tables.version, tables);
    }

    pub fn get(&self, version: ModelVersion) -> Option<&VersionTables> {
        self.versions.get(&version)
    }

    pub fn require(&self, version: ModelVersion) -> Result<&VersionTables, StandardsError> {
        self.get(version)
            .ok_or(StandardsError::MissingVersion { version })
    }

    pub fn versions(&self) -> impl Iterator<Item = ModelVersion> + '_ {
        self.versions.keys().copied()
    }
}
