//! Diagnosis to category mapping.

use std::collections::BTreeSet;

use hcc_model::{CategoryCode, DiagnosisCode, Sex};
use hcc_standards::VersionTables;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::edits::{EditOutcome, age_sex_edit};
use crate::trump::{trump, trumped_by};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedCategory {
    pub code: CategoryCode,
    pub description: String,
    /// Present parent that trumps this category, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trumped_by: Option<CategoryCode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedDiagnosis {
    pub code: DiagnosisCode,
    pub description: String,
    pub categories: Vec<MappedCategory>,
}

/// Mapped diagnoses in input order.
///
/// Trumping is annotated, not applied: every category a diagnosis maps to
/// stays on its entry, marked with the parent that suppresses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosisMapping {
    entries: Vec<MappedDiagnosis>,
}

impl DiagnosisMapping {
    pub fn entries(&self) -> &[MappedDiagnosis] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, code: &DiagnosisCode) -> Option<&MappedDiagnosis> {
        self.entries.iter().find(|entry| &entry.code == code)
    }

    /// Every mapped category, numeric order.
    pub fn categories(&self) -> BTreeSet<CategoryCode> {
        self.entries
            .iter()
            .flat_map(|entry| entry.categories.iter().map(|category| category.code))
            .collect()
    }

    /// Categories that survive trumping, or all of them with `never_trump`.
    pub fn resolved_categories(&self, tables: &VersionTables, never_trump: bool) -> Vec<CategoryCode> {
        let all: Vec<CategoryCode> = self.categories().into_iter().collect();
        trump(&all, &tables.hierarchy, never_trump)
    }
}

/// Maps canonical diagnoses to their categories.
///
/// Age/sex edits run only when both are known and the age is nonzero; an
/// age of zero reads as unknown. Diagnoses missing from the
/// table are kept with no categories when `verbose` is set and skipped
/// otherwise.
pub fn map_diagnoses(
    diagnoses: &[DiagnosisCode],
    tables: &VersionTables,
    demographics: Option<(u32, Sex)>,
    verbose: bool,
) -> DiagnosisMapping {
    let mut entries = Vec::with_capacity(diagnoses.len());
    let mut outside_hierarchy = 0usize;

    for code in diagnoses {
        let Some(entry) = tables.diagnosis(code) else {
            if verbose {
                entries.push(MappedDiagnosis {
                    code: code.clone(),
                    description: String::new(),
                    categories: Vec::new(),
                });
            }
            continue;
        };

        let mut categories = entry.categories.clone();
        if let Some((age, sex)) = demographics.filter(|(age, _)| *age > 0) {
            match age_sex_edit(code, age, sex) {
                Some(EditOutcome::OutOfModel) => {
                    trace!(diagnosis = %code, "removed by age/sex edit");
                    continue;
                }
                Some(EditOutcome::Reassign(category)) => categories = vec![category],
                None => {}
            }
        }

        let before = categories.len();
        categories.retain(|category| tables.hierarchy.contains(*category));
        outside_hierarchy += before - categories.len();

        entries.push(MappedDiagnosis {
            code: code.clone(),
            description: entry.description.clone(),
            categories: categories
                .into_iter()
                .map(|category| MappedCategory {
                    code: category,
                    description: tables
                        .hierarchy
                        .description(category)
                        .unwrap_or_default()
                        .to_string(),
                    trumped_by: None,
                })
                .collect(),
        });
    }

    if outside_hierarchy > 0 {
        warn!(
            version = %tables.version,
            dropped = outside_hierarchy,
            "diagnoses mapped to categories outside the hierarchy"
        );
    }

    let mut mapping = DiagnosisMapping { entries };
    let present = mapping.categories();
    for entry in &mut mapping.entries {
        for category in &mut entry.categories {
            category.trumped_by = trumped_by(category.code, &present, &tables.hierarchy);
        }
    }

    debug!(
        version = %tables.version,
        diagnoses = mapping.len(),
        categories = present.len(),
        "mapped diagnoses"
    );
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcc_model::ModelVersion;

    fn tables() -> VersionTables {
        VersionTables::builder(ModelVersion::V23)
            .diagnosis("E1111", "Type 2 diabetes mellitus with ketoacidosis with coma", &["HCC17"])
            .diagnosis("E119", "Type 2 diabetes mellitus without complications", &["HCC19"])
            .diagnosis("C50911", "Malignant neoplasm of unsp site of right female breast", &["HCC12"])
            .diagnosis("F3481", "Disruptive mood dysregulation disorder", &["HCC59"])
            .diagnosis("Q894", "Conjoined twins", &["HCC72"])
            .category("HCC11", "Colorectal, Bladder, and Other Cancers", &["HCC12"])
            .category("HCC12", "Breast, Prostate, and Other Cancers and Tumors", &[])
            .category("HCC17", "Diabetes with Acute Complications", &["HCC19"])
            .category("HCC19", "Diabetes without Complication", &[])
            .category("HCC59", "Major Depressive, Bipolar, and Paranoid Disorders", &[])
            .build()
            .unwrap()
    }

    fn dx(codes: &[&str]) -> Vec<DiagnosisCode> {
        codes.iter().map(|c| DiagnosisCode::new(c).unwrap()).collect()
    }

    #[test]
    fn annotates_trumped_categories_in_place() {
        let tables = tables();
        let mapping = map_diagnoses(&dx(&["E119", "E1111"]), &tables, None, false);

        let e119 = mapping.get(&dx(&["E119"])[0]).unwrap();
        assert_eq!(e119.categories[0].code, CategoryCode::from_number(19));
        assert_eq!(e119.categories[0].trumped_by, Some(CategoryCode::from_number(17)));
        assert_eq!(
            mapping.resolved_categories(&tables, false),
            vec![CategoryCode::from_number(17)]
        );
        assert_eq!(mapping.resolved_categories(&tables, true).len(), 2);
    }

    #[test]
    fn verbose_keeps_unknown_diagnoses() {
        let tables = tables();
        let quiet = map_diagnoses(&dx(&["NOTADX", "E119"]), &tables, None, false);
        assert_eq!(quiet.len(), 1);

        let verbose = map_diagnoses(&dx(&["NOTADX", "E119"]), &tables, None, true);
        assert_eq!(verbose.len(), 2);
        assert!(verbose.entries()[0].categories.is_empty());
        assert_eq!(verbose.entries()[0].description, "");
    }

    #[test]
    fn edits_need_age_and_sex() {
        let tables = tables();
        let input = dx(&["C50911", "F3481"]);

        let edited = map_diagnoses(&input, &tables, Some((45, Sex::Female)), false);
        assert_eq!(edited.len(), 1);
        assert_eq!(
            edited.entries()[0].categories[0].code,
            CategoryCode::from_number(11)
        );

        let unedited = map_diagnoses(&input, &tables, None, false);
        assert_eq!(unedited.len(), 2);
        assert_eq!(
            unedited.entries()[0].categories[0].code,
            CategoryCode::from_number(12)
        );
    }

    #[test]
    fn age_zero_skips_edits() {
        let tables = tables();
        let mapping = map_diagnoses(
            &dx(&["C50911", "F3481"]),
            &tables,
            Some((0, Sex::Female)),
            false,
        );
        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.entries()[0].categories[0].code,
            CategoryCode::from_number(12)
        );
    }

    #[test]
    fn drops_categories_outside_the_hierarchy() {
        let tables = tables();
        let mapping = map_diagnoses(&dx(&["Q894"]), &tables, Some((30, Sex::Male)), false);
        assert_eq!(mapping.len(), 1);
        assert!(mapping.entries()[0].categories.is_empty());
    }
}
