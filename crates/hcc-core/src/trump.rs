//! Hierarchy trumping.

use std::collections::BTreeSet;

use hcc_model::CategoryCode;
use hcc_standards::CategoryHierarchy;
use tracing::trace;

/// Drops every category listed as a child of another present category.
///
/// The result is deduplicated and in numeric order. With `never_trump` the
/// input is only sorted.
pub fn trump(
    categories: &[CategoryCode],
    hierarchy: &CategoryHierarchy,
    never_trump: bool,
) -> Vec<CategoryCode> {
    let present: BTreeSet<CategoryCode> = categories.iter().copied().collect();
    if never_trump {
        return present.into_iter().collect();
    }
    let trumped = hierarchy.children_of_all(present.iter().copied());
    present
        .into_iter()
        .filter(|code| {
            let keep = !trumped.contains(code);
            if !keep {
                trace!(category = %code, "trumped");
            }
            keep
        })
        .collect()
}

/// The lowest-numbered present category that lists `code` as a child.
pub fn trumped_by(
    code: CategoryCode,
    present: &BTreeSet<CategoryCode>,
    hierarchy: &CategoryHierarchy,
) -> Option<CategoryCode> {
    present
        .iter()
        .copied()
        .find(|parent| *parent != code && hierarchy.children(*parent).contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcc_model::ModelVersion;
    use hcc_standards::VersionTables;

    fn codes(numbers: &[u16]) -> Vec<CategoryCode> {
        numbers.iter().copied().map(CategoryCode::from_number).collect()
    }

    fn hierarchy() -> CategoryHierarchy {
        VersionTables::builder(ModelVersion::V23)
            .category("HCC8", "Metastatic Cancer and Acute Leukemia", &["HCC9", "HCC10"])
            .category("HCC9", "Lung and Other Severe Cancers", &["HCC10"])
            .category("HCC10", "Lymphoma and Other Cancers", &[])
            .category("HCC17", "Diabetes with Acute Complications", &["HCC18", "HCC19"])
            .category("HCC18", "Diabetes with Chronic Complications", &["HCC19"])
            .category("HCC19", "Diabetes without Complication", &[])
            .category("HCC85", "Congestive Heart Failure", &[])
            .build()
            .unwrap()
            .hierarchy
    }

    #[test]
    fn removes_children_of_present_categories() {
        let hierarchy = hierarchy();
        assert_eq!(
            trump(&codes(&[19, 85, 17, 18, 19]), &hierarchy, false),
            codes(&[17, 85])
        );
        assert_eq!(trump(&codes(&[10, 9]), &hierarchy, false), codes(&[9]));
    }

    #[test]
    fn never_trump_only_sorts() {
        let hierarchy = hierarchy();
        assert_eq!(
            trump(&codes(&[19, 17, 19]), &hierarchy, true),
            codes(&[17, 19])
        );
    }

    #[test]
    fn annotation_picks_lowest_present_parent() {
        let hierarchy = hierarchy();
        let present: BTreeSet<CategoryCode> = codes(&[8, 9, 10]).into_iter().collect();
        assert_eq!(
            trumped_by(CategoryCode::from_number(10), &present, &hierarchy),
            Some(CategoryCode::from_number(8))
        );
        assert_eq!(
            trumped_by(CategoryCode::from_number(8), &present, &hierarchy),
            None
        );
    }
}
