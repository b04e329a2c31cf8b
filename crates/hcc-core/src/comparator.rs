//! Old versus new condition lists.
//!
//! Both sides are resolved first. The changes are then split into adds,
//! upgrades (an old category now covered by a broader new one), downgrades
//! (an old category replaced by a more specific new one, reported with the
//! categories it was downgraded to) and plain deletes.

use std::collections::BTreeSet;

use hcc_model::{
    CategoryCode, CategoryDiff, CategoryGap, CategoryIncrement, ConditionCode, DiagnosisCode,
    DiagnosisDiff, DiagnosisGap, DiagnosisIncrement,
};
use tracing::debug;

use crate::context::{CalcContext, categories_of};

/// The five-way split of a comparison, before pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub old_set: Vec<ConditionCode>,
    pub new_set: Vec<ConditionCode>,
    pub adds: Vec<ConditionCode>,
    pub upgraded: Vec<ConditionCode>,
    pub downgraded: Vec<ConditionCode>,
    pub downgraded_to: Vec<ConditionCode>,
    pub deletes: Vec<ConditionCode>,
}

/// Splits the change from `old` to `new`.
///
/// `old` is always trumped. With `never_trump`, upgrades are detected
/// against the trumped form of the new set, and an old category that an
/// untrumped new set both covers and refines counts as upgraded only.
pub fn partition(
    ctx: &CalcContext<'_>,
    old: &[CategoryCode],
    new: &[CategoryCode],
    never_trump: bool,
) -> Partition {
    let hierarchy = &ctx.tables.hierarchy;
    let old_set = ctx.prep(old, false);
    let new_set = ctx.prep(new, never_trump);
    let new_categories = categories_of(&new_set);

    let old_children = hierarchy.children_of_all(categories_of(&old_set));
    let new_children = hierarchy.children_of_all(new_categories.iter().copied());
    let new_parents = hierarchy.parents_of_all(new_categories.iter().copied());
    let comparison = if never_trump {
        ctx.prep(&new_categories, false)
    } else {
        new_set.clone()
    };

    let gained: Vec<ConditionCode> = new_set
        .iter()
        .filter(|code| !old_set.contains(code))
        .copied()
        .collect();
    let lost: Vec<ConditionCode> = old_set
        .iter()
        .filter(|code| !new_set.contains(code))
        .copied()
        .collect();

    let adds = select(&gained, |code| !within(code, &old_children));
    let downgraded_to = select(&gained, |code| within(code, &old_children));
    let upgraded = select(&old_set, |code| {
        !comparison.contains(code) && within(code, &new_children)
    });
    let downgraded = select(&lost, |code| {
        within(code, &new_parents) && !upgraded.contains(code)
    });
    let deletes = select(&lost, |code| {
        !upgraded.contains(code) && !downgraded.contains(code)
    });

    debug!(
        adds = adds.len(),
        upgraded = upgraded.len(),
        downgraded = downgraded.len(),
        deletes = deletes.len(),
        "partitioned condition change"
    );

    Partition {
        old_set,
        new_set,
        adds,
        upgraded,
        downgraded,
        downgraded_to,
        deletes,
    }
}

fn within(code: &ConditionCode, set: &BTreeSet<CategoryCode>) -> bool {
    code.as_category().is_some_and(|category| set.contains(&category))
}

fn select(codes: &[ConditionCode], keep: impl Fn(&ConditionCode) -> bool) -> Vec<ConditionCode> {
    codes.iter().filter(|&code| keep(code)).copied().collect()
}

pub fn diff_categories(
    ctx: &CalcContext<'_>,
    old: &[CategoryCode],
    new: &[CategoryCode],
) -> CategoryDiff {
    let split = partition(ctx, old, new, ctx.options.never_trump);
    let raf = ctx.category_score(&split.new_set) - ctx.category_score(&split.old_set);
    CategoryDiff {
        adds: split.adds,
        upgraded: split.upgraded,
        downgraded: split.downgraded,
        downgraded_to: split.downgraded_to,
        deletes: split.deletes,
        raf,
        premium: raf.premium(ctx.options.base_rate),
    }
}

/// Losses only: deletes and downgrades, priced net of the categories the
/// downgrades landed on. Trumping always applies.
pub fn gap_categories(
    ctx: &CalcContext<'_>,
    old: &[CategoryCode],
    new: &[CategoryCode],
) -> CategoryGap {
    let split = partition(ctx, old, new, false);
    let raf = -(ctx.category_score(&split.deletes) + ctx.category_score(&split.downgraded))
        + ctx.category_score(&split.downgraded_to);
    CategoryGap {
        deletes: split.deletes,
        downgraded: split.downgraded,
        raf,
        premium: raf.premium(ctx.options.base_rate),
    }
}

/// What `new` adds on top of `old`, ignoring anything it would remove.
pub fn increment_categories(
    ctx: &CalcContext<'_>,
    old: &[CategoryCode],
    new: &[CategoryCode],
) -> CategoryIncrement {
    let never_trump = ctx.options.never_trump;
    let mut combined = categories_of(&ctx.prep(new, never_trump));
    combined.extend(categories_of(&ctx.prep(old, false)));
    let final_conditions = ctx.prep(&combined, never_trump);

    let split = partition(ctx, old, &categories_of(&final_conditions), never_trump);
    let raf = ctx.category_score(&split.new_set) - ctx.category_score(&split.old_set);
    CategoryIncrement {
        adds: split.adds,
        upgraded: split.upgraded,
        final_conditions,
        raf,
        premium: raf.premium(ctx.options.base_rate),
    }
}

/// Diagnoses whose table categories include any of `conditions`.
fn supporting_diagnoses(
    ctx: &CalcContext<'_>,
    diagnoses: &[DiagnosisCode],
    conditions: &[ConditionCode],
) -> Vec<DiagnosisCode> {
    diagnoses
        .iter()
        .filter(|code| {
            ctx.tables.diagnosis(code).is_some_and(|entry| {
                entry
                    .categories
                    .iter()
                    .any(|category| conditions.contains(&ConditionCode::Category(*category)))
            })
        })
        .cloned()
        .collect()
}

fn resolved_categories(ctx: &CalcContext<'_>, diagnoses: &[DiagnosisCode]) -> Vec<CategoryCode> {
    categories_of(&ctx.diagnosis_conditions(diagnoses))
}

/// Diagnosis-level diff. Adds and downgrade targets are traced to `new`,
/// the other changes to `old`.
pub fn diff_diagnoses(
    ctx: &CalcContext<'_>,
    old: &[DiagnosisCode],
    new: &[DiagnosisCode],
) -> DiagnosisDiff {
    let diff = diff_categories(
        ctx,
        &resolved_categories(ctx, old),
        &resolved_categories(ctx, new),
    );
    DiagnosisDiff {
        adds: supporting_diagnoses(ctx, new, &diff.adds),
        upgraded: supporting_diagnoses(ctx, old, &diff.upgraded),
        downgraded: supporting_diagnoses(ctx, old, &diff.downgraded),
        downgraded_to: supporting_diagnoses(ctx, new, &diff.downgraded_to),
        deletes: supporting_diagnoses(ctx, old, &diff.deletes),
        raf: diff.raf,
        premium: diff.premium,
    }
}

pub fn gap_diagnoses(
    ctx: &CalcContext<'_>,
    old: &[DiagnosisCode],
    new: &[DiagnosisCode],
) -> DiagnosisGap {
    let gap = gap_categories(
        ctx,
        &resolved_categories(ctx, old),
        &resolved_categories(ctx, new),
    );
    DiagnosisGap {
        deletes: supporting_diagnoses(ctx, old, &gap.deletes),
        downgraded: supporting_diagnoses(ctx, old, &gap.downgraded),
        raf: gap.raf,
        premium: gap.premium,
    }
}

pub fn increment_diagnoses(
    ctx: &CalcContext<'_>,
    old: &[DiagnosisCode],
    new: &[DiagnosisCode],
) -> DiagnosisIncrement {
    let increment = increment_categories(
        ctx,
        &resolved_categories(ctx, old),
        &resolved_categories(ctx, new),
    );
    DiagnosisIncrement {
        adds: supporting_diagnoses(ctx, new, &increment.adds),
        upgraded: supporting_diagnoses(ctx, old, &increment.upgraded),
        final_conditions: increment.final_conditions,
        raf: increment.raf,
        premium: increment.premium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcc_model::{ModelVersion, PayerModel};
    use hcc_standards::VersionTables;

    fn tables() -> VersionTables {
        VersionTables::builder(ModelVersion::V23)
            .category("HCC17", "Diabetes with Acute Complications", &["HCC18", "HCC19"])
            .category("HCC18", "Diabetes with Chronic Complications", &["HCC19"])
            .category("HCC19", "Diabetes without Complication", &[])
            .category("HCC85", "Congestive Heart Failure", &[])
            .coefficient("CNA_HCC17", 0.311)
            .coefficient("CNA_HCC18", 0.311)
            .coefficient("CNA_HCC19", 0.108)
            .coefficient("CNA_HCC85", 0.341)
            .coefficient("CNA_HCC85_gDiabetesMellit", 0.121)
            .build()
            .unwrap()
    }

    fn codes(numbers: &[u16]) -> Vec<CategoryCode> {
        numbers.iter().copied().map(CategoryCode::from_number).collect()
    }

    fn render(conditions: &[ConditionCode]) -> Vec<String> {
        conditions.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn upgrade_and_delete() {
        let tables = tables();
        let ctx = CalcContext::new(&tables, PayerModel::CommunityNonDualAged);
        let diff = diff_categories(&ctx, &codes(&[19, 85]), &codes(&[17]));

        assert_eq!(render(&diff.adds), vec!["HCC17"]);
        assert_eq!(render(&diff.upgraded), vec!["HCC19"]);
        assert_eq!(render(&diff.deletes), vec!["HCC85", "HCC85_gDiabetesMellit"]);
        assert!(diff.downgraded.is_empty());
        assert_eq!(diff.raf.to_fixed(3), "-0.259");
    }

    #[test]
    fn downgrade_names_its_target() {
        let tables = tables();
        let ctx = CalcContext::new(&tables, PayerModel::CommunityNonDualAged);
        let diff = diff_categories(&ctx, &codes(&[17]), &codes(&[18]));

        assert!(diff.adds.is_empty());
        assert_eq!(render(&diff.downgraded), vec!["HCC17"]);
        assert_eq!(render(&diff.downgraded_to), vec!["HCC18"]);
        assert!(diff.deletes.is_empty());
    }

    #[test]
    fn gap_nets_out_downgrade_targets() {
        let tables = tables();
        let ctx = CalcContext::new(&tables, PayerModel::CommunityNonDualAged);
        let gap = gap_categories(&ctx, &codes(&[17, 85]), &codes(&[18]));

        assert_eq!(render(&gap.downgraded), vec!["HCC17"]);
        assert_eq!(render(&gap.deletes), vec!["HCC85", "HCC85_gDiabetesMellit"]);
        // -(0.341 + 0.311) + 0.311
        assert_eq!(gap.raf.to_fixed(3), "-0.341");
    }

    #[test]
    fn increment_keeps_old_conditions() {
        let tables = tables();
        let ctx = CalcContext::new(&tables, PayerModel::CommunityNonDualAged);
        let increment = increment_categories(&ctx, &codes(&[19, 85]), &codes(&[18]));

        assert_eq!(render(&increment.adds), vec!["HCC18"]);
        assert_eq!(render(&increment.upgraded), vec!["HCC19"]);
        assert_eq!(
            render(&increment.final_conditions),
            vec!["HCC18", "HCC85", "HCC85_gDiabetesMellit"]
        );
        assert_eq!(increment.raf.to_fixed(3), "0.203");
    }

    #[test]
    fn never_trump_still_reports_upgrades() {
        let tables = tables();
        let ctx = CalcContext::new(&tables, PayerModel::CommunityNonDualAged);
        let split = partition(&ctx, &codes(&[19]), &codes(&[17, 19]), true);

        assert_eq!(render(&split.new_set), vec!["HCC17", "HCC19"]);
        assert_eq!(render(&split.upgraded), vec!["HCC19"]);
        assert_eq!(render(&split.adds), vec!["HCC17"]);
        assert!(split.deletes.is_empty());
    }

    #[test]
    fn never_trump_upgrade_wins_over_downgrade() {
        let tables = tables();
        let ctx = CalcContext::new(&tables, PayerModel::CommunityNonDualAged);
        let split = partition(&ctx, &codes(&[18]), &codes(&[17, 19]), true);

        assert_eq!(render(&split.upgraded), vec!["HCC18"]);
        assert!(split.downgraded.is_empty());
        assert!(split.deletes.is_empty());
        assert_eq!(render(&split.adds), vec!["HCC17"]);
    }
}
