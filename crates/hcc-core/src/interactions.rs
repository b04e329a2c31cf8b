//! Interaction terms.
//!
//! Each model version has a fixed rule table. A rule names one or more
//! category groups and fires when every group has at least one member in
//! the resolved category set. Which rules are consulted depends on the payer
//! model family and on disability.

use hcc_model::{AGED_THRESHOLD, CategoryCode, ConditionCode, InteractionTerm, ModelVersion, PayerModel};
use tracing::{debug, trace};

type Group = &'static [u16];

const CANCER: Group = &[8, 9, 10, 11, 12];
const DIABETES: Group = &[17, 18, 19];
const CARD_RESP_FAIL: Group = &[82, 83, 84];
const CHF: Group = &[85];
const COPD_CF: Group = &[110, 111, 112];
const SEPSIS: Group = &[2];
const PRESSURE_ULCER: Group = &[157, 158];
const RENAL_V22: Group = &[134, 135, 136, 137];
const RENAL_V23: Group = &[134, 135, 136, 137, 138];
const SUBSTANCE_V22: Group = &[54, 55];
const SUBSTANCE_V23: Group = &[54, 55, 56];
const PSYCHIATRIC_V22: Group = &[57, 58];
const PSYCHIATRIC_V23: Group = &[57, 58, 59, 60];

const IMMUNE_DISORDERS: Group = &[47];
const SPECIFIED_HEART_ARRHYTHMIAS: Group = &[96];
const SCHIZOPHRENIA: Group = &[57];
const SEIZURES: Group = &[79];
const ASP_SPEC_BACT_PNEUM: Group = &[114];
const ARTIF_OPENINGS: Group = &[188];

/// A labelled conjunction of category groups.
#[derive(Debug, Clone, Copy)]
pub struct InteractionRule {
    pub label: &'static str,
    pub groups: &'static [Group],
}

impl InteractionRule {
    const fn new(label: &'static str, groups: &'static [Group]) -> Self {
        Self { label, groups }
    }

    pub fn term(&self) -> InteractionTerm {
        InteractionTerm::new(self.label)
    }

    pub fn fires(&self, present: &[CategoryCode]) -> bool {
        self.groups.iter().all(|group| {
            present
                .iter()
                .any(|code| group.contains(&code.number()))
        })
    }
}

const COMMUNITY_V22: &[InteractionRule] = &[
    InteractionRule::new("HCC47_gCancer", &[IMMUNE_DISORDERS, CANCER]),
    InteractionRule::new("HCC85_gDiabetesMellit", &[CHF, DIABETES]),
    InteractionRule::new("HCC85_gCopdCF", &[CHF, COPD_CF]),
    InteractionRule::new("HCC85_gRenal_V23", &[CHF, RENAL_V22]),
    InteractionRule::new("gRespDepandArre_gCopdCF", &[CARD_RESP_FAIL, COPD_CF]),
    InteractionRule::new("HCC85_HCC96", &[CHF, SPECIFIED_HEART_ARRHYTHMIAS]),
    InteractionRule::new("gSubstanceAbuse_gPsychiatric", &[SUBSTANCE_V22, PSYCHIATRIC_V22]),
];

const COMMUNITY_V23: &[InteractionRule] = &[
    InteractionRule::new("HCC47_gCancer", &[IMMUNE_DISORDERS, CANCER]),
    InteractionRule::new("HCC85_gDiabetesMellit", &[CHF, DIABETES]),
    InteractionRule::new("HCC85_gCopdCF", &[CHF, COPD_CF]),
    InteractionRule::new("HCC85_gRenal_V23", &[CHF, RENAL_V23]),
    InteractionRule::new("gRespDepandArre_gCopdCF", &[CARD_RESP_FAIL, COPD_CF]),
    InteractionRule::new("HCC85_HCC96", &[CHF, SPECIFIED_HEART_ARRHYTHMIAS]),
    InteractionRule::new("gSubstanceAbuse_gPsychiatric_V23", &[SUBSTANCE_V23, PSYCHIATRIC_V23]),
];

const COMMUNITY_V24: &[InteractionRule] = &[
    InteractionRule::new("HCC47_gCancer", &[IMMUNE_DISORDERS, CANCER]),
    InteractionRule::new("HCC85_gDiabetesMellit", &[CHF, DIABETES]),
    InteractionRule::new("HCC85_gCopdCF", &[CHF, COPD_CF]),
    InteractionRule::new("HCC85_gRenal_V24", &[CHF, RENAL_V23]),
    InteractionRule::new("gRespDepandArre_gCopdCF", &[CARD_RESP_FAIL, COPD_CF]),
    InteractionRule::new("HCC85_HCC96", &[CHF, SPECIFIED_HEART_ARRHYTHMIAS]),
    InteractionRule::new("gSubstanceAbuse_gPsychiatric_V24", &[SUBSTANCE_V23, PSYCHIATRIC_V23]),
];

const INSTITUTIONAL_V23: &[InteractionRule] = &[
    InteractionRule::new("PRESSURE_ULCER", &[PRESSURE_ULCER]),
    InteractionRule::new("CHF_gCopdCF", &[CHF, COPD_CF]),
    InteractionRule::new("gCopdCF_CARD_RESP_FAIL", &[COPD_CF, CARD_RESP_FAIL]),
    InteractionRule::new("SEPSIS_PRESSURE_ULCER", &[SEPSIS, PRESSURE_ULCER]),
    InteractionRule::new("SEPSIS_ARTIF_OPENINGS", &[SEPSIS, ARTIF_OPENINGS]),
    InteractionRule::new("ART_OPENINGS_PRESSURE_ULCER", &[ARTIF_OPENINGS, PRESSURE_ULCER]),
    InteractionRule::new("DIABETES_CHF", &[DIABETES, CHF]),
    InteractionRule::new("gCopdCF_ASP_SPEC_B_PNEUM", &[COPD_CF, ASP_SPEC_BACT_PNEUM]),
    InteractionRule::new("ASP_SPEC_BACT_PNEUM_PRES_ULC", &[ASP_SPEC_BACT_PNEUM, PRESSURE_ULCER]),
    InteractionRule::new("SEPSIS_ASP_SPEC_BACT_PNEUM", &[SEPSIS, ASP_SPEC_BACT_PNEUM]),
    InteractionRule::new("SCHIZOPHRENIA_gCopdCF", &[SCHIZOPHRENIA, COPD_CF]),
    InteractionRule::new("SCHIZOPHRENIA_CHF", &[SCHIZOPHRENIA, CHF]),
    InteractionRule::new("SCHIZOPHRENIA_SEIZURES", &[SCHIZOPHRENIA, SEIZURES]),
];

const INSTITUTIONAL_V24: &[InteractionRule] = &[
    InteractionRule::new("PRESSURE_ULCER", &[PRESSURE_ULCER]),
    InteractionRule::new("SEPSIS_PRESSURE_ULCER", &[SEPSIS, PRESSURE_ULCER]),
    InteractionRule::new("SEPSIS_ARTIF_OPENINGS", &[SEPSIS, ARTIF_OPENINGS]),
    InteractionRule::new("ART_OPENINGS_PRESSURE_ULCER", &[ARTIF_OPENINGS, PRESSURE_ULCER]),
    InteractionRule::new("gCopdCF_ASP_SPEC_B_PNEUM", &[COPD_CF, ASP_SPEC_BACT_PNEUM]),
    InteractionRule::new("ASP_SPEC_BACT_PNEUM_PRES_ULC", &[ASP_SPEC_BACT_PNEUM, PRESSURE_ULCER]),
    InteractionRule::new("SEPSIS_ASP_SPEC_BACT_PNEUM", &[SEPSIS, ASP_SPEC_BACT_PNEUM]),
    InteractionRule::new("SCHIZOPHRENIA_gCopdCF", &[SCHIZOPHRENIA, COPD_CF]),
    InteractionRule::new("SCHIZOPHRENIA_CHF", &[SCHIZOPHRENIA, CHF]),
    InteractionRule::new("SCHIZOPHRENIA_SEIZURES", &[SCHIZOPHRENIA, SEIZURES]),
];

const DISABLED_HCC85: InteractionRule = InteractionRule::new("DISABLED_HCC85", &[CHF]);
const DISABLED_PRESSURE_ULCER: InteractionRule =
    InteractionRule::new("DISABLED_PRESSURE_ULCER", &[PRESSURE_ULCER]);
const DISABLED_TAIL: &[InteractionRule] = &[
    InteractionRule::new("DISABLED_HCC161", &[&[161]]),
    InteractionRule::new("DISABLED_HCC39", &[&[39]]),
    InteractionRule::new("DISABLED_HCC77", &[&[77]]),
    InteractionRule::new("DISABLED_HCC6", &[&[6]]),
];

const SUBSTANCE_PSYCH_DISABLED_V22: InteractionRule = InteractionRule::new(
    "disable_substAbuse_psych_V23",
    &[SUBSTANCE_V22, PSYCHIATRIC_V22],
);
const SUBSTANCE_PSYCH_DISABLED_V23: InteractionRule = InteractionRule::new(
    "disable_substAbuse_psych_V23",
    &[SUBSTANCE_V23, PSYCHIATRIC_V23],
);
const SUBSTANCE_PSYCH_DISABLED_V24: InteractionRule = InteractionRule::new(
    "disable_substAbuse_psych_V24",
    &[SUBSTANCE_V23, PSYCHIATRIC_V23],
);

const COUNT_LABELS: [&str; 7] = ["D4", "D5", "D6", "D7", "D8", "D9", "D10P"];

/// Interaction rule set of one model version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionRuleSet {
    V22,
    V23,
    V24,
}

impl InteractionRuleSet {
    pub fn for_version(version: ModelVersion) -> Self {
        match version {
            ModelVersion::V22 => InteractionRuleSet::V22,
            ModelVersion::V23 => InteractionRuleSet::V23,
            ModelVersion::V24 => InteractionRuleSet::V24,
        }
    }

    pub fn community_rules(self) -> &'static [InteractionRule] {
        match self {
            InteractionRuleSet::V22 => COMMUNITY_V22,
            InteractionRuleSet::V23 => COMMUNITY_V23,
            InteractionRuleSet::V24 => COMMUNITY_V24,
        }
    }

    pub fn institutional_rules(self) -> &'static [InteractionRule] {
        match self {
            InteractionRuleSet::V22 | InteractionRuleSet::V23 => INSTITUTIONAL_V23,
            InteractionRuleSet::V24 => INSTITUTIONAL_V24,
        }
    }

    fn substance_psych_disabled(self) -> InteractionRule {
        match self {
            InteractionRuleSet::V22 => SUBSTANCE_PSYCH_DISABLED_V22,
            InteractionRuleSet::V23 => SUBSTANCE_PSYCH_DISABLED_V23,
            InteractionRuleSet::V24 => SUBSTANCE_PSYCH_DISABLED_V24,
        }
    }

    /// Only V24 prices the number of distinct payment categories.
    pub fn counts_conditions(self) -> bool {
        matches!(self, InteractionRuleSet::V24)
    }

    /// Appends the interaction terms that fire for `categories`.
    ///
    /// Output is the categories as given followed by fired terms in table
    /// order. `age` only matters for the disabled substance/psychiatric term,
    /// which needs a known age under 65.
    pub fn apply(
        self,
        categories: &[CategoryCode],
        model: PayerModel,
        disabled: bool,
        age: Option<u32>,
    ) -> Vec<ConditionCode> {
        let mut fired: Vec<InteractionTerm> = Vec::new();

        if self.counts_conditions() {
            if let Some(label) = count_label(categories.len()) {
                fired.push(InteractionTerm::new(label));
            }
        }

        let family: &[InteractionRule] = if model.is_community() {
            self.community_rules()
        } else if model.is_institutional() {
            self.institutional_rules()
        } else {
            &[]
        };
        fired.extend(
            family
                .iter()
                .filter(|rule| rule.fires(categories))
                .map(InteractionRule::term),
        );

        if disabled {
            let mut disabled_rules = vec![DISABLED_HCC85];
            if model.is_institutional() {
                disabled_rules.push(DISABLED_PRESSURE_ULCER);
            }
            disabled_rules.extend_from_slice(DISABLED_TAIL);
            if age.is_some_and(|age| age < AGED_THRESHOLD) {
                disabled_rules.push(self.substance_psych_disabled());
            }
            fired.extend(
                disabled_rules
                    .iter()
                    .filter(|rule| rule.fires(categories))
                    .map(InteractionRule::term),
            );
        }

        for term in &fired {
            trace!(term = term.as_str(), "interaction fired");
        }
        debug!(
            rules = ?self,
            model = model.as_str(),
            fired = fired.len(),
            "applied interactions"
        );

        let mut out: Vec<ConditionCode> = categories.iter().copied().map(ConditionCode::from).collect();
        out.extend(fired.into_iter().map(ConditionCode::from));
        out
    }
}

fn count_label(count: usize) -> Option<&'static str> {
    match count {
        0..=3 => None,
        4..=9 => COUNT_LABELS.get(count - 4).copied(),
        _ => COUNT_LABELS.last().copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(numbers: &[u16]) -> Vec<CategoryCode> {
        numbers.iter().copied().map(CategoryCode::from_number).collect()
    }

    fn render(conditions: &[ConditionCode]) -> Vec<String> {
        conditions.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn institutional_schizophrenia_with_copd() {
        let out = InteractionRuleSet::V23.apply(
            &codes(&[57, 110]),
            PayerModel::Institutional,
            false,
            Some(65),
        );
        assert_eq!(render(&out), vec!["HCC57", "HCC110", "SCHIZOPHRENIA_gCopdCF"]);
    }

    #[test]
    fn community_terms_follow_table_order() {
        let out = InteractionRuleSet::V23.apply(
            &codes(&[18, 85, 111, 136]),
            PayerModel::CommunityNonDualAged,
            false,
            None,
        );
        assert_eq!(
            render(&out),
            vec![
                "HCC18",
                "HCC85",
                "HCC111",
                "HCC136",
                "HCC85_gDiabetesMellit",
                "HCC85_gCopdCF",
                "HCC85_gRenal_V23",
            ]
        );
    }

    #[test]
    fn substance_psych_label_is_versioned() {
        let input = codes(&[56, 57]);
        let v22 = InteractionRuleSet::V22.apply(&input, PayerModel::CommunityNonDualAged, false, None);
        let v24 = InteractionRuleSet::V24.apply(&input, PayerModel::CommunityNonDualAged, false, None);
        // HCC56 is not a v22 substance category.
        assert_eq!(render(&v22), vec!["HCC56", "HCC57"]);
        assert_eq!(
            render(&v24),
            vec!["HCC56", "HCC57", "gSubstanceAbuse_gPsychiatric_V24"]
        );
    }

    #[test]
    fn institutional_v24_drops_chf_pairs() {
        let input = codes(&[18, 85, 110]);
        let v23 = InteractionRuleSet::V23.apply(&input, PayerModel::Institutional, false, None);
        let v24 = InteractionRuleSet::V24.apply(&input, PayerModel::Institutional, false, None);
        assert_eq!(
            render(&v23)[3..],
            ["CHF_gCopdCF".to_string(), "DIABETES_CHF".to_string()]
        );
        assert_eq!(v24.len(), 3);
    }

    #[test]
    fn v24_counts_categories_first() {
        let four = InteractionRuleSet::V24.apply(
            &codes(&[2, 158, 85, 6]),
            PayerModel::Institutional,
            false,
            None,
        );
        assert_eq!(
            render(&four)[4..],
            [
                "D4".to_string(),
                "PRESSURE_ULCER".to_string(),
                "SEPSIS_PRESSURE_ULCER".to_string()
            ]
        );

        let many: Vec<CategoryCode> = codes(&[1, 2, 6, 8, 17, 21, 22, 23, 27, 39, 40, 46]);
        let out = InteractionRuleSet::V24.apply(&many, PayerModel::NewEnrollee, false, None);
        assert_eq!(render(&out).last().map(String::as_str), Some("D10P"));
    }

    #[test]
    fn disabled_terms_need_disability() {
        let input = codes(&[6, 85, 157]);
        let aged = InteractionRuleSet::V23.apply(&input, PayerModel::Institutional, false, None);
        assert_eq!(render(&aged)[3..], ["PRESSURE_ULCER".to_string()]);

        let disabled = InteractionRuleSet::V23.apply(&input, PayerModel::Institutional, true, None);
        assert_eq!(
            render(&disabled)[3..],
            [
                "PRESSURE_ULCER".to_string(),
                "DISABLED_HCC85".to_string(),
                "DISABLED_PRESSURE_ULCER".to_string(),
                "DISABLED_HCC6".to_string(),
            ]
        );

        let community = InteractionRuleSet::V23.apply(
            &input,
            PayerModel::CommunityNonDualDisabled,
            true,
            None,
        );
        assert_eq!(
            render(&community)[3..],
            ["DISABLED_HCC85".to_string(), "DISABLED_HCC6".to_string()]
        );
    }

    #[test]
    fn disabled_substance_psych_needs_known_young_age() {
        let input = codes(&[55, 58]);
        let label = "disable_substAbuse_psych_V23".to_string();
        let young = InteractionRuleSet::V22.apply(&input, PayerModel::Institutional, true, Some(40));
        assert!(render(&young).contains(&label));
        let unknown = InteractionRuleSet::V22.apply(&input, PayerModel::Institutional, true, None);
        assert!(!render(&unknown).contains(&label));
        let old = InteractionRuleSet::V22.apply(&input, PayerModel::Institutional, true, Some(70));
        assert!(!render(&old).contains(&label));
    }

    #[test]
    fn new_enrollee_models_have_no_pair_rules() {
        let out = InteractionRuleSet::V23.apply(&codes(&[85, 18]), PayerModel::NewEnrollee, false, None);
        assert_eq!(out.len(), 2);
    }
}
