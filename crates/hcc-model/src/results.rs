//! Result records returned by the scoring engine.
//!
//! All records are immutable values. Numeric fields serialize as fixed
//! precision strings through [`Score`] and [`Money`].

use serde::Serialize;

use crate::decimal::{Money, Score};
use crate::enums::{EntitlementReason, ModelVersion, PayerModel, Sex};
use crate::ids::{CategoryCode, ConditionCode, DiagnosisCode};

/// One priced demographic cell, e.g. `CNA_F90_94`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicCoefficient {
    pub code: String,
    pub coefficient: Score,
}

/// One priced category or interaction term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionCoefficient {
    pub code: ConditionCode,
    pub coefficient: Score,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RafResult {
    pub total: Score,
    pub premium: Money,
    pub demographic_score: Score,
    pub condition_score: Score,
    pub demographic_detail: Vec<DemographicCoefficient>,
    /// Priced conditions in resolved order. Unpriced ones appear with zero
    /// only in verbose mode.
    pub condition_detail: Vec<ConditionCoefficient>,
}

impl RafResult {
    pub fn coefficient_of(&self, code: ConditionCode) -> Option<Score> {
        self.condition_detail
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.coefficient)
    }
}

/// Set comparison of an old and a new condition list.
///
/// `C` is [`ConditionCode`] for category-level comparisons and
/// [`DiagnosisCode`] when changes are traced back to diagnoses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult<C> {
    pub adds: Vec<C>,
    pub upgraded: Vec<C>,
    pub downgraded: Vec<C>,
    pub downgraded_to: Vec<C>,
    pub deletes: Vec<C>,
    pub raf: Score,
    pub premium: Money,
}

/// Conditions lost between old and new, with the net cost of the loss.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapResult<C> {
    pub deletes: Vec<C>,
    pub downgraded: Vec<C>,
    pub raf: Score,
    pub premium: Money,
}

/// What adding new codes on top of old ones contributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncrementResult<C> {
    pub adds: Vec<C>,
    pub upgraded: Vec<C>,
    /// Resolved conditions of the combined old and new lists.
    pub final_conditions: Vec<ConditionCode>,
    pub raf: Score,
    pub premium: Money,
}

pub type CategoryDiff = DiffResult<ConditionCode>;
pub type DiagnosisDiff = DiffResult<DiagnosisCode>;
pub type CategoryGap = GapResult<ConditionCode>;
pub type DiagnosisGap = GapResult<DiagnosisCode>;
pub type CategoryIncrement = IncrementResult<ConditionCode>;
pub type DiagnosisIncrement = IncrementResult<DiagnosisCode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelSelection {
    pub version: ModelVersion,
    pub model: PayerModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemographicInputs {
    pub age: u32,
    pub sex: Sex,
    pub orec: EntitlementReason,
    pub medicaid: bool,
    pub disabled: bool,
    pub originally_disabled: bool,
}

/// Whether the member's condition list was read as diagnoses or categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Diagnosis,
    Category,
}

/// A category (or interaction term) row under a condition line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLine {
    pub code: ConditionCode,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trumped_by: Option<CategoryCode>,
    /// Absent for trumped rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<Score>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<Money>,
}

/// One input condition with the categories it resolved to.
///
/// `diagnosis` is absent for category input and for the interaction row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<DiagnosisCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub categories: Vec<CategoryLine>,
}

/// Full scoring output for one member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberScore {
    pub model: ModelSelection,
    pub demographics: DemographicInputs,
    pub input_kind: InputKind,
    pub raf: RafResult,
    pub conditions: Vec<ConditionLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub code: CategoryCode,
    pub description: String,
    pub children: Vec<CategoryCode>,
    pub parents: Vec<CategoryCode>,
    /// Category-only RAF of the code on its own.
    pub raf: Score,
}

/// A code with its table description, as `CODE:description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeDescription {
    pub code: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trumped_by: Option<CategoryCode>,
}

impl std::fmt::Display for CodeDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.code, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_serializes_codes_as_strings() {
        let diff = CategoryDiff {
            adds: vec![CategoryCode::from_number(17).into()],
            upgraded: vec![],
            downgraded: vec![],
            downgraded_to: vec![],
            deletes: vec![crate::ids::InteractionTerm::new("HCC85_gDiabetesMellit").into()],
            raf: Score(0.254),
            premium: Score(0.254).premium(868.0),
        };
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json["adds"][0], "HCC17");
        assert_eq!(json["deletes"][0], "HCC85_gDiabetesMellit");
        assert_eq!(json["raf"], "0.2540");
        assert_eq!(json["premium"], "220.47");
    }

    #[test]
    fn code_description_display() {
        let entry = CodeDescription {
            code: "E119".to_string(),
            description: "Type 2 diabetes mellitus without complications".to_string(),
            trumped_by: None,
        };
        assert_eq!(
            entry.to_string(),
            "E119:Type 2 diabetes mellitus without complications"
        );
    }
}
