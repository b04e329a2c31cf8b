use hcc_model::{
    CategoryCode, ConditionCode, DEFAULT_BASE_RATE, DiagnosisCode, ModelVersion, PayerModel,
    Score, Sex,
};
use hcc_standards::VersionTables;

use crate::interactions::InteractionRuleSet;
use crate::mapper::{DiagnosisMapping, map_diagnoses};
use crate::scorer::condition_score;
use crate::trump::trump;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalcOptions {
    pub never_trump: bool,
    pub verbose: bool,
    pub base_rate: f64,
}

impl Default for CalcOptions {
    fn default() -> Self {
        Self {
            never_trump: false,
            verbose: true,
            base_rate: DEFAULT_BASE_RATE,
        }
    }
}

/// Everything one calculation reads: the version's tables, the payer
/// model and the beneficiary facts the rules look at.
#[derive(Debug, Clone, Copy)]
pub struct CalcContext<'a> {
    pub tables: &'a VersionTables,
    pub model: PayerModel,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub disabled: bool,
    pub options: CalcOptions,
}

impl<'a> CalcContext<'a> {
    pub fn new(tables: &'a VersionTables, model: PayerModel) -> Self {
        Self {
            tables,
            model,
            age: None,
            sex: None,
            disabled: false,
            options: CalcOptions::default(),
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_options(mut self, options: CalcOptions) -> Self {
        self.options = options;
        self
    }

    pub fn version(&self) -> ModelVersion {
        self.tables.version
    }

    pub fn rules(&self) -> InteractionRuleSet {
        InteractionRuleSet::for_version(self.tables.version)
    }

    /// Age and sex together, the precondition for age/sex edits.
    pub fn demographics(&self) -> Option<(u32, Sex)> {
        self.age.zip(self.sex)
    }

    /// Trumps `categories` and appends the interaction terms that fire.
    pub fn prep(&self, categories: &[CategoryCode], never_trump: bool) -> Vec<ConditionCode> {
        let kept = trump(categories, &self.tables.hierarchy, never_trump);
        self.rules().apply(&kept, self.model, self.disabled, self.age)
    }

    pub fn map_diagnoses(&self, diagnoses: &[DiagnosisCode]) -> DiagnosisMapping {
        map_diagnoses(
            diagnoses,
            self.tables,
            self.demographics(),
            self.options.verbose,
        )
    }

    /// Resolved conditions of a normalized diagnosis list.
    pub fn diagnosis_conditions(&self, diagnoses: &[DiagnosisCode]) -> Vec<ConditionCode> {
        let categories = self
            .map_diagnoses(diagnoses)
            .resolved_categories(self.tables, self.options.never_trump);
        self.prep(&categories, self.options.never_trump)
    }

    /// Category-only score of a normalized diagnosis list. The mapped set
    /// is scored as resolved, so `never_trump` keeps trumped children in
    /// the score.
    pub fn diagnosis_score(&self, diagnoses: &[DiagnosisCode]) -> Score {
        condition_score(
            &self.diagnosis_conditions(diagnoses),
            &self.tables.coefficients,
            self.model,
        )
    }

    /// Category-only score of a condition list.
    ///
    /// Interaction terms in the input are ignored and re-derived, and
    /// trumping always applies, so the score of any list equals the score
    /// of its resolved form.
    pub fn category_score(&self, conditions: &[ConditionCode]) -> Score {
        let resolved = self.prep(&categories_of(conditions), false);
        condition_score(&resolved, &self.tables.coefficients, self.model)
    }
}

/// The category members of a condition list, interaction terms dropped.
pub fn categories_of(conditions: &[ConditionCode]) -> Vec<CategoryCode> {
    conditions
        .iter()
        .filter_map(ConditionCode::as_category)
        .collect()
}
