//! The scoring engine facade.
//!
//! [`RafEngine`] owns an immutable [`LookupTables`] snapshot and an
//! [`EngineConfig`]. Every operation takes [`CalcParams`] overrides,
//! resolves them into a [`CalcContext`] and runs inside a `debug` span that
//! records the version and payer model.

use std::collections::BTreeSet;

use hcc_model::{
    Beneficiary, CategoryCode, CategoryDiff, CategoryGap, CategoryIncrement, CategoryInfo,
    CategoryLine, CodeDescription, ConditionCode, ConditionLine, DemographicInputs,
    DiagnosisCode, DiagnosisDiff, DiagnosisGap, DiagnosisIncrement, EngineConfig, MemberScore,
    ModelSelection, ModelVersion, PayerModel, RafResult, Score, Sex,
};
use hcc_standards::{LookupTables, VersionTables};
use tracing::debug_span;

use crate::comparator;
use crate::context::{CalcContext, CalcOptions};
use crate::demographics::classify;
use crate::error::Result;
use crate::normalize::{canonical_diagnoses, normalize_categories, normalize_diagnoses};
use crate::resolver::{ResolvedConditions, resolve};
use crate::scorer::score;
use crate::trump::trumped_by;

const INTERACTION_DESCRIPTION: &str = "Interaction Codes";

/// Per-call overrides of the engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CalcParams {
    pub version: Option<ModelVersion>,
    pub model: Option<PayerModel>,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub disabled: Option<bool>,
    pub never_trump: Option<bool>,
    pub base_rate: Option<f64>,
    pub verbose: Option<bool>,
}

impl CalcParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: ModelVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_model(mut self, model: PayerModel) -> Self {
        self.model = Some(model);
        self
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
        self.disabled = Some(disabled);
        self
    }

    pub fn with_never_trump(mut self, never_trump: bool) -> Self {
        self.never_trump = Some(never_trump);
        self
    }

    pub fn with_base_rate(mut self, base_rate: f64) -> Self {
        self.base_rate = Some(base_rate);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RafEngine {
    tables: LookupTables,
    config: EngineConfig,
}

impl RafEngine {
    pub fn new(tables: LookupTables, config: EngineConfig) -> Self {
        Self { tables, config }
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn version_tables(&self, version: Option<ModelVersion>) -> Result<&VersionTables> {
        Ok(self.tables.require(version.unwrap_or(self.config.version))?)
    }

    /// Resolves `params` against the configuration.
    pub fn context(&self, params: &CalcParams) -> Result<CalcContext<'_>> {
        let tables = self.version_tables(params.version)?;
        let mut ctx = CalcContext::new(tables, params.model.unwrap_or(self.config.model))
            .with_disabled(params.disabled.unwrap_or(false))
            .with_options(CalcOptions {
                never_trump: params.never_trump.unwrap_or(self.config.never_trump),
                verbose: params.verbose.unwrap_or(self.config.verbose),
                base_rate: params.base_rate.unwrap_or(self.config.base_rate),
            });
        if let Some(age) = params.age {
            ctx = ctx.with_age(age);
        }
        if let Some(sex) = params.sex {
            ctx = ctx.with_sex(sex);
        }
        Ok(ctx)
    }

    /// Full member score: demographics plus resolved conditions, with one
    /// line per input condition.
    ///
    /// Model, age and sex come from `beneficiary`; disability follows the
    /// payer model segment. Only version, base rate and verbosity are read
    /// from `params`.
    pub fn score_member<S: AsRef<str>>(
        &self,
        conditions: &[S],
        beneficiary: &Beneficiary,
        params: &CalcParams,
    ) -> Result<MemberScore> {
        let model = beneficiary.model;
        let ctx = self.context(&CalcParams {
            model: Some(model),
            age: Some(beneficiary.age),
            sex: Some(beneficiary.sex),
            disabled: Some(model.is_disabled_segment()),
            never_trump: Some(false),
            ..*params
        })?;
        let _span = debug_span!("score_member", version = %ctx.version(), model = model.as_str())
            .entered();

        let resolved = resolve(conditions, ctx.tables, false);
        let input_kind = resolved.kind();
        let demographic_codes = classify(beneficiary);

        let (resolved_conditions, mut lines) = match resolved {
            ResolvedConditions::Categories(categories) => {
                let conditions = ctx.prep(&categories, false);
                let present: BTreeSet<CategoryCode> = categories.iter().copied().collect();
                let lines = categories
                    .iter()
                    .map(|code| ConditionLine {
                        diagnosis: None,
                        description: None,
                        categories: vec![category_line(
                            &ctx,
                            *code,
                            trumped_by(*code, &present, &ctx.tables.hierarchy),
                        )],
                    })
                    .collect::<Vec<_>>();
                (conditions, lines)
            }
            ResolvedConditions::Diagnoses(diagnoses) => {
                let mapping = ctx.map_diagnoses(&diagnoses);
                let conditions = ctx.prep(&mapping.resolved_categories(ctx.tables, false), false);
                let lines = mapping
                    .entries()
                    .iter()
                    .map(|entry| ConditionLine {
                        diagnosis: Some(entry.code.clone()),
                        description: Some(entry.description.clone()),
                        categories: entry
                            .categories
                            .iter()
                            .map(|category| category_line(&ctx, category.code, category.trumped_by))
                            .collect(),
                    })
                    .collect::<Vec<_>>();
                (conditions, lines)
            }
        };

        let raf = score(
            &demographic_codes,
            &resolved_conditions,
            &ctx.tables.coefficients,
            model,
            ctx.options.base_rate,
            ctx.options.verbose,
        );

        for line in &mut lines {
            for category in &mut line.categories {
                price_line(category, &raf, ctx.options.base_rate);
            }
        }
        lines.extend(
            resolved_conditions
                .iter()
                .filter(|code| code.is_interaction())
                .map(|code| {
                    let mut row = CategoryLine {
                        code: *code,
                        description: INTERACTION_DESCRIPTION.to_string(),
                        trumped_by: None,
                        coefficient: None,
                        premium: None,
                    };
                    price_line(&mut row, &raf, ctx.options.base_rate);
                    ConditionLine {
                        diagnosis: None,
                        description: None,
                        categories: vec![row],
                    }
                }),
        );

        Ok(MemberScore {
            model: ModelSelection {
                version: ctx.version(),
                model,
            },
            demographics: DemographicInputs {
                age: beneficiary.age,
                sex: beneficiary.sex,
                orec: beneficiary.orec,
                medicaid: beneficiary.medicaid,
                disabled: ctx.disabled,
                originally_disabled: beneficiary.is_originally_disabled(),
            },
            input_kind,
            raf,
            conditions: lines,
        })
    }

    /// Demographic part of a member score.
    pub fn demographic_score(
        &self,
        beneficiary: &Beneficiary,
        params: &CalcParams,
    ) -> Result<RafResult> {
        let ctx = self.context(&CalcParams {
            model: Some(beneficiary.model),
            ..*params
        })?;
        let _span = debug_span!(
            "demographic_score",
            version = %ctx.version(),
            model = beneficiary.model.as_str()
        )
        .entered();
        Ok(score(
            &classify(beneficiary),
            &[],
            &ctx.tables.coefficients,
            beneficiary.model,
            ctx.options.base_rate,
            false,
        ))
    }

    /// Diagnoses to resolved categories and interaction terms.
    pub fn categories_from_diagnoses<S: AsRef<str>>(
        &self,
        diagnoses: &[S],
        params: &CalcParams,
    ) -> Result<Vec<ConditionCode>> {
        let ctx = self.context(params)?;
        let _span = span("categories_from_diagnoses", &ctx).entered();
        let diagnoses = normalize_diagnoses(diagnoses, ctx.tables);
        Ok(ctx.diagnosis_conditions(&diagnoses))
    }

    /// Category-only RAF of a category list, trumped and interaction
    /// expanded.
    pub fn category_raf<S: AsRef<str>>(&self, categories: &[S], params: &CalcParams) -> Result<Score> {
        let ctx = self.context(params)?;
        let _span = span("category_raf", &ctx).entered();
        let categories = normalize_categories(categories, ctx.tables);
        let conditions: Vec<ConditionCode> = categories.into_iter().map(ConditionCode::from).collect();
        Ok(ctx.category_score(&conditions))
    }

    /// Category-only RAF of a diagnosis list. Honours `never_trump`, unlike
    /// [`Self::category_raf`].
    pub fn diagnosis_raf<S: AsRef<str>>(&self, diagnoses: &[S], params: &CalcParams) -> Result<Score> {
        let ctx = self.context(params)?;
        let _span = span("diagnosis_raf", &ctx).entered();
        let diagnoses = normalize_diagnoses(diagnoses, ctx.tables);
        Ok(ctx.diagnosis_score(&diagnoses))
    }

    /// Trumping plus interactions over a category list.
    pub fn combine_categories<S: AsRef<str>>(
        &self,
        categories: &[S],
        params: &CalcParams,
    ) -> Result<Vec<ConditionCode>> {
        let ctx = self.context(params)?;
        let _span = span("combine_categories", &ctx).entered();
        let categories = normalize_categories(categories, ctx.tables);
        Ok(ctx.prep(&categories, ctx.options.never_trump))
    }

    pub fn clean_diagnoses<S: AsRef<str>>(
        &self,
        diagnoses: &[S],
        params: &CalcParams,
    ) -> Result<Vec<DiagnosisCode>> {
        let ctx = self.context(params)?;
        Ok(normalize_diagnoses(diagnoses, ctx.tables))
    }

    pub fn clean_categories<S: AsRef<str>>(
        &self,
        categories: &[S],
        params: &CalcParams,
    ) -> Result<Vec<CategoryCode>> {
        let ctx = self.context(params)?;
        Ok(normalize_categories(categories, ctx.tables))
    }

    /// `DX:description` pairs. Verbose mode keeps unknown diagnoses with an
    /// empty description.
    pub fn describe_diagnoses<S: AsRef<str>>(
        &self,
        diagnoses: &[S],
        params: &CalcParams,
    ) -> Result<Vec<CodeDescription>> {
        let ctx = self.context(params)?;
        let _span = span("describe_diagnoses", &ctx).entered();
        let codes = if ctx.options.verbose {
            canonical_diagnoses(diagnoses)
        } else {
            normalize_diagnoses(diagnoses, ctx.tables)
        };
        Ok(codes
            .into_iter()
            .map(|code| CodeDescription {
                description: ctx
                    .tables
                    .diagnosis(&code)
                    .map(|entry| entry.description.clone())
                    .unwrap_or_default(),
                code: code.to_string(),
                trumped_by: None,
            })
            .collect())
    }

    /// `HCC:description` pairs, annotated with the present parent that
    /// trumps each category.
    pub fn describe_categories<S: AsRef<str>>(
        &self,
        categories: &[S],
        params: &CalcParams,
    ) -> Result<Vec<CodeDescription>> {
        let ctx = self.context(params)?;
        let _span = span("describe_categories", &ctx).entered();
        let codes = normalize_categories(categories, ctx.tables);
        let present: BTreeSet<CategoryCode> = codes.iter().copied().collect();
        Ok(codes
            .iter()
            .map(|code| CodeDescription {
                code: code.to_string(),
                description: ctx
                    .tables
                    .hierarchy
                    .description(*code)
                    .unwrap_or_default()
                    .to_string(),
                trumped_by: trumped_by(*code, &present, &ctx.tables.hierarchy),
            })
            .collect())
    }

    /// Hierarchy neighbours and stand-alone RAF of one category. `None`
    /// when the version does not define it.
    pub fn category_info(&self, code: &str, params: &CalcParams) -> Result<Option<CategoryInfo>> {
        let ctx = self.context(params)?;
        let _span = span("category_info", &ctx).entered();
        let Some(code) = normalize_categories(&[code], ctx.tables).first().copied() else {
            return Ok(None);
        };
        let hierarchy = &ctx.tables.hierarchy;
        Ok(Some(CategoryInfo {
            code,
            description: hierarchy.description(code).unwrap_or_default().to_string(),
            children: hierarchy.children(code),
            parents: hierarchy.parents(code),
            raf: ctx.category_score(&[ConditionCode::from(code)]),
        }))
    }

    pub fn diff_categories<S: AsRef<str>>(
        &self,
        old: &[S],
        new: &[S],
        params: &CalcParams,
    ) -> Result<CategoryDiff> {
        let ctx = self.context(params)?;
        let _span = span("diff_categories", &ctx).entered();
        let (old, new) = category_pair(&ctx, old, new);
        Ok(comparator::diff_categories(&ctx, &old, &new))
    }

    pub fn gap_categories<S: AsRef<str>>(
        &self,
        old: &[S],
        new: &[S],
        params: &CalcParams,
    ) -> Result<CategoryGap> {
        let ctx = self.context(params)?;
        let _span = span("gap_categories", &ctx).entered();
        let (old, new) = category_pair(&ctx, old, new);
        Ok(comparator::gap_categories(&ctx, &old, &new))
    }

    pub fn increment_categories<S: AsRef<str>>(
        &self,
        old: &[S],
        new: &[S],
        params: &CalcParams,
    ) -> Result<CategoryIncrement> {
        let ctx = self.context(params)?;
        let _span = span("increment_categories", &ctx).entered();
        let (old, new) = category_pair(&ctx, old, new);
        Ok(comparator::increment_categories(&ctx, &old, &new))
    }

    pub fn diff_diagnoses<S: AsRef<str>>(
        &self,
        old: &[S],
        new: &[S],
        params: &CalcParams,
    ) -> Result<DiagnosisDiff> {
        let ctx = self.context(params)?;
        let _span = span("diff_diagnoses", &ctx).entered();
        let (old, new) = diagnosis_pair(&ctx, old, new);
        Ok(comparator::diff_diagnoses(&ctx, &old, &new))
    }

    pub fn gap_diagnoses<S: AsRef<str>>(
        &self,
        old: &[S],
        new: &[S],
        params: &CalcParams,
    ) -> Result<DiagnosisGap> {
        let ctx = self.context(params)?;
        let _span = span("gap_diagnoses", &ctx).entered();
        let (old, new) = diagnosis_pair(&ctx, old, new);
        Ok(comparator::gap_diagnoses(&ctx, &old, &new))
    }

    pub fn increment_diagnoses<S: AsRef<str>>(
        &self,
        old: &[S],
        new: &[S],
        params: &CalcParams,
    ) -> Result<DiagnosisIncrement> {
        let ctx = self.context(params)?;
        let _span = span("increment_diagnoses", &ctx).entered();
        let (old, new) = diagnosis_pair(&ctx, old, new);
        Ok(comparator::increment_diagnoses(&ctx, &old, &new))
    }
}

fn span(operation: &'static str, ctx: &CalcContext<'_>) -> tracing::Span {
    debug_span!(
        "engine",
        operation,
        version = %ctx.version(),
        model = ctx.model.as_str()
    )
}

fn category_pair<S: AsRef<str>>(
    ctx: &CalcContext<'_>,
    old: &[S],
    new: &[S],
) -> (Vec<CategoryCode>, Vec<CategoryCode>) {
    (
        normalize_categories(old, ctx.tables),
        normalize_categories(new, ctx.tables),
    )
}

fn diagnosis_pair<S: AsRef<str>>(
    ctx: &CalcContext<'_>,
    old: &[S],
    new: &[S],
) -> (Vec<DiagnosisCode>, Vec<DiagnosisCode>) {
    (
        normalize_diagnoses(old, ctx.tables),
        normalize_diagnoses(new, ctx.tables),
    )
}

fn category_line(
    ctx: &CalcContext<'_>,
    code: CategoryCode,
    trumped_by: Option<CategoryCode>,
) -> CategoryLine {
    CategoryLine {
        code: code.into(),
        description: ctx
            .tables
            .hierarchy
            .description(code)
            .unwrap_or_default()
            .to_string(),
        trumped_by,
        coefficient: None,
        premium: None,
    }
}

/// Trumped rows stay unpriced.
fn price_line(line: &mut CategoryLine, raf: &RafResult, base_rate: f64) {
    if line.trumped_by.is_some() {
        return;
    }
    line.coefficient = raf.coefficient_of(line.code);
    line.premium = line.coefficient.map(|c| c.premium(base_rate));
}

