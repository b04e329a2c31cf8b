//! Worksheet-style functions.
//!
//! Every function takes comma separated code lists as plain strings and
//! returns a display string: lists are comma joined and RAF values carry
//! three decimals. An empty version or model string selects the engine
//! default; any other unrecognised value is an error. Functions that take a
//! model also take [`FormulaArgs`], which carries the optional age, sex,
//! disability and never-trump switches.

use std::fmt::Display;

use hcc_model::{Beneficiary, DiffResult, EntitlementReason, Score, Sex};

use crate::engine::{CalcParams, RafEngine};
use crate::error::Result;

const RAF_DECIMALS: usize = 3;

/// Version, payer model and the optional member facts a worksheet function
/// accepts. Age and sex enable the age/sex edits; `disabled` turns on the
/// disabled-segment interactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FormulaArgs<'a> {
    pub version: &'a str,
    pub model: &'a str,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub disabled: bool,
    pub never_trump: bool,
}

impl<'a> FormulaArgs<'a> {
    pub fn new(version: &'a str, model: &'a str) -> Self {
        Self {
            version,
            model,
            ..Self::default()
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

    pub fn with_never_trump(mut self, never_trump: bool) -> Self {
        self.never_trump = never_trump;
        self
    }

    fn params(&self) -> Result<CalcParams> {
        let mut params = params(self.version, self.model)?
            .with_disabled(self.disabled)
            .with_never_trump(self.never_trump);
        if let Some(age) = self.age {
            params = params.with_age(age);
        }
        if let Some(sex) = self.sex {
            params = params.with_sex(sex);
        }
        Ok(params)
    }
}

fn params(version: &str, model: &str) -> Result<CalcParams> {
    let mut params = CalcParams::new();
    if !version.trim().is_empty() {
        params = params.with_version(version.parse()?);
    }
    if !model.trim().is_empty() {
        params = params.with_model(model.parse()?);
    }
    Ok(params)
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// `adds` followed by `upgraded`, the latter prefixed with `-`.
fn net_change<T: Display>(adds: &[T], upgraded: &[T]) -> String {
    adds.iter()
        .map(ToString::to_string)
        .chain(upgraded.iter().map(|code| format!("-{code}")))
        .collect::<Vec<_>>()
        .join(",")
}

fn diff_block<T: Display>(diff: &DiffResult<T>) -> String {
    format!(
        "adds: {}, upgraded: {}, downgraded: {}, downgraded_to: {}, deletes: {}",
        join(&diff.adds),
        join(&diff.upgraded),
        join(&diff.downgraded),
        join(&diff.downgraded_to),
        join(&diff.deletes),
    )
}

fn raf(score: Score) -> String {
    score.to_fixed(RAF_DECIMALS)
}

/// Demographic RAF of a beneficiary.
pub fn demo_raf(
    engine: &RafEngine,
    age: u32,
    sex: &str,
    orec: &str,
    version: &str,
    model: &str,
) -> Result<String> {
    let params = params(version, model)?;
    let beneficiary = Beneficiary::new(age, Sex::from_code_lenient(sex))
        .with_orec(EntitlementReason::from_code_lenient(orec))
        .with_model(params.model.unwrap_or(engine.config().model));
    Ok(raf(engine.demographic_score(&beneficiary, &params)?.demographic_score))
}

pub fn dx_desc(engine: &RafEngine, diagnoses: &str, version: &str) -> Result<String> {
    let params = params(version, "")?.with_verbose(true);
    Ok(join(&engine.describe_diagnoses(&[diagnoses], &params)?))
}

/// Resolved categories and interaction terms of a diagnosis list.
pub fn dx2cc(engine: &RafEngine, diagnoses: &str, args: &FormulaArgs<'_>) -> Result<String> {
    let params = args.params()?.with_verbose(false);
    Ok(join(&engine.categories_from_diagnoses(&[diagnoses], &params)?))
}

pub fn dx_raf(engine: &RafEngine, diagnoses: &str, args: &FormulaArgs<'_>) -> Result<String> {
    let params = args.params()?.with_verbose(false);
    Ok(raf(engine.diagnosis_raf(&[diagnoses], &params)?))
}

pub fn clean_dx(engine: &RafEngine, diagnoses: &str, version: &str) -> Result<String> {
    Ok(join(&engine.clean_diagnoses(&[diagnoses], &params(version, "")?)?))
}

pub fn clean_cc(engine: &RafEngine, categories: &str, version: &str) -> Result<String> {
    Ok(join(&engine.clean_categories(&[categories], &params(version, "")?)?))
}

pub fn cc_desc(engine: &RafEngine, categories: &str, version: &str) -> Result<String> {
    Ok(join(&engine.describe_categories(&[categories], &params(version, "")?)?))
}

/// `desc: …, children: …, parents: …, RAF: …` for one category, or an
/// empty string when the version does not define it.
pub fn cc_info(engine: &RafEngine, category: &str, args: &FormulaArgs<'_>) -> Result<String> {
    let Some(info) = engine.category_info(category, &args.params()?)? else {
        return Ok(String::new());
    };
    Ok(format!(
        "desc: {}, children: {}, parents: {}, RAF: {}",
        info.description,
        join(&info.children),
        join(&info.parents),
        raf(info.raf),
    ))
}

pub fn cc_raf(engine: &RafEngine, categories: &str, args: &FormulaArgs<'_>) -> Result<String> {
    Ok(raf(engine.category_raf(&[categories], &args.params()?)?))
}

/// Trumped and interaction-expanded category list.
pub fn cc_combine(engine: &RafEngine, categories: &str, args: &FormulaArgs<'_>) -> Result<String> {
    Ok(join(&engine.combine_categories(&[categories], &args.params()?)?))
}

/// `adds,-upgraded` of adding `new` on top of `old`.
pub fn cc_increment(
    engine: &RafEngine,
    old: &str,
    new: &str,
    args: &FormulaArgs<'_>,
) -> Result<String> {
    let increment = engine.increment_categories(&[old], &[new], &args.params()?)?;
    Ok(net_change(&increment.adds, &increment.upgraded))
}

pub fn cc_increment_raf(
    engine: &RafEngine,
    old: &str,
    new: &str,
    args: &FormulaArgs<'_>,
) -> Result<String> {
    let increment = engine.increment_categories(&[old], &[new], &args.params()?)?;
    Ok(raf(increment.raf))
}

/// `deletes,downgraded` between `old` and `new`.
pub fn cc_gaps(engine: &RafEngine, old: &str, new: &str, args: &FormulaArgs<'_>) -> Result<String> {
    let gap = engine.gap_categories(&[old], &[new], &args.params()?)?;
    Ok(join(&[gap.deletes, gap.downgraded].concat()))
}

pub fn cc_gaps_raf(
    engine: &RafEngine,
    old: &str,
    new: &str,
    args: &FormulaArgs<'_>,
) -> Result<String> {
    let gap = engine.gap_categories(&[old], &[new], &args.params()?)?;
    Ok(raf(gap.raf))
}

pub fn cc_diff(engine: &RafEngine, old: &str, new: &str, args: &FormulaArgs<'_>) -> Result<String> {
    let diff = engine.diff_categories(&[old], &[new], &args.params()?)?;
    Ok(diff_block(&diff))
}

pub fn cc_diff_raf(
    engine: &RafEngine,
    old: &str,
    new: &str,
    args: &FormulaArgs<'_>,
) -> Result<String> {
    let diff = engine.diff_categories(&[old], &[new], &args.params()?)?;
    Ok(raf(diff.raf))
}

pub fn dx_diff(engine: &RafEngine, old: &str, new: &str, args: &FormulaArgs<'_>) -> Result<String> {
    let diff = engine.diff_diagnoses(&[old], &[new], &args.params()?)?;
    Ok(diff_block(&diff))
}

pub fn dx_diff_raf(
    engine: &RafEngine,
    old: &str,
    new: &str,
    args: &FormulaArgs<'_>,
) -> Result<String> {
    let diff = engine.diff_diagnoses(&[old], &[new], &args.params()?)?;
    Ok(raf(diff.raf))
}

pub fn dx_increment(
    engine: &RafEngine,
    old: &str,
    new: &str,
    args: &FormulaArgs<'_>,
) -> Result<String> {
    let increment = engine.increment_diagnoses(&[old], &[new], &args.params()?)?;
    Ok(net_change(&increment.adds, &increment.upgraded))
}

pub fn dx_increment_raf(
    engine: &RafEngine,
    old: &str,
    new: &str,
    args: &FormulaArgs<'_>,
) -> Result<String> {
    let increment = engine.increment_diagnoses(&[old], &[new], &args.params()?)?;
    Ok(raf(increment.raf))
}

pub fn dx_gap(engine: &RafEngine, old: &str, new: &str, args: &FormulaArgs<'_>) -> Result<String> {
    let gap = engine.gap_diagnoses(&[old], &[new], &args.params()?)?;
    Ok(join(&[gap.deletes, gap.downgraded].concat()))
}

pub fn dx_gap_raf(
    engine: &RafEngine,
    old: &str,
    new: &str,
    args: &FormulaArgs<'_>,
) -> Result<String> {
    let gap = engine.gap_diagnoses(&[old], &[new], &args.params()?)?;
    Ok(raf(gap.raf))
}
