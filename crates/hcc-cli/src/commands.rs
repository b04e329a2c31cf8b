use std::io;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, info_span};

use hcc_cli::config::{ConfigOverrides, load_engine_config, resolve_standards_dir};
use hcc_cli::csv_io::{read_members, write_scores, write_scores_to_path};
use hcc_core::{BatchConfig, BatchReport, BatchScorer, CalcParams, MemberInput, RafEngine};
use hcc_model::Beneficiary;
use hcc_standards::{DoctorReport, StandardsRegistry};

use crate::cli::{
    BatchArgs, CategoriesArgs, Cli, CodesArgs, CompareArgs, DoctorArgs, InfoArgs, LevelArg,
    ScoreArgs,
};
use crate::summary::{
    print_batch_summary, print_category_info, print_codes, print_descriptions, print_diff,
    print_doctor, print_gap, print_increment, print_member_score,
};

/// Loads the engine configuration and the verified standards snapshot.
pub fn load_engine(cli: &Cli) -> Result<RafEngine> {
    let overrides = ConfigOverrides {
        version: cli.version_set,
        model: cli.model,
        base_rate: cli.base_rate,
    };
    let config = load_engine_config(cli.config.as_deref(), overrides)?;
    let standards_dir = resolve_standards_dir(cli.standards_dir.as_deref());
    let (tables, summary) = StandardsRegistry::verify_and_load(&standards_dir)
        .with_context(|| format!("load standards from {}", standards_dir.display()))?;
    info!(
        standards_dir = %standards_dir.display(),
        versions = summary.versions.len(),
        version = %config.version,
        model = %config.model,
        "engine ready"
    );
    Ok(RafEngine::new(tables, config))
}

pub fn run_score(engine: &RafEngine, args: &ScoreArgs) -> Result<()> {
    let _span = info_span!("score").entered();
    let member = Beneficiary::new(args.age, args.sex)
        .with_orec(args.orec)
        .with_medicaid(args.medicaid)
        .with_model(engine.config().model);
    let score = engine
        .score_member(&args.conditions, &member, &CalcParams::new())
        .context("score member")?;
    if args.json {
        print_json(&score)
    } else {
        print_member_score(&score, engine.config().base_rate);
        Ok(())
    }
}

pub fn run_categories(engine: &RafEngine, args: &CategoriesArgs) -> Result<()> {
    let mut params = CalcParams::new()
        .with_disabled(args.disabled)
        .with_never_trump(args.never_trump);
    if let Some(age) = args.age {
        params = params.with_age(age);
    }
    if let Some(sex) = args.sex {
        params = params.with_sex(sex);
    }
    let conditions = engine
        .categories_from_diagnoses(&args.diagnoses, &params)
        .context("map diagnoses")?;
    print_codes(&conditions);
    Ok(())
}

pub fn run_raf(engine: &RafEngine, args: &CodesArgs) -> Result<()> {
    let params = CalcParams::new();
    let raf = match args.level {
        LevelArg::Category => engine.category_raf(&args.codes, &params),
        LevelArg::Diagnosis => engine.diagnosis_raf(&args.codes, &params),
    }
    .context("score conditions")?;
    println!("{raf}");
    Ok(())
}

pub fn run_combine(engine: &RafEngine, args: &CodesArgs) -> Result<()> {
    let params = CalcParams::new();
    let conditions = match args.level {
        LevelArg::Category => engine.combine_categories(&args.codes, &params),
        LevelArg::Diagnosis => engine.categories_from_diagnoses(&args.codes, &params),
    }
    .context("combine conditions")?;
    print_codes(&conditions);
    Ok(())
}

pub fn run_diff(engine: &RafEngine, args: &CompareArgs) -> Result<()> {
    let _span = info_span!("diff").entered();
    let params = CalcParams::new();
    match args.level {
        LevelArg::Category => {
            let diff = engine
                .diff_categories(&args.old, &args.new, &params)
                .context("diff categories")?;
            render(args.json, &diff, print_diff)
        }
        LevelArg::Diagnosis => {
            let diff = engine
                .diff_diagnoses(&args.old, &args.new, &params)
                .context("diff diagnoses")?;
            render(args.json, &diff, print_diff)
        }
    }
}

pub fn run_gap(engine: &RafEngine, args: &CompareArgs) -> Result<()> {
    let _span = info_span!("gap").entered();
    let params = CalcParams::new();
    match args.level {
        LevelArg::Category => {
            let gap = engine
                .gap_categories(&args.old, &args.new, &params)
                .context("gap categories")?;
            render(args.json, &gap, print_gap)
        }
        LevelArg::Diagnosis => {
            let gap = engine
                .gap_diagnoses(&args.old, &args.new, &params)
                .context("gap diagnoses")?;
            render(args.json, &gap, print_gap)
        }
    }
}

pub fn run_increment(engine: &RafEngine, args: &CompareArgs) -> Result<()> {
    let _span = info_span!("increment").entered();
    let params = CalcParams::new();
    match args.level {
        LevelArg::Category => {
            let increment = engine
                .increment_categories(&args.old, &args.new, &params)
                .context("increment categories")?;
            render(args.json, &increment, print_increment)
        }
        LevelArg::Diagnosis => {
            let increment = engine
                .increment_diagnoses(&args.old, &args.new, &params)
                .context("increment diagnoses")?;
            render(args.json, &increment, print_increment)
        }
    }
}

pub fn run_describe(engine: &RafEngine, args: &CodesArgs) -> Result<()> {
    let params = CalcParams::new();
    let descriptions = match args.level {
        LevelArg::Category => engine.describe_categories(&args.codes, &params),
        LevelArg::Diagnosis => engine.describe_diagnoses(&args.codes, &params),
    }
    .context("describe codes")?;
    print_descriptions(&descriptions);
    Ok(())
}

/// Returns false when the category is not defined for the version.
pub fn run_info(engine: &RafEngine, args: &InfoArgs) -> Result<bool> {
    let Some(info) = engine
        .category_info(&args.category, &CalcParams::new())
        .context("category info")?
    else {
        eprintln!(
            "{} is not a category of {}",
            args.category,
            engine.config().version
        );
        return Ok(false);
    };
    render(args.json, &info, print_category_info)?;
    Ok(true)
}

pub fn run_clean(engine: &RafEngine, args: &CodesArgs) -> Result<()> {
    let params = CalcParams::new();
    match args.level {
        LevelArg::Category => print_codes(
            &engine
                .clean_categories(&args.codes, &params)
                .context("clean categories")?,
        ),
        LevelArg::Diagnosis => print_codes(
            &engine
                .clean_diagnoses(&args.codes, &params)
                .context("clean diagnoses")?,
        ),
    }
    Ok(())
}

pub fn run_batch(engine: &RafEngine, args: &BatchArgs) -> Result<BatchReport> {
    let _span = info_span!("batch", input = %args.input.display()).entered();
    let members = read_members(&args.input)?;
    let total = members.len();
    let rejected = members
        .iter()
        .filter(|member| matches!(member, MemberInput::Rejected { .. }))
        .count();
    info!(members = total, rejected, "members loaded");

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} members",
        )
        .context("progress template")?
        .progress_chars("=> "),
    );

    let config = BatchConfig::default().with_parallel(!args.sequential);
    let report =
        BatchScorer::new(engine, config).score_inputs_with_progress(members, || progress.inc(1));
    progress.finish_and_clear();

    match &args.output {
        Some(path) => write_scores_to_path(path, &report.outcomes)?,
        None => write_scores(io::stdout().lock(), &report.outcomes)?,
    }
    print_batch_summary(&report);
    Ok(report)
}

/// Verifies the snapshot on its own, without building an engine first.
pub fn run_doctor(cli: &Cli, args: &DoctorArgs) -> Result<DoctorReport> {
    let standards_dir = resolve_standards_dir(cli.standards_dir.as_deref());
    let _span = info_span!("doctor", standards_dir = %standards_dir.display()).entered();
    let (tables, summary) = StandardsRegistry::verify_and_load(&standards_dir)
        .with_context(|| format!("verify standards in {}", standards_dir.display()))?;
    let report = DoctorReport::from_verify_summary(&summary, &tables);
    render(args.json, &report, print_doctor)?;
    Ok(report)
}

fn render<T: Serialize>(json: bool, value: &T, print: fn(&T)) -> Result<()> {
    if json {
        print_json(value)
    } else {
        print(value);
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}
