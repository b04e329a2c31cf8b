//! CLI argument definitions for the RAF calculator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use hcc_model::{EntitlementReason, ModelVersion, PayerModel, Sex, parse_age};

#[derive(Parser)]
#[command(
    name = "hcc-raf",
    version,
    about = "CMS-HCC risk adjustment factor calculator",
    long_about = "Score Medicare Advantage members with the CMS-HCC model.\n\n\
                  Maps ICD-10 diagnoses to hierarchical condition categories, applies\n\
                  hierarchies and interactions, and compares condition lists across\n\
                  model versions V22, V23 and V24."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Standards snapshot directory (default: $HCC_STANDARDS_DIR, then the bundled one).
    #[arg(long = "standards-dir", value_name = "DIR", global = true)]
    pub standards_dir: Option<PathBuf>,

    /// Engine configuration TOML. Flags below override its values.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Model version (v22, v23, v24).
    #[arg(long = "version-set", value_name = "VERSION", global = true)]
    pub version_set: Option<ModelVersion>,

    /// Payer model segment (CNA, CND, CFA, CFD, CPA, CPD, INS, NE, SNPNE).
    #[arg(long = "model", value_name = "MODEL", global = true)]
    pub model: Option<PayerModel>,

    /// Monthly base rate used for premiums.
    #[arg(long = "base-rate", value_name = "AMOUNT", global = true)]
    pub base_rate: Option<f64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score one member from demographics and conditions.
    Score(ScoreArgs),

    /// Map diagnoses to categories and interaction terms.
    Categories(CategoriesArgs),

    /// Category-only RAF of a condition list.
    Raf(CodesArgs),

    /// Apply hierarchies and interactions to a category list.
    Combine(CodesArgs),

    /// Compare two condition lists: adds, upgrades, downgrades and deletes.
    Diff(CompareArgs),

    /// What the new list lost relative to the old one.
    Gap(CompareArgs),

    /// What the new codes add on top of the old ones.
    Increment(CompareArgs),

    /// Describe diagnosis or category codes.
    Describe(CodesArgs),

    /// Show one category's hierarchy neighbours and RAF.
    Info(InfoArgs),

    /// Normalize a code list against the model version.
    Clean(CodesArgs),

    /// Score a members CSV and write a scores CSV.
    Batch(BatchArgs),

    /// Verify the standards snapshot and report table problems.
    Doctor(DoctorArgs),
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Diagnosis or category codes, comma or space separated.
    #[arg(long = "conditions", value_name = "CODES", num_args = 0..)]
    pub conditions: Vec<String>,

    /// Fractional ages are truncated.
    #[arg(long = "age", value_parser = parse_age)]
    pub age: u32,

    /// M/F (also 1/2).
    #[arg(long = "sex")]
    pub sex: Sex,

    /// Original reason for entitlement (0-3).
    #[arg(long = "orec", default_value = "0")]
    pub orec: EntitlementReason,

    /// Member has Medicaid (new enrollee segments only).
    #[arg(long = "medicaid")]
    pub medicaid: bool,

    /// Print the score as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct CategoriesArgs {
    /// Diagnosis codes.
    #[arg(value_name = "DIAGNOSES", required = true)]
    pub diagnoses: Vec<String>,

    /// Enables age edits.
    #[arg(long = "age", value_parser = parse_age)]
    pub age: Option<u32>,

    /// Enables sex edits.
    #[arg(long = "sex")]
    pub sex: Option<Sex>,

    /// Apply the disabled-segment interactions.
    #[arg(long = "disabled")]
    pub disabled: bool,

    /// Keep child categories even when a parent is present.
    #[arg(long = "never-trump")]
    pub never_trump: bool,
}

#[derive(Args)]
pub struct CodesArgs {
    #[arg(value_name = "CODES", required = true)]
    pub codes: Vec<String>,

    /// Read the codes as categories or diagnoses.
    #[arg(long = "level", value_enum, default_value = "category")]
    pub level: LevelArg,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Codes before the change.
    #[arg(long = "old", value_name = "CODES", num_args = 1.., required = true)]
    pub old: Vec<String>,

    /// Codes after the change.
    #[arg(long = "new", value_name = "CODES", num_args = 1.., required = true)]
    pub new: Vec<String>,

    #[arg(long = "level", value_enum, default_value = "category")]
    pub level: LevelArg,

    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Category code, e.g. HCC85 or 85.
    #[arg(value_name = "CATEGORY")]
    pub category: String,

    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Members CSV: member_id,age,sex,orec,model,medicaid,conditions.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Scores CSV path (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Score members one at a time on the current thread.
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[derive(Args)]
pub struct DoctorArgs {
    #[arg(long = "json")]
    pub json: bool,
}

/// How a code list is read.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LevelArg {
    Category,
    Diagnosis,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
