//! CMS-HCC risk adjustment engine.
//!
//! A calculation runs normalize, resolve, map, trump, interact, classify and
//! score against one version of the read-only lookup tables. [`RafEngine`]
//! is the entry point; [`formulas`] wraps it with the worksheet string
//! functions and [`batch`] scores many members in parallel.

pub mod batch;
pub mod comparator;
pub mod context;
pub mod demographics;
pub mod edits;
pub mod engine;
pub mod error;
pub mod formulas;
pub mod interactions;
pub mod mapper;
pub mod normalize;
pub mod resolver;
pub mod scorer;
pub mod trump;

pub use batch::{
    BatchConfig, BatchReport, BatchScorer, MemberInput, MemberOutcome, MemberRequest, score_batch,
};
pub use context::{CalcContext, CalcOptions};
pub use edits::EditOutcome;
pub use engine::{CalcParams, RafEngine};
pub use error::{EngineError, Result};
pub use interactions::InteractionRuleSet;
pub use mapper::{DiagnosisMapping, MappedCategory, MappedDiagnosis};
pub use resolver::ResolvedConditions;
