//! Domain types for CMS-HCC risk adjustment.
//!
//! Everything here is plain data: identifiers, model enums, the beneficiary
//! record, engine configuration and the result records returned by the
//! scoring engine. No lookup tables live in this crate.

pub mod beneficiary;
pub mod decimal;
pub mod enums;
pub mod error;
pub mod ids;
pub mod options;
pub mod results;

pub use beneficiary::{AGED_THRESHOLD, Beneficiary, parse_age};
pub use decimal::{Money, Score};
pub use enums::{EntitlementReason, ModelVersion, PayerModel, Sex};
pub use error::{ModelError, Result};
pub use ids::{CategoryCode, ConditionCode, DiagnosisCode, InteractionTerm};
pub use options::{DEFAULT_BASE_RATE, EngineConfig};
pub use results::{
    CategoryDiff, CategoryGap, CategoryIncrement, CategoryInfo, CategoryLine, CodeDescription,
    ConditionCoefficient, ConditionLine, DemographicCoefficient, DemographicInputs, DiagnosisDiff,
    DiagnosisGap, DiagnosisIncrement, DiffResult, GapResult, IncrementResult, InputKind,
    MemberScore, ModelSelection, RafResult,
};
