use hcc_model::ModelError;
use hcc_standards::StandardsError;
use thiserror::Error;

/// Failures of the scoring engine.
///
/// Unknown codes and missing coefficients are not errors; only a bad model
/// selection, a version without loaded tables or a member record that cannot
/// be read stops a calculation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Standards(#[from] StandardsError),
    #[error("invalid member record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
