use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown model version: {0}")]
    UnknownVersion(String),
    #[error("unknown payer model: {0}")]
    UnknownPayerModel(String),
    #[error("invalid category code: {0}")]
    InvalidCategoryCode(String),
    #[error("invalid diagnosis code: {0}")]
    InvalidDiagnosisCode(String),
    #[error("unknown original reason for entitlement: {0}")]
    UnknownEntitlementReason(String),
    #[error("unknown sex: {0}")]
    UnknownSex(String),
    #[error("invalid age: {0}")]
    InvalidAge(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
