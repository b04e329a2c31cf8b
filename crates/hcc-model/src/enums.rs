//! Enumerations for the CMS-HCC payment model.
//!
//! Strict `FromStr` impls reject unknown values. The version and payer model
//! select lookup tables, so there is no safe fallback for them. Sex and the
//! original reason for entitlement also have lenient parsers that follow the
//! CMS demographic macros.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// CMS-HCC model version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelVersion {
    V22,
    #[default]
    V23,
    V24,
}

impl ModelVersion {
    pub const ALL: [ModelVersion; 3] = [ModelVersion::V22, ModelVersion::V23, ModelVersion::V24];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVersion::V22 => "v22",
            ModelVersion::V23 => "v23",
            ModelVersion::V24 => "v24",
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelVersion {
    type Err = ModelError;

    /// Accepts `v24`, `V24` and `24`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.trim_start_matches('v') {
            "22" => Ok(ModelVersion::V22),
            "23" => Ok(ModelVersion::V23),
            "24" => Ok(ModelVersion::V24),
            _ => Err(ModelError::UnknownVersion(s.to_string())),
        }
    }
}

impl TryFrom<String> for ModelVersion {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ModelVersion> for String {
    fn from(value: ModelVersion) -> Self {
        value.as_str().to_string()
    }
}

/// Payer model segment. Selects the coefficient column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PayerModel {
    /// CNA: community, non-dual, aged.
    #[default]
    CommunityNonDualAged,
    /// CND: community, non-dual, disabled.
    CommunityNonDualDisabled,
    /// CFA: community, full benefit dual, aged.
    CommunityFullDualAged,
    /// CFD: community, full benefit dual, disabled.
    CommunityFullDualDisabled,
    /// CPA: community, partial benefit dual, aged.
    CommunityPartialDualAged,
    /// CPD: community, partial benefit dual, disabled.
    CommunityPartialDualDisabled,
    /// INS: long-term institutional.
    Institutional,
    /// NE: new enrollee.
    NewEnrollee,
    /// SNPNE: chronic-condition special needs plan new enrollee.
    SnpNewEnrollee,
}

impl PayerModel {
    pub const ALL: [PayerModel; 9] = [
        PayerModel::CommunityNonDualAged,
        PayerModel::CommunityNonDualDisabled,
        PayerModel::CommunityFullDualAged,
        PayerModel::CommunityFullDualDisabled,
        PayerModel::CommunityPartialDualAged,
        PayerModel::CommunityPartialDualDisabled,
        PayerModel::Institutional,
        PayerModel::NewEnrollee,
        PayerModel::SnpNewEnrollee,
    ];

    /// Returns the CMS segment code used as the coefficient prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayerModel::CommunityNonDualAged => "CNA",
            PayerModel::CommunityNonDualDisabled => "CND",
            PayerModel::CommunityFullDualAged => "CFA",
            PayerModel::CommunityFullDualDisabled => "CFD",
            PayerModel::CommunityPartialDualAged => "CPA",
            PayerModel::CommunityPartialDualDisabled => "CPD",
            PayerModel::Institutional => "INS",
            PayerModel::NewEnrollee => "NE",
            PayerModel::SnpNewEnrollee => "SNPNE",
        }
    }

    pub fn is_community(&self) -> bool {
        matches!(
            self,
            PayerModel::CommunityNonDualAged
                | PayerModel::CommunityNonDualDisabled
                | PayerModel::CommunityFullDualAged
                | PayerModel::CommunityFullDualDisabled
                | PayerModel::CommunityPartialDualAged
                | PayerModel::CommunityPartialDualDisabled
        )
    }

    /// Aged community segments, the ones carrying the originally-disabled factor.
    pub fn is_aged_community(&self) -> bool {
        matches!(
            self,
            PayerModel::CommunityNonDualAged
                | PayerModel::CommunityFullDualAged
                | PayerModel::CommunityPartialDualAged
        )
    }

    /// Disabled community segments (codes ending in `D`).
    pub fn is_disabled_segment(&self) -> bool {
        self.as_str().ends_with('D')
    }

    pub fn is_institutional(&self) -> bool {
        matches!(self, PayerModel::Institutional)
    }

    /// New enrollee segments (codes ending in `NE`).
    pub fn is_new_enrollee(&self) -> bool {
        self.as_str().ends_with("NE")
    }
}

impl fmt::Display for PayerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PayerModel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        PayerModel::ALL
            .into_iter()
            .find(|model| model.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownPayerModel(s.to_string()))
    }
}

impl TryFrom<String> for PayerModel {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PayerModel> for String {
    fn from(value: PayerModel) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// Lenient parse: `M`, `MALE` and `1` are male, anything else is female.
    pub fn from_code_lenient(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "M" | "MALE" | "1" => Sex::Male,
            _ => Sex::Female,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" | "1" => Ok(Sex::Male),
            "F" | "FEMALE" | "2" => Ok(Sex::Female),
            _ => Err(ModelError::UnknownSex(s.to_string())),
        }
    }
}

/// Original reason for Medicare entitlement (OREC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntitlementReason {
    /// `0`: old age and survivors insurance.
    #[default]
    #[serde(rename = "0")]
    OldAge,
    /// `1`: disability insurance benefits.
    #[serde(rename = "1")]
    Disability,
    /// `2`: end-stage renal disease.
    #[serde(rename = "2")]
    Esrd,
    /// `3`: both disability and ESRD.
    #[serde(rename = "3")]
    DisabilityAndEsrd,
}

impl EntitlementReason {
    pub fn as_code(&self) -> &'static str {
        match self {
            EntitlementReason::OldAge => "0",
            EntitlementReason::Disability => "1",
            EntitlementReason::Esrd => "2",
            EntitlementReason::DisabilityAndEsrd => "3",
        }
    }

    /// Lenient parse: blank or unrecognised codes read as old age.
    pub fn from_code_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for EntitlementReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for EntitlementReason {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(EntitlementReason::OldAge),
            "1" => Ok(EntitlementReason::Disability),
            "2" => Ok(EntitlementReason::Esrd),
            "3" => Ok(EntitlementReason::DisabilityAndEsrd),
            _ => Err(ModelError::UnknownEntitlementReason(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parses_with_or_without_prefix() {
        assert_eq!("v22".parse::<ModelVersion>().unwrap(), ModelVersion::V22);
        assert_eq!(" V24 ".parse::<ModelVersion>().unwrap(), ModelVersion::V24);
        assert_eq!("23".parse::<ModelVersion>().unwrap(), ModelVersion::V23);
        assert!(matches!(
            "v25".parse::<ModelVersion>(),
            Err(ModelError::UnknownVersion(_))
        ));
    }

    #[test]
    fn payer_model_round_trips_codes() {
        for model in PayerModel::ALL {
            assert_eq!(model.as_str().parse::<PayerModel>().unwrap(), model);
        }
        assert_eq!("ins".parse::<PayerModel>().unwrap(), PayerModel::Institutional);
        assert!("XYZ".parse::<PayerModel>().is_err());
    }

    #[test]
    fn payer_model_families() {
        assert!(PayerModel::CommunityPartialDualDisabled.is_disabled_segment());
        assert!(!PayerModel::CommunityPartialDualAged.is_disabled_segment());
        assert!(PayerModel::SnpNewEnrollee.is_new_enrollee());
        assert!(!PayerModel::Institutional.is_community());
        assert!(PayerModel::CommunityFullDualAged.is_aged_community());
    }

    #[test]
    fn lenient_sex_defaults_to_female() {
        assert_eq!(Sex::from_code_lenient("male"), Sex::Male);
        assert_eq!(Sex::from_code_lenient("1"), Sex::Male);
        assert_eq!(Sex::from_code_lenient("2"), Sex::Female);
        assert_eq!(Sex::from_code_lenient("unknown"), Sex::Female);
        assert!("X".parse::<Sex>().is_err());
    }

    #[test]
    fn lenient_orec_defaults_to_old_age() {
        assert_eq!(EntitlementReason::from_code_lenient(""), EntitlementReason::OldAge);
        assert_eq!(
            EntitlementReason::from_code_lenient("1"),
            EntitlementReason::Disability
        );
    }
}
