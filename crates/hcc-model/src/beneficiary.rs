//! Beneficiary demographics used by the demographic classifier.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::enums::{EntitlementReason, PayerModel, Sex};
use crate::error::ModelError;

/// Age at which the aged segments begin.
pub const AGED_THRESHOLD: u32 = 65;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    #[serde(deserialize_with = "deserialize_age")]
    pub age: u32,
    pub sex: Sex,
    #[serde(default)]
    pub orec: EntitlementReason,
    /// Medicaid status. Only the new enrollee segments read it.
    #[serde(default)]
    pub medicaid: bool,
    #[serde(default)]
    pub model: PayerModel,
}

impl Beneficiary {
    pub fn new(age: u32, sex: Sex) -> Self {
        Self {
            age,
            sex,
            orec: EntitlementReason::default(),
            medicaid: false,
            model: PayerModel::default(),
        }
    }

    pub fn with_orec(mut self, orec: EntitlementReason) -> Self {
        self.orec = orec;
        self
    }

    pub fn with_medicaid(mut self, medicaid: bool) -> Self {
        self.medicaid = medicaid;
        self
    }

    pub fn with_model(mut self, model: PayerModel) -> Self {
        self.model = model;
        self
    }

    /// Under 65 and entitled for any reason other than old age.
    pub fn is_disabled(&self) -> bool {
        self.age < AGED_THRESHOLD && self.orec != EntitlementReason::OldAge
    }

    /// Entitled through disability but now aged in.
    pub fn is_originally_disabled(&self) -> bool {
        self.orec == EntitlementReason::Disability && !self.is_disabled()
    }
}

/// Reads an age leniently: any finite, non-negative number is accepted and
/// its fraction truncated, so `72.9` is 72.
pub fn parse_age(value: &str) -> Result<u32, ModelError> {
    let trimmed = value.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(truncate_age)
        .ok_or_else(|| ModelError::InvalidAge(trimmed.to_string()))
}

fn truncate_age(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value < f64::from(u32::MAX) {
        Some(value.trunc() as u32)
    } else {
        None
    }
}

/// Numbers and numeric strings both deserialize through [`parse_age`].
fn deserialize_age<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAge {
        Number(f64),
        Text(String),
    }

    match RawAge::deserialize(deserializer)? {
        RawAge::Number(value) => truncate_age(value)
            .ok_or_else(|| de::Error::custom(ModelError::InvalidAge(value.to_string()))),
        RawAge::Text(text) => parse_age(&text).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disability_flags_follow_age_and_orec() {
        let aged = Beneficiary::new(70, Sex::Female).with_orec(EntitlementReason::Disability);
        assert!(!aged.is_disabled());
        assert!(aged.is_originally_disabled());

        let young = Beneficiary::new(40, Sex::Male).with_orec(EntitlementReason::Disability);
        assert!(young.is_disabled());
        assert!(!young.is_originally_disabled());

        let young_old_age = Beneficiary::new(40, Sex::Male);
        assert!(!young_old_age.is_disabled());
        assert!(!young_old_age.is_originally_disabled());
    }

    #[test]
    fn deserializes_with_defaults() {
        let member: Beneficiary = serde_json::from_str(r#"{"age": 67, "sex": "M"}"#).unwrap();
        assert_eq!(member.orec, EntitlementReason::OldAge);
        assert_eq!(member.model, PayerModel::CommunityNonDualAged);
        assert!(!member.medicaid);
    }

    #[test]
    fn fractional_ages_truncate() {
        assert_eq!(parse_age("72.5"), Ok(72));
        assert_eq!(parse_age(" 64.99 "), Ok(64));
        assert_eq!(parse_age("0"), Ok(0));
        assert_eq!(parse_age("-1"), Err(ModelError::InvalidAge("-1".to_string())));
        assert!(parse_age("seventy").is_err());
        assert!(parse_age("NaN").is_err());
        assert!(parse_age("inf").is_err());
    }

    #[test]
    fn age_deserializes_from_numbers_and_text() {
        let fractional: Beneficiary =
            serde_json::from_str(r#"{"age": 72.9, "sex": "F"}"#).unwrap();
        assert_eq!(fractional.age, 72);
        let text: Beneficiary = serde_json::from_str(r#"{"age": "66.5", "sex": "F"}"#).unwrap();
        assert_eq!(text.age, 66);
        assert!(serde_json::from_str::<Beneficiary>(r#"{"age": -3, "sex": "F"}"#).is_err());
    }
}
