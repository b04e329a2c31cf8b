#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// An ICD-10 diagnosis code in lookup form: upper-case, no decimal point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiagnosisCode(String);

impl DiagnosisCode {
    /// Canonicalizes a raw code. `"e11.9 "` becomes `E119`.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ModelError> {
        let raw = value.as_ref();
        let canonical: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '.')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if canonical.is_empty() || !canonical.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ModelError::InvalidDiagnosisCode(raw.to_string()));
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagnosisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DiagnosisCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DiagnosisCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiagnosisCode> for String {
    fn from(value: DiagnosisCode) -> Self {
        value.0
    }
}

/// A hierarchical condition category, `HCC{n}` with no leading zeros.
///
/// Ordering is numeric, so `HCC2 < HCC19 < HCC110`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryCode(u16);

impl CategoryCode {
    pub const PREFIX: &'static str = "HCC";

    /// Accepts `HCC19`, `hcc019`, `19` and `019`.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ModelError> {
        let raw = value.as_ref();
        let upper = raw.trim().to_ascii_uppercase();
        let digits = upper.strip_prefix(Self::PREFIX).unwrap_or(&upper);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ModelError::InvalidCategoryCode(raw.to_string()));
        }
        digits
            .parse::<u16>()
            .map(Self)
            .map_err(|_| ModelError::InvalidCategoryCode(raw.to_string()))
    }

    pub const fn from_number(number: u16) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u16 {
        self.0
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

impl FromStr for CategoryCode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CategoryCode {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryCode> for String {
    fn from(value: CategoryCode) -> Self {
        value.to_string()
    }
}

/// Label of a derived interaction term, e.g. `HCC85_gDiabetesMellit`.
///
/// Labels come from the static interaction rule tables and are priced like
/// categories under `{model}_{label}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InteractionTerm(&'static str);

impl InteractionTerm {
    pub const fn new(label: &'static str) -> Self {
        Self(label)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for InteractionTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for InteractionTerm {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// One member of a resolved condition set: a category or an interaction term.
///
/// Categories sort before interaction terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConditionCode {
    Category(CategoryCode),
    Interaction(InteractionTerm),
}

impl ConditionCode {
    pub fn as_category(&self) -> Option<CategoryCode> {
        match self {
            ConditionCode::Category(code) => Some(*code),
            ConditionCode::Interaction(_) => None,
        }
    }

    pub fn is_interaction(&self) -> bool {
        matches!(self, ConditionCode::Interaction(_))
    }
}

impl fmt::Display for ConditionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionCode::Category(code) => code.fmt(f),
            ConditionCode::Interaction(term) => term.fmt(f),
        }
    }
}

impl From<CategoryCode> for ConditionCode {
    fn from(value: CategoryCode) -> Self {
        ConditionCode::Category(value)
    }
}

impl From<InteractionTerm> for ConditionCode {
    fn from(value: InteractionTerm) -> Self {
        ConditionCode::Interaction(value)
    }
}

impl Serialize for ConditionCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_code_strips_prefix_and_zeros() {
        assert_eq!(CategoryCode::new("HCC019").unwrap().to_string(), "HCC19");
        assert_eq!(CategoryCode::new(" hcc8 ").unwrap().number(), 8);
        assert_eq!(CategoryCode::new("110").unwrap().to_string(), "HCC110");
        assert!(CategoryCode::new("HCC").is_err());
        assert!(CategoryCode::new("HCC85_gDiabetesMellit").is_err());
        assert!(CategoryCode::new("E119").is_err());
    }

    #[test]
    fn category_order_is_numeric() {
        let mut codes: Vec<CategoryCode> = ["HCC19", "HCC2", "HCC110", "HCC10"]
            .iter()
            .map(|c| CategoryCode::new(c).unwrap())
            .collect();
        codes.sort();
        let rendered: Vec<String> = codes.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["HCC2", "HCC10", "HCC19", "HCC110"]);
    }

    #[test]
    fn diagnosis_code_drops_decimal_point() {
        assert_eq!(DiagnosisCode::new("e11.9").unwrap().as_str(), "E119");
        assert_eq!(DiagnosisCode::new(" D61.810 ").unwrap().as_str(), "D61810");
        assert!(DiagnosisCode::new("").is_err());
        assert!(DiagnosisCode::new("E11-9").is_err());
    }

    #[test]
    fn conditions_sort_categories_first() {
        let mut codes = vec![
            ConditionCode::from(InteractionTerm::new("HCC85_gCopdCF")),
            ConditionCode::from(CategoryCode::from_number(111)),
            ConditionCode::from(CategoryCode::from_number(85)),
        ];
        codes.sort();
        let rendered: Vec<String> = codes.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["HCC85", "HCC111", "HCC85_gCopdCF"]);
    }

    proptest::proptest! {
        #[test]
        fn category_spellings_agree(number in 0u16..1000, zeros in 0usize..3, lower in proptest::bool::ANY) {
            let prefix = if lower { "hcc" } else { "HCC" };
            let padded = format!("{prefix}{}{number}", "0".repeat(zeros));
            let code = CategoryCode::new(&padded).unwrap();
            proptest::prop_assert_eq!(code.number(), number);
            proptest::prop_assert_eq!(CategoryCode::new(code.to_string()).unwrap(), code);
        }

        #[test]
        fn category_order_is_numeric_prop(a in 0u16..1000, b in 0u16..1000) {
            let (left, right) = (CategoryCode::from_number(a), CategoryCode::from_number(b));
            proptest::prop_assert_eq!(left.cmp(&right), a.cmp(&b));
        }
    }
}
