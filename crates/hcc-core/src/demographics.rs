//! Demographic cell selection.
//!
//! Every beneficiary falls in exactly one age/sex cell of the payer model's
//! demographic table. Cell codes carry the model prefix so they can be
//! looked up in the coefficient table as they are.

use hcc_model::Beneficiary;
use tracing::trace;

/// An inclusive age band; `upper` is open-ended when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    pub label: &'static str,
    pub lower: u32,
    pub upper: Option<u32>,
}

impl AgeBand {
    const fn new(label: &'static str, lower: u32, upper: Option<u32>) -> Self {
        Self { label, lower, upper }
    }

    pub fn contains(&self, age: u32) -> bool {
        age >= self.lower && self.upper.is_none_or(|upper| age <= upper)
    }
}

/// Five-year bands used by continuing-enrollee models.
pub const STANDARD_BANDS: &[AgeBand] = &[
    AgeBand::new("0_34", 0, Some(34)),
    AgeBand::new("35_44", 35, Some(44)),
    AgeBand::new("45_54", 45, Some(54)),
    AgeBand::new("55_59", 55, Some(59)),
    AgeBand::new("60_64", 60, Some(64)),
    AgeBand::new("65_69", 65, Some(69)),
    AgeBand::new("70_74", 70, Some(74)),
    AgeBand::new("75_79", 75, Some(79)),
    AgeBand::new("80_84", 80, Some(84)),
    AgeBand::new("85_89", 85, Some(89)),
    AgeBand::new("90_94", 90, Some(94)),
    AgeBand::new("95_GT", 95, None),
];

/// New-enrollee bands, single years from 65 through 69.
pub const NEW_ENROLLEE_BANDS: &[AgeBand] = &[
    AgeBand::new("0_34", 0, Some(34)),
    AgeBand::new("35_44", 35, Some(44)),
    AgeBand::new("45_54", 45, Some(54)),
    AgeBand::new("55_59", 55, Some(59)),
    AgeBand::new("60_64", 60, Some(64)),
    AgeBand::new("65", 65, Some(65)),
    AgeBand::new("66", 66, Some(66)),
    AgeBand::new("67", 67, Some(67)),
    AgeBand::new("68", 68, Some(68)),
    AgeBand::new("69", 69, Some(69)),
    AgeBand::new("70_74", 70, Some(74)),
    AgeBand::new("75_79", 75, Some(79)),
    AgeBand::new("80_84", 80, Some(84)),
    AgeBand::new("85_89", 85, Some(89)),
    AgeBand::new("90_94", 90, Some(94)),
    AgeBand::new("95_GT", 95, None),
];

pub fn age_band(bands: &'static [AgeBand], age: u32) -> Option<&'static AgeBand> {
    bands.iter().find(|band| band.contains(age))
}

/// Demographic cell codes for a beneficiary under its payer model.
///
/// The first code is always the age/sex cell. Aged community segments add
/// an originally-disabled cell when it applies.
pub fn classify(beneficiary: &Beneficiary) -> Vec<String> {
    let model = beneficiary.model;
    let sex = beneficiary.sex.as_str();
    let mut codes = Vec::with_capacity(2);

    if model.is_new_enrollee() {
        if let Some(band) = age_band(NEW_ENROLLEE_BANDS, beneficiary.age) {
            codes.push(format!(
                "{}_{}MCAID_{}ORIGDIS_NE{}{}",
                model.as_str(),
                if beneficiary.medicaid { "" } else { "N" },
                if beneficiary.is_originally_disabled() { "" } else { "N" },
                sex,
                band.label
            ));
        }
    } else {
        if let Some(band) = age_band(STANDARD_BANDS, beneficiary.age) {
            codes.push(format!("{}_{}{}", model.as_str(), sex, band.label));
        }
        if model.is_aged_community() && beneficiary.is_originally_disabled() {
            codes.push(format!(
                "{}_OriginallyDisabled_{}",
                model.as_str(),
                beneficiary.sex.label()
            ));
        }
    }

    trace!(model = model.as_str(), cells = codes.len(), "classified demographics");
    codes
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcc_model::{EntitlementReason, PayerModel, Sex};

    #[test]
    fn bands_cover_every_age_once() {
        for bands in [STANDARD_BANDS, NEW_ENROLLEE_BANDS] {
            for age in 0..=120 {
                let hits = bands.iter().filter(|band| band.contains(age)).count();
                assert_eq!(hits, 1, "age {age}");
            }
        }
    }

    #[test]
    fn aged_female_community_cell() {
        let member = Beneficiary::new(90, Sex::Female);
        assert_eq!(classify(&member), vec!["CNA_F90_94"]);
    }

    #[test]
    fn originally_disabled_adds_second_cell() {
        let member = Beneficiary::new(70, Sex::Male)
            .with_orec(EntitlementReason::Disability)
            .with_model(PayerModel::CommunityFullDualAged);
        assert_eq!(
            classify(&member),
            vec!["CFA_M70_74", "CFA_OriginallyDisabled_Male"]
        );

        let institutional = member.with_model(PayerModel::Institutional);
        assert_eq!(classify(&institutional), vec!["INS_M70_74"]);
    }

    #[test]
    fn disabled_members_are_not_originally_disabled() {
        let member = Beneficiary::new(50, Sex::Female)
            .with_orec(EntitlementReason::Disability)
            .with_model(PayerModel::CommunityNonDualAged);
        assert_eq!(classify(&member), vec!["CNA_F45_54"]);
    }

    #[test]
    fn new_enrollee_cells_carry_flags() {
        let member = Beneficiary::new(67, Sex::Male).with_model(PayerModel::NewEnrollee);
        assert_eq!(classify(&member), vec!["NE_NMCAID_NORIGDIS_NEM67"]);

        let dual = Beneficiary::new(72, Sex::Female)
            .with_orec(EntitlementReason::Disability)
            .with_medicaid(true)
            .with_model(PayerModel::SnpNewEnrollee);
        assert_eq!(classify(&dual), vec!["SNPNE_MCAID_ORIGDIS_NEF70_74"]);
    }
}
