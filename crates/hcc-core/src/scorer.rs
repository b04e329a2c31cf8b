//! Coefficient lookup and summation.

use hcc_model::{
    ConditionCode, ConditionCoefficient, DemographicCoefficient, PayerModel, RafResult, Score,
};
use hcc_standards::CoefficientTable;
use tracing::trace;

/// Prices demographic cells and resolved conditions.
///
/// Demographic codes already carry the model prefix. Missing coefficients
/// contribute zero; in verbose mode an unpriced condition is still listed
/// with a zero coefficient, unpriced demographic cells never are.
pub fn score(
    demographic_codes: &[String],
    conditions: &[ConditionCode],
    coefficients: &CoefficientTable,
    model: PayerModel,
    base_rate: f64,
    verbose: bool,
) -> RafResult {
    let demographic_detail: Vec<DemographicCoefficient> = demographic_codes
        .iter()
        .filter_map(|code| {
            coefficients
                .get_key(code)
                .map(|value| DemographicCoefficient {
                    code: code.clone(),
                    coefficient: Score(value),
                })
        })
        .collect();

    let mut condition_detail = Vec::with_capacity(conditions.len());
    for code in conditions {
        match coefficients.get(model, code) {
            Some(value) => condition_detail.push(ConditionCoefficient {
                code: *code,
                coefficient: Score(value),
            }),
            None => {
                trace!(condition = %code, model = model.as_str(), "no coefficient");
                if verbose {
                    condition_detail.push(ConditionCoefficient {
                        code: *code,
                        coefficient: Score::ZERO,
                    });
                }
            }
        }
    }

    let demographic_score: Score = demographic_detail.iter().map(|d| d.coefficient).sum();
    let condition_score: Score = condition_detail.iter().map(|c| c.coefficient).sum();
    let total = demographic_score + condition_score;

    RafResult {
        total,
        premium: total.premium(base_rate),
        demographic_score,
        condition_score,
        demographic_detail,
        condition_detail,
    }
}

/// Sum of the condition coefficients alone.
pub fn condition_score(
    conditions: &[ConditionCode],
    coefficients: &CoefficientTable,
    model: PayerModel,
) -> Score {
    conditions
        .iter()
        .filter_map(|code| coefficients.get(model, code))
        .map(Score)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcc_model::{CategoryCode, InteractionTerm};

    fn coefficients() -> CoefficientTable {
        [
            ("CNA_F90_94".to_string(), 0.797),
            ("CNA_HCC85".to_string(), 0.331),
            ("CNA_HCC18".to_string(), 0.302),
            ("CNA_HCC85_gDiabetesMellit".to_string(), 0.121),
        ]
        .into_iter()
        .collect()
    }

    fn conditions() -> Vec<ConditionCode> {
        vec![
            CategoryCode::from_number(18).into(),
            CategoryCode::from_number(85).into(),
            CategoryCode::from_number(189).into(),
            InteractionTerm::new("HCC85_gDiabetesMellit").into(),
        ]
    }

    #[test]
    fn sums_demographic_and_condition_parts() {
        let result = score(
            &["CNA_F90_94".to_string(), "CNA_OriginallyDisabled_Female".to_string()],
            &conditions(),
            &coefficients(),
            PayerModel::CommunityNonDualAged,
            868.0,
            false,
        );
        assert_eq!(result.demographic_detail.len(), 1);
        assert_eq!(result.condition_detail.len(), 3);
        assert_eq!(result.demographic_score.to_string(), "0.7970");
        assert_eq!(result.condition_score.to_string(), "0.7540");
        assert_eq!(result.total.to_string(), "1.5510");
        assert_eq!(result.premium.to_string(), "1346.27");
    }

    #[test]
    fn verbose_lists_unpriced_conditions_as_zero() {
        let result = score(
            &[],
            &conditions(),
            &coefficients(),
            PayerModel::CommunityNonDualAged,
            868.0,
            true,
        );
        assert_eq!(result.condition_detail.len(), 4);
        assert_eq!(
            result.coefficient_of(CategoryCode::from_number(189).into()),
            Some(Score::ZERO)
        );
        assert_eq!(result.demographic_score, Score::ZERO);
    }

    #[test]
    fn other_models_do_not_share_coefficients() {
        let total = condition_score(&conditions(), &coefficients(), PayerModel::Institutional);
        assert_eq!(total, Score::ZERO);
    }
}
