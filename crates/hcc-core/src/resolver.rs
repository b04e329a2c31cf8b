//! Decides whether a member's condition list holds categories or diagnoses.

use hcc_model::{CategoryCode, DiagnosisCode, InputKind};
use hcc_standards::VersionTables;
use tracing::debug;

use crate::mapper::map_diagnoses;
use crate::normalize::{
    canonical_diagnoses, dedup_in_order, looks_like_category, normalize_categories,
    normalize_diagnoses, split_codes,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedConditions {
    /// Known categories, literal ones first, then those mapped from any
    /// diagnoses mixed into the list.
    Categories(Vec<CategoryCode>),
    /// Canonical diagnoses, still unfiltered; mapping happens downstream.
    Diagnoses(Vec<DiagnosisCode>),
}

impl ResolvedConditions {
    pub fn kind(&self) -> InputKind {
        match self {
            ResolvedConditions::Categories(_) => InputKind::Category,
            ResolvedConditions::Diagnoses(_) => InputKind::Diagnosis,
        }
    }
}

/// Classifies each token as category-like (an integer or `HCC` prefix) or a
/// diagnosis. One category-like token, or `force_categories`, switches the
/// whole list to category mode.
pub fn resolve<S: AsRef<str>>(
    raw: &[S],
    tables: &VersionTables,
    force_categories: bool,
) -> ResolvedConditions {
    let (category_tokens, diagnosis_tokens): (Vec<&str>, Vec<&str>) = split_codes(raw)
        .into_iter()
        .partition(|token| looks_like_category(token));

    if category_tokens.is_empty() && !force_categories {
        debug!(tokens = diagnosis_tokens.len(), "resolved as diagnosis input");
        return ResolvedConditions::Diagnoses(canonical_diagnoses(&diagnosis_tokens));
    }

    let literal = normalize_categories(&category_tokens, tables);
    let diagnoses = normalize_diagnoses(&diagnosis_tokens, tables);
    let mapped = map_diagnoses(&diagnoses, tables, None, false).categories();
    let categories = dedup_in_order(literal.into_iter().chain(mapped));
    debug!(categories = categories.len(), "resolved as category input");
    ResolvedConditions::Categories(categories)
}
