//! Code list normalization.
//!
//! Raw lists arrive as individual codes, as one delimited string, or as a
//! mix of both. Normalization splits, canonicalizes, drops codes the version
//! does not know and removes duplicates while keeping first-seen order.

use std::collections::HashSet;
use std::hash::Hash;

use hcc_model::{CategoryCode, DiagnosisCode};
use hcc_standards::VersionTables;
use tracing::trace;

const SEPARATORS: [char; 3] = [',', ';', ':'];

/// Splits every item on commas, semicolons, colons and whitespace.
pub fn split_codes<S: AsRef<str>>(raw: &[S]) -> Vec<&str> {
    raw.iter()
        .flat_map(|item| {
            item.as_ref()
                .split(|c: char| SEPARATORS.contains(&c) || c.is_whitespace())
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Strict category detection: an unsigned integer or an `HCC` prefix.
pub fn looks_like_category(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    token.chars().all(|c| c.is_ascii_digit())
        || token
            .get(..CategoryCode::PREFIX.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(CategoryCode::PREFIX))
}

/// Canonical diagnosis codes without the table filter.
///
/// Used where unknown codes are still reported, e.g. verbose descriptions.
pub fn canonical_diagnoses<S: AsRef<str>>(raw: &[S]) -> Vec<DiagnosisCode> {
    dedup_in_order(
        split_codes(raw)
            .into_iter()
            .filter_map(|token| DiagnosisCode::new(token).ok()),
    )
}

/// Diagnoses present in the version's diagnosis map.
pub fn normalize_diagnoses<S: AsRef<str>>(raw: &[S], tables: &VersionTables) -> Vec<DiagnosisCode> {
    canonical_diagnoses(raw)
        .into_iter()
        .filter(|code| {
            let known = tables.diagnoses.contains_key(code);
            if !known {
                trace!(diagnosis = %code, "dropping unknown diagnosis");
            }
            known
        })
        .collect()
}

/// Categories present in the version's hierarchy.
///
/// Interaction labels and other non-category tokens are dropped here, so
/// derived terms are always recomputed rather than carried over.
pub fn normalize_categories<S: AsRef<str>>(raw: &[S], tables: &VersionTables) -> Vec<CategoryCode> {
    dedup_in_order(split_codes(raw).into_iter().filter_map(|token| {
        match CategoryCode::new(token) {
            Ok(code) if tables.hierarchy.contains(code) => Some(code),
            _ => {
                trace!(category = token, "dropping unknown category");
                None
            }
        }
    }))
}

pub(crate) fn dedup_in_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
