//! Category hierarchy for one model version.
//!
//! Nodes live in an arena and refer to each other through [`CategoryId`]
//! handles, so parent and child links can both be walked without reference
//! cycles. Child lists are taken from the table as given; CMS lists every
//! trumped descendant directly, not only the next level down.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use hcc_model::{CategoryCode, ModelVersion};
use serde::Serialize;

use crate::error::StandardsError;

/// Handle to a node inside one [`CategoryHierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryId(usize);

#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub code: CategoryCode,
    pub description: String,
    pub parents: Vec<CategoryId>,
    pub children: Vec<CategoryId>,
}

/// A category whose parent or child link is not mirrored on the other side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct HierarchyViolation {
    pub category: CategoryCode,
    /// `"parent"` or `"child"`, the relation as listed on `category`.
    pub relation: &'static str,
    pub related: CategoryCode,
}

/// Raw category record before links are resolved.
#[derive(Debug, Clone, Default)]
pub struct CategoryRecord {
    pub description: String,
    pub parents: Vec<CategoryCode>,
    pub children: Vec<CategoryCode>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryHierarchy {
    nodes: Vec<HierarchyNode>,
    index: HashMap<CategoryCode, CategoryId>,
}

impl CategoryHierarchy {
    /// Builds the arena. Every listed parent or child must itself be a
    /// category of the same version.
    pub fn from_records(
        version: ModelVersion,
        records: BTreeMap<CategoryCode, CategoryRecord>,
    ) -> Result<Self, StandardsError> {
        let index: HashMap<CategoryCode, CategoryId> = records
            .keys()
            .enumerate()
            .map(|(slot, code)| (*code, CategoryId(slot)))
            .collect();

        let resolve = |category: CategoryCode,
                       relation: &'static str,
                       links: &[CategoryCode]|
         -> Result<Vec<CategoryId>, StandardsError> {
            links
                .iter()
                .map(|reference| {
                    index
                        .get(reference)
                        .copied()
                        .ok_or(StandardsError::DanglingReference {
                            version,
                            category,
                            relation,
                            reference: *reference,
                        })
                })
                .collect()
        };

        let mut nodes = Vec::with_capacity(records.len());
        for (code, record) in &records {
            let parents = resolve(*code, "parent", &record.parents)?;
            let children = resolve(*code, "child", &record.children)?;
            nodes.push(HierarchyNode {
                code: *code,
                description: record.description.clone(),
                parents,
                children,
            });
        }

        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, code: CategoryCode) -> bool {
        self.index.contains_key(&code)
    }

    pub fn id_of(&self, code: CategoryCode) -> Option<CategoryId> {
        self.index.get(&code).copied()
    }

    pub fn node(&self, id: CategoryId) -> &HierarchyNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, code: CategoryCode) -> Option<&HierarchyNode> {
        self.id_of(code).map(|id| self.node(id))
    }

    pub fn description(&self, code: CategoryCode) -> Option<&str> {
        self.get(code).map(|node| node.description.as_str())
    }

    /// All categories in numeric order.
    pub fn codes(&self) -> impl Iterator<Item = CategoryCode> + '_ {
        self.nodes.iter().map(|node| node.code)
    }

    /// Direct children of `code`. Empty for unknown codes.
    pub fn children(&self, code: CategoryCode) -> Vec<CategoryCode> {
        self.linked(code, |node| &node.children)
    }

    /// Direct parents of `code`. Empty for unknown codes.
    pub fn parents(&self, code: CategoryCode) -> Vec<CategoryCode> {
        self.linked(code, |node| &node.parents)
    }

    /// Union of the children of every code in `codes`.
    pub fn children_of_all<I>(&self, codes: I) -> BTreeSet<CategoryCode>
    where
        I: IntoIterator<Item = CategoryCode>,
    {
        codes.into_iter().flat_map(|code| self.children(code)).collect()
    }

    /// Union of the parents of every code in `codes`.
    pub fn parents_of_all<I>(&self, codes: I) -> BTreeSet<CategoryCode>
    where
        I: IntoIterator<Item = CategoryCode>,
    {
        codes.into_iter().flat_map(|code| self.parents(code)).collect()
    }

    /// Links that are not mirrored: `P` lists `C` as child but `C` does not
    /// list `P` as parent, or the other way round.
    pub fn inverse_violations(&self) -> Vec<HierarchyViolation> {
        let mut violations = Vec::new();
        for node in &self.nodes {
            let own = self.index[&node.code];
            for parent in &node.parents {
                if !self.node(*parent).children.contains(&own) {
                    violations.push(HierarchyViolation {
                        category: node.code,
                        relation: "parent",
                        related: self.node(*parent).code,
                    });
                }
            }
            for child in &node.children {
                if !self.node(*child).parents.contains(&own) {
                    violations.push(HierarchyViolation {
                        category: node.code,
                        relation: "child",
                        related: self.node(*child).code,
                    });
                }
            }
        }
        violations.sort();
        violations
    }

    fn linked(
        &self,
        code: CategoryCode,
        links: impl Fn(&HierarchyNode) -> &Vec<CategoryId>,
    ) -> Vec<CategoryCode> {
        self.get(code)
            .map(|node| links(node).iter().map(|id| self.node(*id).code).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(n: u16) -> CategoryCode {
        CategoryCode::from_number(n)
    }

    fn record(parents: &[u16], children: &[u16]) -> CategoryRecord {
        CategoryRecord {
            description: String::new(),
            parents: parents.iter().copied().map(code).collect(),
            children: children.iter().copied().map(code).collect(),
        }
    }

    #[test]
    fn walks_both_directions() {
        let records = BTreeMap::from([
            (code(17), record(&[], &[18, 19])),
            (code(18), record(&[17], &[19])),
            (code(19), record(&[17, 18], &[])),
        ]);
        let hierarchy = CategoryHierarchy::from_records(ModelVersion::V23, records).unwrap();

        assert_eq!(hierarchy.children(code(17)), vec![code(18), code(19)]);
        assert_eq!(hierarchy.parents(code(19)), vec![code(17), code(18)]);
        assert!(hierarchy.children(code(99)).is_empty());
        assert_eq!(
            hierarchy.children_of_all([code(17), code(18)]),
            BTreeSet::from([code(18), code(19)])
        );
        assert!(hierarchy.inverse_violations().is_empty());
    }

    #[test]
    fn reports_unmirrored_links() {
        let records = BTreeMap::from([
            (code(8), record(&[], &[9])),
            (code(9), record(&[], &[])),
        ]);
        let hierarchy = CategoryHierarchy::from_records(ModelVersion::V22, records).unwrap();
        assert_eq!(
            hierarchy.inverse_violations(),
            vec![HierarchyViolation {
                category: code(8),
                relation: "child",
                related: code(9),
            }]
        );
    }

    #[test]
    fn rejects_dangling_links() {
        let records = BTreeMap::from([(code(8), record(&[], &[9]))]);
        let err = CategoryHierarchy::from_records(ModelVersion::V22, records).unwrap_err();
        assert!(matches!(
            err,
            StandardsError::DanglingReference { relation: "child", .. }
        ));
    }
}
