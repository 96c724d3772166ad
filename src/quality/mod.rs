//! Data-quality guard for spouse pairings
//!
//! Source snapshots carry miscoded spouse references: sibling records
//! that point at each other as spouses, and a handful of specific pairs
//! known to be wrong in the data. The guard is a pure predicate applied
//! at two points: the hierarchy builder consults it before pairing, and
//! snapshot assembly drops spousal edges it rejects
//! (`EdgeStore::from_edges_filtered`), so a correction applied here
//! holds across the tree and relationship search alike.

use crate::family::{Member, SerNo};
use serde::{Deserialize, Serialize};

/// Spouse-pairing policy: structural sibling rejection plus a
/// configurable deny-list of known-bad pairs.
///
/// The structural rules are fixed: two members sharing a recorded
/// father, or a recorded mother, are siblings and never a valid couple.
/// The deny-list is data correction, not structure, and is meant to be
/// loaded or extended alongside the snapshot. Pairs are
/// order-insensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpousePolicy {
    #[serde(default)]
    denied_pairs: Vec<(SerNo, SerNo)>,
}

impl Default for SpousePolicy {
    /// The shipped policy carries the deny-list entries for records
    /// known to be miscoded in the source data.
    fn default() -> Self {
        SpousePolicy {
            denied_pairs: vec![(SerNo::new(19), SerNo::new(20))],
        }
    }
}

impl SpousePolicy {
    /// Policy with an empty deny-list; only the structural sibling
    /// rules apply
    pub fn permissive() -> Self {
        SpousePolicy {
            denied_pairs: Vec::new(),
        }
    }

    /// Add a denied pair (order does not matter)
    pub fn deny(mut self, a: impl Into<SerNo>, b: impl Into<SerNo>) -> Self {
        self.denied_pairs.push((a.into(), b.into()));
        self
    }

    pub fn is_denied(&self, a: SerNo, b: SerNo) -> bool {
        self.denied_pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Whether two members may be rendered as a couple.
    ///
    /// Rejects the pair when both record the same father, when both
    /// record the same mother, or when the pair is on the deny-list.
    /// A parent reference missing on either side never matches.
    pub fn is_valid_pair(&self, a: &Member, b: &Member) -> bool {
        let same_father = a
            .father_ser_no
            .zip(b.father_ser_no)
            .is_some_and(|(x, y)| x == y);
        let same_mother = a
            .mother_ser_no
            .zip(b.mother_ser_no)
            .is_some_and(|(x, y)| x == y);
        if same_father || same_mother {
            return false;
        }
        !self.is_denied(a.ser_no, b.ser_no)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_siblings_via_father_rejected() {
        let policy = SpousePolicy::permissive();
        let a = Member::new(10).with_father(1);
        let b = Member::new(11).with_father(1);
        assert!(!policy.is_valid_pair(&a, &b));
    }

    #[test]
    fn test_siblings_via_mother_rejected() {
        let policy = SpousePolicy::permissive();
        let a = Member::new(10).with_mother(2);
        let b = Member::new(11).with_mother(2);
        assert!(!policy.is_valid_pair(&a, &b));
        assert!(!policy.is_valid_pair(&b, &a));
    }

    #[test]
    fn test_missing_parent_reference_never_matches() {
        let policy = SpousePolicy::permissive();
        let a = Member::new(10).with_father(1);
        let b = Member::new(11);
        assert!(policy.is_valid_pair(&a, &b));

        let c = Member::new(12).with_father(3).with_mother(4);
        let d = Member::new(13).with_father(5).with_mother(6);
        assert!(policy.is_valid_pair(&c, &d));
    }

    #[test]
    fn test_default_deny_list_both_orders() {
        let policy = SpousePolicy::default();
        let a = Member::new(19);
        let b = Member::new(20);
        assert!(!policy.is_valid_pair(&a, &b));
        assert!(!policy.is_valid_pair(&b, &a));

        // same records pass once the deny-list entry is absent
        assert!(SpousePolicy::permissive().is_valid_pair(&a, &b));
    }

    #[test]
    fn test_custom_deny_entry() {
        let policy = SpousePolicy::permissive().deny(7, 8);
        assert!(policy.is_denied(SerNo::new(8), SerNo::new(7)));
        assert!(!policy.is_denied(SerNo::new(7), SerNo::new(9)));
    }

    #[test]
    fn test_policy_loads_from_config_json() {
        let policy: SpousePolicy =
            serde_json::from_str(r#"{"deniedPairs": [[19, 20], [31, 44]]}"#).unwrap();
        assert!(policy.is_denied(SerNo::new(44), SerNo::new(31)));
        assert!(policy.is_denied(SerNo::new(19), SerNo::new(20)));
    }
}
