//! Immutable snapshot indexes over members and edges
//!
//! A snapshot is loaded once and then only read. `Directory` indexes
//! members by serial number; `EdgeStore` indexes relationship edges by
//! both endpoints. Both preserve snapshot insertion order, so every
//! traversal over them is deterministic for a given snapshot.

use super::edge::RelationshipEdge;
use super::member::Member;
use super::types::SerNo;
use crate::quality::SpousePolicy;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while assembling a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("duplicate member serNo {0}")]
    DuplicateSerNo(SerNo),

    #[error("member {name:?} has serNo 0; serial numbers start at 1")]
    InvalidSerNo { name: String },

    #[error("malformed snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Read-only member directory keyed by serial number.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    /// SerNo -> Member, in snapshot insertion order
    members: IndexMap<SerNo, Member>,
}

impl Directory {
    /// Index a flat member list.
    ///
    /// Serial numbers must be positive and unique within the snapshot;
    /// everything else (dangling references, blank names, missing
    /// levels) is tolerated and handled at traversal time.
    pub fn from_members(members: Vec<Member>) -> SnapshotResult<Self> {
        let mut index = IndexMap::with_capacity(members.len());
        for member in members {
            if member.ser_no.as_u32() == 0 {
                return Err(SnapshotError::InvalidSerNo {
                    name: member.display_name(),
                });
            }
            if index.contains_key(&member.ser_no) {
                return Err(SnapshotError::DuplicateSerNo(member.ser_no));
            }
            index.insert(member.ser_no, member);
        }
        debug!("indexed {} members", index.len());
        Ok(Directory { members: index })
    }

    /// Deserialize a JSON member array (the snapshot wire format) and
    /// index it
    pub fn from_json_slice(bytes: &[u8]) -> SnapshotResult<Self> {
        let members: Vec<Member> = serde_json::from_slice(bytes)?;
        Self::from_members(members)
    }

    pub fn get(&self, ser_no: SerNo) -> Option<&Member> {
        self.members.get(&ser_no)
    }

    pub fn contains(&self, ser_no: SerNo) -> bool {
        self.members.contains_key(&ser_no)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All members in snapshot order
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Members grouped by generation level, each row ordered ascending
    /// by serial number
    pub fn members_by_level(&self) -> BTreeMap<u32, Vec<&Member>> {
        let mut rows: BTreeMap<u32, Vec<&Member>> = BTreeMap::new();
        for member in self.members.values() {
            rows.entry(member.level).or_default().push(member);
        }
        for row in rows.values_mut() {
            row.sort_by_key(|m| m.ser_no);
        }
        rows
    }

    /// Case-insensitive member search over display name, serial number
    /// and vansh. A blank term matches everyone.
    pub fn search(&self, term: &str) -> Vec<&Member> {
        let query = term.trim().to_lowercase();
        if query.is_empty() {
            return self.members().collect();
        }
        self.members()
            .filter(|m| {
                m.display_name().to_lowercase().contains(&query)
                    || m.ser_no.to_string().contains(&query)
                    || m.vansh
                        .as_deref()
                        .is_some_and(|v| v.to_lowercase().contains(&query))
            })
            .collect()
    }
}

/// Read-only edge list with adjacency indexes on both endpoints.
///
/// Lookups return edges in snapshot insertion order; "first matching
/// edge" is therefore well defined and stable.
#[derive(Debug, Clone, Default)]
pub struct EdgeStore {
    edges: Vec<RelationshipEdge>,

    /// from SerNo -> indexes into `edges`
    outgoing: IndexMap<SerNo, Vec<usize>>,

    /// to SerNo -> indexes into `edges`
    incoming: IndexMap<SerNo, Vec<usize>>,
}

impl EdgeStore {
    /// Index an edge list. Endpoints are not validated against any
    /// directory; dangling edges are legitimate data.
    pub fn from_edges(edges: Vec<RelationshipEdge>) -> Self {
        let mut outgoing: IndexMap<SerNo, Vec<usize>> = IndexMap::new();
        let mut incoming: IndexMap<SerNo, Vec<usize>> = IndexMap::new();
        for (i, edge) in edges.iter().enumerate() {
            outgoing.entry(edge.from_ser_no).or_default().push(i);
            incoming.entry(edge.to_ser_no).or_default().push(i);
        }
        debug!("indexed {} edges", edges.len());
        EdgeStore {
            edges,
            outgoing,
            incoming,
        }
    }

    /// Index an edge list with the spouse pairing policy applied.
    ///
    /// Spousal-labeled edges between two directory members the policy
    /// rejects are dropped before indexing, so the hierarchy builder
    /// and the path resolver read the same corrected snapshot. Edges
    /// with an endpoint missing from the directory pass through
    /// unchecked, like any other dangling edge.
    pub fn from_edges_filtered(
        edges: Vec<RelationshipEdge>,
        directory: &Directory,
        policy: &SpousePolicy,
    ) -> Self {
        let total = edges.len();
        let kept: Vec<RelationshipEdge> = edges
            .into_iter()
            .filter(|edge| {
                if !edge.is_spousal() {
                    return true;
                }
                match (directory.get(edge.from_ser_no), directory.get(edge.to_ser_no)) {
                    (Some(a), Some(b)) => policy.is_valid_pair(a, b),
                    _ => true,
                }
            })
            .collect();
        let dropped = total - kept.len();
        if dropped > 0 {
            debug!("dropped {} spousal edge(s) rejected by the pairing policy", dropped);
        }
        Self::from_edges(kept)
    }

    /// Deserialize a JSON edge array (the snapshot wire format) and
    /// index it
    pub fn from_json_slice(bytes: &[u8]) -> SnapshotResult<Self> {
        let edges: Vec<RelationshipEdge> = serde_json::from_slice(bytes)?;
        Ok(Self::from_edges(edges))
    }

    /// Deserialize a JSON edge array and index it with the pairing
    /// policy applied, as [`from_edges_filtered`](Self::from_edges_filtered)
    pub fn from_json_slice_filtered(
        bytes: &[u8],
        directory: &Directory,
        policy: &SpousePolicy,
    ) -> SnapshotResult<Self> {
        let edges: Vec<RelationshipEdge> = serde_json::from_slice(bytes)?;
        Ok(Self::from_edges_filtered(edges, directory, policy))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> impl Iterator<Item = &RelationshipEdge> {
        self.edges.iter()
    }

    /// Edges leaving `from`, in insertion order
    pub fn outgoing_edges(&self, from: SerNo) -> impl Iterator<Item = &RelationshipEdge> + '_ {
        self.outgoing
            .get(&from)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
    }

    /// Edges arriving at `to`, in insertion order
    pub fn incoming_edges(&self, to: SerNo) -> impl Iterator<Item = &RelationshipEdge> + '_ {
        self.incoming
            .get(&to)
            .into_iter()
            .flatten()
            .map(|&i| &self.edges[i])
    }

    /// First edge `from -> to` in insertion order, if any. The reverse
    /// direction is a separate lookup; one is never derived from the
    /// other.
    pub fn find_direct(&self, from: SerNo, to: SerNo) -> Option<&RelationshipEdge> {
        self.outgoing_edges(from).find(|e| e.to_ser_no == to)
    }

    pub fn has_direct(&self, from: SerNo, to: SerNo) -> bool {
        self.find_direct(from, to).is_some()
    }

    /// Whether a spousal-labeled edge `from -> to` exists
    pub fn has_spousal_edge(&self, from: SerNo, to: SerNo) -> bool {
        self.outgoing_edges(from)
            .any(|e| e.to_ser_no == to && e.is_spousal())
    }

    /// Spouse candidates for a member from spousal-labeled edges in
    /// either direction: outgoing partners first, then incoming,
    /// first occurrence kept
    pub fn spousal_candidates(&self, ser_no: SerNo) -> Vec<SerNo> {
        let mut candidates = Vec::new();
        let outgoing = self
            .outgoing_edges(ser_no)
            .filter(|e| e.is_spousal())
            .map(|e| e.to_ser_no);
        let incoming = self
            .incoming_edges(ser_no)
            .filter(|e| e.is_spousal())
            .map(|e| e.from_ser_no);
        for candidate in outgoing.chain(incoming) {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }

    /// Children of a member as encoded in the edges: targets of
    /// outgoing Son/Daughter edges plus sources of incoming
    /// Father/Mother edges
    pub fn edge_children_of(&self, ser_no: SerNo) -> impl Iterator<Item = SerNo> + '_ {
        let as_parent = self
            .outgoing_edges(ser_no)
            .filter(|e| e.is_child_role())
            .map(|e| e.to_ser_no);
        let inverted = self
            .incoming_edges(ser_no)
            .filter(|e| e.is_parent_role())
            .map(|e| e.from_ser_no);
        as_parent.chain(inverted)
    }

    /// Number of edges touching a member in either direction
    pub fn degree(&self, ser_no: SerNo) -> usize {
        let out = self.outgoing.get(&ser_no).map_or(0, Vec::len);
        let inc = self.incoming.get(&ser_no).map_or(0, Vec::len);
        out + inc
    }

    /// Edge count per relation label, ordered by label
    pub fn relation_type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for edge in &self.edges {
            *counts.entry(edge.relation.clone()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_directory() -> Directory {
        Directory::from_members(vec![
            Member::new(1).with_name("Govind", "Kulkarni").with_level(0),
            Member::new(2)
                .with_name("Radha", "Kulkarni")
                .with_level(0)
                .with_vansh("Moghe"),
            Member::new(5).with_name("Madhav", "Kulkarni").with_level(1),
            Member::new(3).with_name("Keshav", "Kulkarni").with_level(1),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_ser_no_rejected() {
        let err = Directory::from_members(vec![Member::new(4), Member::new(4)]).unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateSerNo(SerNo(4))));
    }

    #[test]
    fn test_zero_ser_no_rejected() {
        let err =
            Directory::from_members(vec![Member::new(0).with_name("Ghost", "Entry")]).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidSerNo { .. }));
    }

    #[test]
    fn test_lookup_and_order() {
        let dir = sample_directory();
        assert_eq!(dir.len(), 4);
        assert!(dir.contains(SerNo::new(5)));
        assert!(dir.get(SerNo::new(99)).is_none());

        // snapshot order, not serNo order
        let order: Vec<SerNo> = dir.members().map(|m| m.ser_no).collect();
        assert_eq!(
            order,
            vec![SerNo::new(1), SerNo::new(2), SerNo::new(5), SerNo::new(3)]
        );
    }

    #[test]
    fn test_members_by_level_rows_sorted() {
        let dir = sample_directory();
        let rows = dir.members_by_level();
        let level1: Vec<SerNo> = rows[&1].iter().map(|m| m.ser_no).collect();
        assert_eq!(level1, vec![SerNo::new(3), SerNo::new(5)]);
    }

    #[test]
    fn test_search() {
        let dir = sample_directory();
        assert_eq!(dir.search("madhav").len(), 1);
        assert_eq!(dir.search("kulkarni").len(), 4);
        assert_eq!(dir.search("moghe").len(), 1);
        assert_eq!(dir.search("5").len(), 1);
        assert_eq!(dir.search("  ").len(), 4);
        assert!(dir.search("nonexistent").is_empty());
    }

    #[test]
    fn test_directory_from_json() {
        let dir = Directory::from_json_slice(br#"[{"serNo": 1}, {"serNo": 2}]"#).unwrap();
        assert_eq!(dir.len(), 2);

        let err = Directory::from_json_slice(b"not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
    }

    fn sample_edges() -> EdgeStore {
        EdgeStore::from_edges(vec![
            RelationshipEdge::new(1, 5, "Son"),
            RelationshipEdge::new(1, 2, "Wife"),
            RelationshipEdge::new(2, 1, "Husband"),
            RelationshipEdge::new(5, 1, "Father"),
            RelationshipEdge::new(3, 1, "Father"),
            RelationshipEdge::new(1, 2, "Spouse"),
        ])
    }

    #[test]
    fn test_find_direct_first_match() {
        let store = sample_edges();
        // two 1->2 edges exist; the first in snapshot order wins
        let edge = store.find_direct(SerNo::new(1), SerNo::new(2)).unwrap();
        assert_eq!(edge.relation, "Wife");

        assert!(store.find_direct(SerNo::new(5), SerNo::new(2)).is_none());
    }

    #[test]
    fn test_filtered_assembly_drops_rejected_spousal_edges() {
        let dir = Directory::from_members(vec![
            Member::new(2).with_name("Radha", "Kulkarni"),
            Member::new(3).with_name("Keshav", "Kulkarni"),
            Member::new(7).with_father(1),
            Member::new(8).with_father(1),
            Member::new(19),
            Member::new(20),
        ])
        .unwrap();
        let store = EdgeStore::from_edges_filtered(
            vec![
                RelationshipEdge::new(3, 2, "Wife"),
                RelationshipEdge::new(7, 8, "Spouse"),
                RelationshipEdge::new(7, 8, "Brother"),
                RelationshipEdge::new(19, 20, "Spouse"),
                RelationshipEdge::new(50, 60, "Husband"),
            ],
            &dir,
            &SpousePolicy::default(),
        );

        assert_eq!(store.len(), 3);
        // siblings by father: the spousal edge goes, the sibling edge stays
        assert_eq!(
            store
                .find_direct(SerNo::new(7), SerNo::new(8))
                .map(|e| e.relation.as_str()),
            Some("Brother")
        );
        // denied pair under the default policy
        assert!(store.find_direct(SerNo::new(19), SerNo::new(20)).is_none());
        // valid couple and dangling endpoints pass through
        assert!(store.has_spousal_edge(SerNo::new(3), SerNo::new(2)));
        assert!(store.has_spousal_edge(SerNo::new(50), SerNo::new(60)));
    }

    #[test]
    fn test_adjacency_order() {
        let store = sample_edges();
        let from_one: Vec<&str> = store
            .outgoing_edges(SerNo::new(1))
            .map(|e| e.relation.as_str())
            .collect();
        assert_eq!(from_one, vec!["Son", "Wife", "Spouse"]);

        let to_one: Vec<SerNo> = store
            .incoming_edges(SerNo::new(1))
            .map(|e| e.from_ser_no)
            .collect();
        assert_eq!(to_one, vec![SerNo::new(2), SerNo::new(5), SerNo::new(3)]);
    }

    #[test]
    fn test_spousal_candidates_and_reciprocation() {
        let store = sample_edges();
        assert_eq!(store.spousal_candidates(SerNo::new(1)), vec![SerNo::new(2)]);
        assert!(store.has_spousal_edge(SerNo::new(1), SerNo::new(2)));
        assert!(store.has_spousal_edge(SerNo::new(2), SerNo::new(1)));
        assert!(!store.has_spousal_edge(SerNo::new(1), SerNo::new(5)));
    }

    #[test]
    fn test_edge_children_union() {
        let store = sample_edges();
        // 5 via outgoing Son edge, 5 and 3 via incoming Father edges
        let children: Vec<SerNo> = store.edge_children_of(SerNo::new(1)).collect();
        assert_eq!(children, vec![SerNo::new(5), SerNo::new(5), SerNo::new(3)]);
    }

    #[test]
    fn test_degree_and_type_counts() {
        let store = sample_edges();
        assert_eq!(store.degree(SerNo::new(1)), 6);
        assert_eq!(store.degree(SerNo::new(3)), 1);
        assert_eq!(store.degree(SerNo::new(42)), 0);

        let counts = store.relation_type_counts();
        assert_eq!(counts["Father"], 2);
        assert_eq!(counts["Wife"], 1);
        assert_eq!(counts.len(), 5);
    }
}
