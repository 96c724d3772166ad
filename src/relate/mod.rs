//! Pairwise relationship resolution
//!
//! Answers "how is A related to B" from the edge store alone. A direct
//! edge is reported as recorded; when none exists, a bounded graph
//! search looks for an indirect chain of edges. Direction matters
//! throughout: `a -> b` and `b -> a` are independent lookups, and a
//! missing reverse edge is reported as missing, never synthesized from
//! its counterpart.
//!
//! Pairing corrections live in snapshot assembly, not here: build the
//! store with [`EdgeStore::from_edges_filtered`] and a spousal edge the
//! policy rejects is absent from this view and the hierarchy alike.
//!
//! Exhausting the hop budget without a hit is a normal outcome, not an
//! error: family data routinely contains pairs with no recorded
//! connection.

use crate::family::{EdgeStore, RelationshipEdge, SerNo};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;

/// Default hop budget for indirect search
pub const DEFAULT_MAX_HOPS: usize = 3;

/// One step of an indirect relationship path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hop {
    pub from: SerNo,
    pub to: SerNo,
    pub relation: String,
}

impl Hop {
    fn from_edge(edge: &RelationshipEdge) -> Self {
        Hop {
            from: edge.from_ser_no,
            to: edge.to_ser_no,
            relation: edge.relation.clone(),
        }
    }
}

/// Traversal strategy for indirect search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// First path found by depth-first expansion in snapshot edge
    /// order. The historical behavior: which path wins depends on edge
    /// insertion order, but is stable for a given snapshot.
    #[default]
    DepthFirst,
    /// Shortest path by hop count, ties broken by snapshot edge order
    BreadthFirst,
}

/// Search knobs. `max_hops` bounds the length of a returned path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    #[serde(default)]
    pub strategy: SearchStrategy,
}

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            max_hops: DEFAULT_MAX_HOPS,
            strategy: SearchStrategy::default(),
        }
    }
}

/// How one member relates to another, in one direction.
///
/// `direct` and `path` are never both set: the search only runs when no
/// direct edge exists. Both `None` means nothing was found within the
/// hop budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDescription {
    /// First direct edge `from -> to` in snapshot order, when recorded
    pub direct: Option<RelationshipEdge>,

    /// Indirect chain of edges within the hop budget
    pub path: Option<Vec<Hop>>,
}

impl RelationshipDescription {
    pub fn is_related(&self) -> bool {
        self.direct.is_some() || self.path.is_some()
    }
}

/// Resolve the relationship `from -> to`.
///
/// Purely functional: the visited bookkeeping is copied per branch, so
/// concurrent calls over a shared store are safe and repeated calls
/// return identical results.
pub fn describe_relationship(
    edges: &EdgeStore,
    from: SerNo,
    to: SerNo,
    options: &SearchOptions,
) -> RelationshipDescription {
    if let Some(edge) = edges.find_direct(from, to) {
        return RelationshipDescription {
            direct: Some(edge.clone()),
            path: None,
        };
    }

    let path = match options.strategy {
        SearchStrategy::DepthFirst => {
            depth_first_path(edges, from, to, &FxHashSet::default(), &[], options.max_hops)
        }
        SearchStrategy::BreadthFirst => breadth_first_path(edges, from, to, options.max_hops),
    };
    if path.is_none() {
        debug!(
            "no relationship from {} to {} within {} hops",
            from, to, options.max_hops
        );
    }
    RelationshipDescription { direct: None, path }
}

/// Both directions of a pairwise relationship query. Relation labels
/// are asymmetric (A is B's father while B is A's son), so callers
/// always get both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipComparison {
    pub a_to_b: RelationshipDescription,
    pub b_to_a: RelationshipDescription,
}

pub fn compare_members(
    edges: &EdgeStore,
    a: SerNo,
    b: SerNo,
    options: &SearchOptions,
) -> RelationshipComparison {
    RelationshipComparison {
        a_to_b: describe_relationship(edges, a, b, options),
        b_to_a: describe_relationship(edges, b, a, options),
    }
}

/// Summary of how a pair is connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// Direct edges recorded in both directions
    MutualDirect,
    /// A direct edge in exactly one direction
    OneWayDirect,
    /// Only indirect paths within the hop budget
    Indirect,
    /// Nothing found within the hop budget
    Unrelated,
}

impl RelationshipComparison {
    pub fn connectivity(&self) -> Connectivity {
        match (self.a_to_b.direct.is_some(), self.b_to_a.direct.is_some()) {
            (true, true) => Connectivity::MutualDirect,
            (true, false) | (false, true) => Connectivity::OneWayDirect,
            (false, false) => {
                if self.a_to_b.path.is_some() || self.b_to_a.path.is_some() {
                    Connectivity::Indirect
                } else {
                    Connectivity::Unrelated
                }
            }
        }
    }
}

/// Depth-first search with an exact hop budget.
///
/// Each call clones the incoming visited set before marking itself, so
/// sibling branches never observe each other's marks. `remaining` is
/// always `max_hops - path.len()`; the final direct probe consumes one
/// hop like any other expansion.
fn depth_first_path(
    edges: &EdgeStore,
    from: SerNo,
    to: SerNo,
    visited: &FxHashSet<SerNo>,
    path: &[Hop],
    remaining: usize,
) -> Option<Vec<Hop>> {
    if remaining == 0 || visited.contains(&from) {
        return None;
    }
    let mut visited = visited.clone();
    visited.insert(from);

    if let Some(edge) = edges.find_direct(from, to) {
        let mut found = path.to_vec();
        found.push(Hop::from_edge(edge));
        return Some(found);
    }

    for edge in edges.outgoing_edges(from) {
        let next = edge.to_ser_no;
        if visited.contains(&next) {
            continue;
        }
        let mut extended = path.to_vec();
        extended.push(Hop::from_edge(edge));
        if let Some(found) = depth_first_path(edges, next, to, &visited, &extended, remaining - 1) {
            return Some(found);
        }
    }
    None
}

/// Breadth-first shortest path within the hop budget
fn breadth_first_path(
    edges: &EdgeStore,
    from: SerNo,
    to: SerNo,
    max_hops: usize,
) -> Option<Vec<Hop>> {
    if max_hops == 0 {
        return None;
    }
    let mut queue = VecDeque::new();
    let mut parent: FxHashMap<SerNo, (SerNo, String)> = FxHashMap::default();
    let mut depth: FxHashMap<SerNo, usize> = FxHashMap::default();
    queue.push_back(from);
    depth.insert(from, 0);

    while let Some(current) = queue.pop_front() {
        if current == to && parent.contains_key(&current) {
            let mut hops = Vec::new();
            let mut node = current;
            while let Some((prev, relation)) = parent.get(&node) {
                hops.push(Hop {
                    from: *prev,
                    to: node,
                    relation: relation.clone(),
                });
                node = *prev;
            }
            hops.reverse();
            return Some(hops);
        }

        let current_depth = depth[&current];
        if current_depth == max_hops {
            continue;
        }
        for edge in edges.outgoing_edges(current) {
            let next = edge.to_ser_no;
            if !depth.contains_key(&next) {
                depth.insert(next, current_depth + 1);
                parent.insert(next, (current, edge.relation.clone()));
                queue.push_back(next);
            }
        }
    }
    None
}
