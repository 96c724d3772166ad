//! Couple-paired hierarchy builder
//!
//! Turns the flat member directory into a rooted tree where married
//! partners occupy one node and children hang under the couple. The
//! source data is redundant and inconsistent: both partners usually
//! list the same children, spouse references may be missing on one
//! side, child lists may name ids that do not exist, and nothing stops
//! a snapshot from encoding a cycle. The builder reconciles all of
//! that with a visited set, the spouse-pairing guard and a
//! dedup-and-sort child merge, and always terminates.
//!
//! Two input shapes are supported: the flat directory (built here) and
//! a pre-nested tree produced by an external endpoint
//! ([`PrenestedNode`]), which converts losslessly.

use crate::family::{member, Directory, EdgeStore, Gender, Member, SerNo};
use crate::quality::SpousePolicy;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Display attributes for one person in the rendered tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonCard {
    pub ser_no: SerNo,

    pub full_name: String,

    pub gender: Gender,

    /// Generation level when the source carried one; pre-nested spouse
    /// cards arrive without it
    #[serde(default)]
    pub level: Option<u32>,

    #[serde(default)]
    pub vansh: Option<String>,

    #[serde(default)]
    pub profile_image: Option<String>,
}

impl PersonCard {
    pub fn from_member(member: &Member) -> Self {
        PersonCard {
            ser_no: member.ser_no,
            full_name: member.display_name(),
            gender: member.gender,
            level: Some(member.level),
            vansh: normalize(member.vansh.as_deref()),
            profile_image: normalize(member.profile_image.as_deref()),
        }
    }
}

/// Blank strings in the source data mean "absent"
fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One node of the rendered tree: a person alone or a married couple,
/// with the merged child nodes beneath them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HierarchyNode {
    Single {
        person: PersonCard,
        children: Vec<HierarchyNode>,
    },
    Couple {
        primary: PersonCard,
        spouse: PersonCard,
        children: Vec<HierarchyNode>,
    },
}

impl HierarchyNode {
    /// Serial number of the primary person
    pub fn ser_no(&self) -> SerNo {
        self.person().ser_no
    }

    pub fn person(&self) -> &PersonCard {
        match self {
            HierarchyNode::Single { person, .. } => person,
            HierarchyNode::Couple { primary, .. } => primary,
        }
    }

    pub fn spouse(&self) -> Option<&PersonCard> {
        match self {
            HierarchyNode::Single { .. } => None,
            HierarchyNode::Couple { spouse, .. } => Some(spouse),
        }
    }

    pub fn children(&self) -> &[HierarchyNode] {
        match self {
            HierarchyNode::Single { children, .. } => children,
            HierarchyNode::Couple { children, .. } => children,
        }
    }

    pub fn is_couple(&self) -> bool {
        matches!(self, HierarchyNode::Couple { .. })
    }

    /// Number of tree nodes (couples count once)
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(HierarchyNode::node_count).sum::<usize>()
    }

    /// Visit every person card with its tree depth (root = 1); couples
    /// yield the primary card first, then the spouse
    pub fn for_each_card<F: FnMut(&PersonCard, usize)>(&self, mut f: F) {
        self.visit_cards(&mut f, 1);
    }

    fn visit_cards<F: FnMut(&PersonCard, usize)>(&self, f: &mut F, depth: usize) {
        f(self.person(), depth);
        if let Some(spouse) = self.spouse() {
            f(spouse, depth);
        }
        for child in self.children() {
            child.visit_cards(f, depth + 1);
        }
    }

    /// Serial numbers of every person in the tree, in visit order
    pub fn card_ser_nos(&self) -> Vec<SerNo> {
        let mut out = Vec::new();
        self.for_each_card(|card, _| out.push(card.ser_no));
        out
    }

    pub fn contains(&self, ser_no: SerNo) -> bool {
        let mut found = false;
        self.for_each_card(|card, _| found |= card.ser_no == ser_no);
        found
    }
}

/// Builder knobs. `max_depth` counts generations including the root;
/// `None` leaves the tree unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl BuildOptions {
    pub fn with_max_depth(depth: usize) -> Self {
        BuildOptions {
            max_depth: Some(depth),
        }
    }
}

/// Build the couple-paired tree rooted at `root`.
///
/// Returns `None` when the root itself is unknown. Every other data
/// problem is absorbed: unknown or repeated ids are pruned silently,
/// pairings the policy rejects render the member alone, cyclic
/// references terminate at the visited set.
///
/// When an [`EdgeStore`] is supplied it contributes spouse fallbacks
/// (for members without a usable `spouse_ser_no`) and edge-encoded
/// children; with `None`, only the embedded member fields are used.
///
/// The output is a pure function of the inputs: rebuilding from the
/// same snapshot yields a structurally identical tree, and child rows
/// are always ordered ascending by serial number.
pub fn build_hierarchy(
    directory: &Directory,
    edges: Option<&EdgeStore>,
    root: SerNo,
    policy: &SpousePolicy,
    options: &BuildOptions,
) -> Option<HierarchyNode> {
    let mut builder = Builder {
        directory,
        edges,
        policy,
        max_depth: options.max_depth,
        visited: FxHashSet::default(),
    };
    builder.build(root, 1)
}

struct Builder<'a> {
    directory: &'a Directory,
    edges: Option<&'a EdgeStore>,
    policy: &'a SpousePolicy,
    max_depth: Option<usize>,
    visited: FxHashSet<SerNo>,
}

impl<'a> Builder<'a> {
    fn build(&mut self, ser_no: SerNo, depth: usize) -> Option<HierarchyNode> {
        if let Some(max) = self.max_depth {
            if depth > max {
                return None;
            }
        }
        let member = match self.directory.get(ser_no) {
            Some(member) => member,
            None => {
                debug!("pruning unknown serNo {}", ser_no);
                return None;
            }
        };
        if self.visited.contains(&ser_no) {
            warn!("serNo {} already placed; skipping repeated expansion", ser_no);
            return None;
        }
        self.visited.insert(ser_no);

        let spouse = self.resolve_spouse(member);
        if let Some(spouse) = spouse {
            self.visited.insert(spouse.ser_no);
        }

        // Union of both partners' child lists, deduplicated, ascending
        let mut child_ids: BTreeSet<SerNo> = member.children_ser_nos.iter().copied().collect();
        if let Some(spouse) = spouse {
            child_ids.extend(spouse.children_ser_nos.iter().copied());
        }
        if let Some(store) = self.edges {
            child_ids.extend(store.edge_children_of(ser_no));
            if let Some(spouse) = spouse {
                child_ids.extend(store.edge_children_of(spouse.ser_no));
            }
        }

        let mut children = Vec::new();
        for child_id in child_ids {
            if let Some(node) = self.build(child_id, depth + 1) {
                children.push(node);
            }
        }

        Some(match spouse {
            Some(spouse) => HierarchyNode::Couple {
                primary: PersonCard::from_member(member),
                spouse: PersonCard::from_member(spouse),
                children,
            },
            None => HierarchyNode::Single {
                person: PersonCard::from_member(member),
                children,
            },
        })
    }

    /// Resolve the partner to pair with `member`, if any.
    ///
    /// The explicit `spouse_ser_no` wins when it resolves in the
    /// directory. Otherwise spousal-labeled edges supply candidates,
    /// preferring one linked in both directions. A candidate that is
    /// already placed in the tree or that the policy rejects leaves the
    /// member unpaired.
    fn resolve_spouse(&self, member: &Member) -> Option<&'a Member> {
        let candidate = self.spouse_candidate(member)?;
        if self.visited.contains(&candidate.ser_no) {
            debug!(
                "spouse {} already placed; leaving {} unpaired",
                candidate.ser_no, member.ser_no
            );
            return None;
        }
        if !self.policy.is_valid_pair(member, candidate) {
            debug!(
                "pairing {} with {} rejected by policy",
                member.ser_no, candidate.ser_no
            );
            return None;
        }
        Some(candidate)
    }

    fn spouse_candidate(&self, member: &Member) -> Option<&'a Member> {
        if let Some(ser_no) = member.spouse_ser_no {
            if let Some(spouse) = self.directory.get(ser_no) {
                return Some(spouse);
            }
        }
        let store = self.edges?;
        let candidates = store.spousal_candidates(member.ser_no);
        let chosen = candidates
            .iter()
            .copied()
            .find(|&other| {
                store.has_spousal_edge(member.ser_no, other)
                    && store.has_spousal_edge(other, member.ser_no)
            })
            .or_else(|| candidates.first().copied())?;
        self.directory.get(chosen)
    }
}

/// Tree node as an external tree endpoint ships it: full member-style
/// fields with a nested spouse card and child array. Deserializes from
/// the endpoint's camelCase JSON and converts into [`HierarchyNode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrenestedNode {
    pub ser_no: SerNo,

    /// Precomposed name; when absent the name parts below are joined
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub middle_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub gender: Gender,

    #[serde(default)]
    pub level: Option<u32>,

    #[serde(default)]
    pub vansh: Option<String>,

    #[serde(default)]
    pub profile_image: Option<String>,

    /// Spouse card; carries no nested children in the wire shape
    #[serde(default)]
    pub spouse: Option<Box<PrenestedNode>>,

    #[serde(default)]
    pub children: Vec<PrenestedNode>,
}

impl PrenestedNode {
    pub fn from_json_slice(bytes: &[u8]) -> crate::family::SnapshotResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn card(&self) -> PersonCard {
        let full_name = match normalize(self.full_name.as_deref()) {
            Some(name) => name,
            None => member::join_name_parts(&self.first_name, &self.middle_name, &self.last_name),
        };
        PersonCard {
            ser_no: self.ser_no,
            full_name,
            gender: self.gender,
            level: self.level,
            vansh: normalize(self.vansh.as_deref()),
            profile_image: normalize(self.profile_image.as_deref()),
        }
    }
}

impl From<PrenestedNode> for HierarchyNode {
    fn from(node: PrenestedNode) -> Self {
        let person = node.card();
        let spouse = node.spouse.as_deref().map(PrenestedNode::card);
        let children = node
            .children
            .into_iter()
            .map(HierarchyNode::from)
            .collect();
        match spouse {
            Some(spouse) => HierarchyNode::Couple {
                primary: person,
                spouse,
                children,
            },
            None => HierarchyNode::Single {
                person,
                children,
            },
        }
    }
}
