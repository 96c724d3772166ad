//! Vanshavali Relationship Engine
//!
//! A pure, in-memory family relationship engine over genealogical
//! snapshots: member directories keyed by serial number and directed,
//! labelled relationship edges. The engine validates spouse pairings,
//! nests members into a renderable couple/child hierarchy, resolves
//! direct and multi-hop relationship paths, derives kinship labels
//! from member fields, and assigns render coordinates.
//!
//! # Architecture
//!
//! - `family`: snapshot model with members, edges and their lookup indexes
//! - `quality`: spouse pairing checks with a configurable deny list
//! - `hierarchy`: couple/child tree nesting with cycle protection
//! - `relate`: direct and multi-hop relationship path resolution
//! - `kinship`: catalog relation derivation with localization rules
//! - `layout`: render coordinates for the hierarchy tree
//!
//! Every operation is a synchronous pure function over borrowed
//! snapshots. Genealogical source data is expected to be incomplete;
//! unresolvable references prune silently instead of failing the call.
//!
//! ## Example Usage
//!
//! ```rust
//! use vanshavali::family::{Directory, Gender, Member};
//! use vanshavali::hierarchy::{build_hierarchy, BuildOptions};
//! use vanshavali::quality::SpousePolicy;
//! use vanshavali::SerNo;
//!
//! let directory = Directory::from_members(vec![
//!     Member::new(1)
//!         .with_name("Ganesh", "Pawar")
//!         .with_gender(Gender::Male)
//!         .with_level(1)
//!         .with_spouse(2)
//!         .with_children(vec![3]),
//!     Member::new(2)
//!         .with_name("Mina", "Pawar")
//!         .with_gender(Gender::Female)
//!         .with_level(1)
//!         .with_spouse(1),
//!     Member::new(3)
//!         .with_name("Arun", "Pawar")
//!         .with_gender(Gender::Male)
//!         .with_level(2)
//!         .with_father(1)
//!         .with_mother(2),
//! ])
//! .unwrap();
//!
//! let tree = build_hierarchy(
//!     &directory,
//!     None,
//!     SerNo::new(1),
//!     &SpousePolicy::default(),
//!     &BuildOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(tree.is_couple());
//! assert_eq!(tree.children().len(), 1);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod family;
pub mod hierarchy;
pub mod kinship;
pub mod layout;
pub mod quality;
pub mod relate;

// Re-export main types for convenience
pub use family::{
    Directory, EdgeStore, Gender, Member, RelationshipEdge, SerNo, SnapshotError, SnapshotResult,
};

pub use quality::SpousePolicy;

pub use hierarchy::{build_hierarchy, BuildOptions, HierarchyNode, PersonCard, PrenestedNode};

pub use relate::{
    compare_members, describe_relationship, Connectivity, Hop, RelationshipComparison,
    RelationshipDescription, SearchOptions, SearchStrategy, DEFAULT_MAX_HOPS,
};

pub use kinship::{derive_relations, DerivedRelation, Kinship, RelationRule, RelationRules};

pub use layout::{compute_layout, LayoutConfig, PairSeparation, Position};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
