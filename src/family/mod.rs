//! Family snapshot data model: members, relationship edges and the
//! read-only indexes the engine traverses

pub mod edge;
pub mod member;
pub mod store;
pub mod types;

pub use edge::RelationshipEdge;
pub use member::Member;
pub use store::{Directory, EdgeStore, SnapshotError, SnapshotResult};
pub use types::{Gender, SerNo};
