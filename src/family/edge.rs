//! Directed relationship edges between members
//!
//! An edge records "`to` is `from`'s `<relation>`": a parent points at a
//! child with `Son`/`Daughter`, a child points at a parent with
//! `Father`/`Mother`, partners point at each other with
//! `Husband`/`Wife`/`Spouse`. Edges are directional; nothing guarantees
//! the reverse edge exists, and the engine never synthesizes one.

use super::types::SerNo;
use serde::{Deserialize, Serialize};

/// A directed, labeled relationship edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    pub from_ser_no: SerNo,

    pub to_ser_no: SerNo,

    /// Role of `to` relative to `from` ("Father", "Wife", ...). Free
    /// text in the source data; label checks are case-insensitive.
    pub relation: String,

    /// Localized label carried alongside the English one. Legacy
    /// snapshots name this field `relationMarathi`.
    #[serde(default, alias = "relationMarathi")]
    pub relation_localized: Option<String>,
}

impl RelationshipEdge {
    pub fn new(from: impl Into<SerNo>, to: impl Into<SerNo>, relation: impl Into<String>) -> Self {
        RelationshipEdge {
            from_ser_no: from.into(),
            to_ser_no: to.into(),
            relation: relation.into(),
            relation_localized: None,
        }
    }

    pub fn with_localized(mut self, label: impl Into<String>) -> Self {
        self.relation_localized = Some(label.into());
        self
    }

    /// Partner edge: Husband, Wife or Spouse in any casing
    pub fn is_spousal(&self) -> bool {
        let label = self.relation.trim();
        label.eq_ignore_ascii_case("husband")
            || label.eq_ignore_ascii_case("wife")
            || label.eq_ignore_ascii_case("spouse")
    }

    /// Parent-to-child edge: `to` is the son or daughter of `from`
    pub fn is_child_role(&self) -> bool {
        let label = self.relation.trim();
        label.eq_ignore_ascii_case("son") || label.eq_ignore_ascii_case("daughter")
    }

    /// Child-to-parent edge: `to` is the father or mother of `from`
    pub fn is_parent_role(&self) -> bool {
        let label = self.relation.trim();
        label.eq_ignore_ascii_case("father") || label.eq_ignore_ascii_case("mother")
    }

    /// The endpoint opposite `ser_no`, or `None` when the edge does not
    /// touch it
    pub fn other_endpoint(&self, ser_no: SerNo) -> Option<SerNo> {
        if self.from_ser_no == ser_no {
            Some(self.to_ser_no)
        } else if self.to_ser_no == ser_no {
            Some(self.from_ser_no)
        } else {
            None
        }
    }
}
