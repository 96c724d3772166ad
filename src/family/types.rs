//! Core type definitions for the family graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Serial number: the unique positive identifier a member carries in the
/// source records. All cross-references between records (father, mother,
/// spouse, children, edge endpoints) are expressed as serial numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct SerNo(pub u32);

impl SerNo {
    pub fn new(id: u32) -> Self {
        SerNo(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SerNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SerNo {
    fn from(id: u32) -> Self {
        SerNo(id)
    }
}

/// Gender as recorded in the source data.
///
/// Label selection in kinship derivation keys on exactly `Male`; every
/// other value (including `Unknown`) selects the female-form label,
/// matching the source records' convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Gender {
    pub fn is_male(&self) -> bool {
        matches!(self, Gender::Male)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
            Gender::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ser_no() {
        let id = SerNo::new(42);
        assert_eq!(id.as_u32(), 42);
        assert_eq!(format!("{}", id), "42");

        let id2: SerNo = 100.into();
        assert_eq!(id2.as_u32(), 100);
    }

    #[test]
    fn test_ser_no_ordering() {
        let id1 = SerNo::new(1);
        let id2 = SerNo::new(2);
        assert!(id1 < id2);
    }

    #[test]
    fn test_gender_default_is_unknown() {
        assert_eq!(Gender::default(), Gender::Unknown);
        assert!(!Gender::default().is_male());
    }

    #[test]
    fn test_gender_deserialize_unrecognized() {
        let g: Gender = serde_json::from_str("\"Male\"").unwrap();
        assert!(g.is_male());
        let g: Gender = serde_json::from_str("\"Other\"").unwrap();
        assert_eq!(g, Gender::Unknown);
    }
}
