//! Member records as loaded from a family snapshot
//!
//! A member is a flat, redundantly-linked record: it names its father,
//! mother, spouse and children by serial number, and any of those
//! references may be absent or point at a record that does not exist.
//! The engine never mutates members; reconciliation happens in the
//! hierarchy and relate modules.

use super::types::{Gender, SerNo};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single member record.
///
/// Field names follow the snapshot wire format (camelCase JSON). All
/// cross-reference fields are nullable and unverified: resolution
/// against the directory happens at traversal time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique positive serial number
    pub ser_no: SerNo,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub middle_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub gender: Gender,

    /// Lineage branch name, when recorded
    #[serde(default)]
    pub vansh: Option<String>,

    /// Generation number from the snapshot; missing values parse as 0
    #[serde(default)]
    pub level: u32,

    #[serde(default)]
    pub father_ser_no: Option<SerNo>,

    #[serde(default)]
    pub mother_ser_no: Option<SerNo>,

    #[serde(default)]
    pub spouse_ser_no: Option<SerNo>,

    /// Embedded child list; may be incomplete or overlap the spouse's
    #[serde(default)]
    pub children_ser_nos: Vec<SerNo>,

    /// Photo reference handed through to the rendering layer
    #[serde(default)]
    pub profile_image: Option<String>,

    /// Legacy snapshots carry free-form `dob` strings; anything that is
    /// not an ISO date parses as absent
    #[serde(default, alias = "dob", deserialize_with = "lenient_date")]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default, alias = "dod", deserialize_with = "lenient_date")]
    pub date_of_death: Option<NaiveDate>,
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()))
}

impl Member {
    /// Create a member with the given serial number and empty fields
    pub fn new(ser_no: impl Into<SerNo>) -> Self {
        Member {
            ser_no: ser_no.into(),
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            gender: Gender::Unknown,
            vansh: None,
            level: 0,
            father_ser_no: None,
            mother_ser_no: None,
            spouse_ser_no: None,
            children_ser_nos: Vec::new(),
            profile_image: None,
            date_of_birth: None,
            date_of_death: None,
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    pub fn with_middle_name(mut self, middle: impl Into<String>) -> Self {
        self.middle_name = middle.into();
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_vansh(mut self, vansh: impl Into<String>) -> Self {
        self.vansh = Some(vansh.into());
        self
    }

    pub fn with_father(mut self, ser_no: impl Into<SerNo>) -> Self {
        self.father_ser_no = Some(ser_no.into());
        self
    }

    pub fn with_mother(mut self, ser_no: impl Into<SerNo>) -> Self {
        self.mother_ser_no = Some(ser_no.into());
        self
    }

    pub fn with_spouse(mut self, ser_no: impl Into<SerNo>) -> Self {
        self.spouse_ser_no = Some(ser_no.into());
        self
    }

    pub fn with_children(mut self, children: Vec<u32>) -> Self {
        self.children_ser_nos = children.into_iter().map(SerNo::new).collect();
        self
    }

    pub fn with_profile_image(mut self, path: impl Into<String>) -> Self {
        self.profile_image = Some(path.into());
        self
    }

    /// Display name: first, middle and last name joined by single
    /// spaces, blank parts skipped. The one place name composition
    /// lives; callers never re-derive it from the parts.
    pub fn display_name(&self) -> String {
        join_name_parts(&self.first_name, &self.middle_name, &self.last_name)
    }

    /// Both parent references in father-then-mother order, absent ones
    /// skipped
    pub fn parent_ser_nos(&self) -> impl Iterator<Item = SerNo> + '_ {
        self.father_ser_no.into_iter().chain(self.mother_ser_no)
    }
}

/// Join name parts with single spaces, skipping blanks
pub(crate) fn join_name_parts(first: &str, middle: &str, last: &str) -> String {
    let mut name = String::new();
    for part in [first, middle, last] {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if !name.is_empty() {
            name.push(' ');
        }
        name.push_str(part);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_skips_blank_parts() {
        let m = Member::new(1).with_name("Ramchandra", "Kulkarni");
        assert_eq!(m.display_name(), "Ramchandra Kulkarni");

        let m = Member::new(2)
            .with_name("Sita", "Kulkarni")
            .with_middle_name("Ramchandra");
        assert_eq!(m.display_name(), "Sita Ramchandra Kulkarni");

        let m = Member::new(3).with_name("  ", "");
        assert_eq!(m.display_name(), "");
    }

    #[test]
    fn test_parent_ser_nos_order() {
        let m = Member::new(10).with_father(1).with_mother(2);
        let parents: Vec<SerNo> = m.parent_ser_nos().collect();
        assert_eq!(parents, vec![SerNo::new(1), SerNo::new(2)]);

        let m = Member::new(11).with_mother(2);
        let parents: Vec<SerNo> = m.parent_ser_nos().collect();
        assert_eq!(parents, vec![SerNo::new(2)]);
    }

    #[test]
    fn test_member_wire_format() {
        let json = r#"{
            "serNo": 5,
            "firstName": "Madhav",
            "lastName": "Kulkarni",
            "gender": "Male",
            "vansh": "Kulkarni",
            "level": 2,
            "fatherSerNo": 1,
            "motherSerNo": 2,
            "childrenSerNos": [9, 10],
            "profileImage": "/uploads/madhav.jpg",
            "dob": "1950-06-12",
            "dod": "unknown"
        }"#;

        let m: Member = serde_json::from_str(json).unwrap();
        assert_eq!(m.ser_no, SerNo::new(5));
        assert_eq!(m.father_ser_no, Some(SerNo::new(1)));
        assert_eq!(m.spouse_ser_no, None);
        assert_eq!(m.children_ser_nos, vec![SerNo::new(9), SerNo::new(10)]);
        assert_eq!(
            m.date_of_birth,
            Some(NaiveDate::from_ymd_opt(1950, 6, 12).unwrap())
        );
        // free-form date text does not take the record down
        assert_eq!(m.date_of_death, None);

        let back = serde_json::to_value(&m).unwrap();
        assert_eq!(back["serNo"], 5);
        assert_eq!(back["fatherSerNo"], 1);
        assert_eq!(back["childrenSerNos"][0], 9);
        assert_eq!(back["dateOfBirth"], "1950-06-12");
    }

    #[test]
    fn test_member_minimal_wire_defaults() {
        let m: Member = serde_json::from_str(r#"{"serNo": 7}"#).unwrap();
        assert_eq!(m.ser_no, SerNo::new(7));
        assert_eq!(m.gender, Gender::Unknown);
        assert_eq!(m.level, 0);
        assert!(m.children_ser_nos.is_empty());
        assert_eq!(m.display_name(), "");
    }
}
