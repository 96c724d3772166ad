//! Kinship derivation from member fields
//!
//! Enumerates a member's relatives by walking father, mother, spouse
//! and child references in the directory; no edge store is involved.
//! Labels come from a fixed catalog ([`Kinship`]) and are localized
//! through an injectable rules table ([`RelationRules`]) loaded with
//! the snapshot. Output order follows the catalog walk and is stable;
//! each (label, member) pair is reported once.
//!
//! Label selection keys on exactly `Male`: any other gender value picks
//! the female-form label, matching the source records' convention.

use crate::family::{Directory, Gender, Member, SerNo, SnapshotResult};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The relation label catalog.
///
/// Serialized form and `english()` reproduce the catalog strings
/// verbatim, curly apostrophes included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kinship {
    Father,
    Mother,
    Son,
    Daughter,
    Brother,
    Sister,
    Husband,
    Wife,
    #[serde(rename = "Grandfather (Paternal)")]
    GrandfatherPaternal,
    #[serde(rename = "Grandmother (Paternal)")]
    GrandmotherPaternal,
    #[serde(rename = "Grandfather (Maternal)")]
    GrandfatherMaternal,
    #[serde(rename = "Grandmother (Maternal)")]
    GrandmotherMaternal,
    Grandson,
    Granddaughter,
    #[serde(rename = "Uncle (Father’s brother)")]
    UncleFathersBrother,
    #[serde(rename = "Aunt (Father’s brother’s wife)")]
    AuntFathersBrothersWife,
    #[serde(rename = "Aunt (Father’s sister)")]
    AuntFathersSister,
    #[serde(rename = "Uncle (Father’s sister’s husband)")]
    UncleFathersSistersHusband,
    #[serde(rename = "Uncle (Mother’s brother)")]
    UncleMothersBrother,
    #[serde(rename = "Aunt (Mother’s brother’s wife)")]
    AuntMothersBrothersWife,
    #[serde(rename = "Aunt (Mother’s sister)")]
    AuntMothersSister,
    #[serde(rename = "Uncle (Mother’s sister’s husband)")]
    UncleMothersSistersHusband,
    #[serde(rename = "Cousin (Paternal, Male)")]
    CousinPaternalMale,
    #[serde(rename = "Cousin (Paternal, Female)")]
    CousinPaternalFemale,
    #[serde(rename = "Cousin (Maternal, Male)")]
    CousinMaternalMale,
    #[serde(rename = "Cousin (Maternal, Female)")]
    CousinMaternalFemale,
    #[serde(rename = "Nephew (Brother’s son)")]
    NephewBrothersSon,
    #[serde(rename = "Niece (Brother’s daughter)")]
    NieceBrothersDaughter,
    #[serde(rename = "Nephew (Sister’s son)")]
    NephewSistersSon,
    #[serde(rename = "Niece (Sister’s daughter)")]
    NieceSistersDaughter,
    #[serde(rename = "Father-in-law")]
    FatherInLaw,
    #[serde(rename = "Mother-in-law")]
    MotherInLaw,
    #[serde(rename = "Brother-in-law (wife’s brother)")]
    BrotherInLawWifesBrother,
    #[serde(rename = "Brother-in-law (husband’s brother)")]
    BrotherInLawHusbandsBrother,
    #[serde(rename = "Sister-in-law (wife’s sister)")]
    SisterInLawWifesSister,
    #[serde(rename = "Sister-in-law (husband’s sister)")]
    SisterInLawHusbandsSister,
}

impl Kinship {
    /// The catalog label, exactly as the rules table keys it
    pub fn english(&self) -> &'static str {
        match self {
            Kinship::Father => "Father",
            Kinship::Mother => "Mother",
            Kinship::Son => "Son",
            Kinship::Daughter => "Daughter",
            Kinship::Brother => "Brother",
            Kinship::Sister => "Sister",
            Kinship::Husband => "Husband",
            Kinship::Wife => "Wife",
            Kinship::GrandfatherPaternal => "Grandfather (Paternal)",
            Kinship::GrandmotherPaternal => "Grandmother (Paternal)",
            Kinship::GrandfatherMaternal => "Grandfather (Maternal)",
            Kinship::GrandmotherMaternal => "Grandmother (Maternal)",
            Kinship::Grandson => "Grandson",
            Kinship::Granddaughter => "Granddaughter",
            Kinship::UncleFathersBrother => "Uncle (Father’s brother)",
            Kinship::AuntFathersBrothersWife => "Aunt (Father’s brother’s wife)",
            Kinship::AuntFathersSister => "Aunt (Father’s sister)",
            Kinship::UncleFathersSistersHusband => "Uncle (Father’s sister’s husband)",
            Kinship::UncleMothersBrother => "Uncle (Mother’s brother)",
            Kinship::AuntMothersBrothersWife => "Aunt (Mother’s brother’s wife)",
            Kinship::AuntMothersSister => "Aunt (Mother’s sister)",
            Kinship::UncleMothersSistersHusband => "Uncle (Mother’s sister’s husband)",
            Kinship::CousinPaternalMale => "Cousin (Paternal, Male)",
            Kinship::CousinPaternalFemale => "Cousin (Paternal, Female)",
            Kinship::CousinMaternalMale => "Cousin (Maternal, Male)",
            Kinship::CousinMaternalFemale => "Cousin (Maternal, Female)",
            Kinship::NephewBrothersSon => "Nephew (Brother’s son)",
            Kinship::NieceBrothersDaughter => "Niece (Brother’s daughter)",
            Kinship::NephewSistersSon => "Nephew (Sister’s son)",
            Kinship::NieceSistersDaughter => "Niece (Sister’s daughter)",
            Kinship::FatherInLaw => "Father-in-law",
            Kinship::MotherInLaw => "Mother-in-law",
            Kinship::BrotherInLawWifesBrother => "Brother-in-law (wife’s brother)",
            Kinship::BrotherInLawHusbandsBrother => "Brother-in-law (husband’s brother)",
            Kinship::SisterInLawWifesSister => "Sister-in-law (wife’s sister)",
            Kinship::SisterInLawHusbandsSister => "Sister-in-law (husband’s sister)",
        }
    }
}

impl fmt::Display for Kinship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.english())
    }
}

/// One localization rule record as stored in the rules collection.
/// Legacy records name the localized fields `relationMarathi` and
/// `reverseMarathi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationRule {
    pub relation_english: String,

    #[serde(default, alias = "relationMarathi")]
    pub relation_localized: String,

    #[serde(default)]
    pub reverse_english: String,

    #[serde(default, alias = "reverseMarathi")]
    pub reverse_localized: String,
}

/// Localization table keyed by the English catalog label.
#[derive(Debug, Clone, Default)]
pub struct RelationRules {
    rules: HashMap<String, RelationRule>,
}

impl RelationRules {
    /// Index rule records. Records without an English label are
    /// skipped; a repeated label keeps the last record.
    pub fn from_rules(rules: Vec<RelationRule>) -> Self {
        let mut map = HashMap::with_capacity(rules.len());
        for rule in rules {
            if rule.relation_english.is_empty() {
                continue;
            }
            map.insert(rule.relation_english.clone(), rule);
        }
        RelationRules { rules: map }
    }

    pub fn from_json_slice(bytes: &[u8]) -> SnapshotResult<Self> {
        let rules: Vec<RelationRule> = serde_json::from_slice(bytes)?;
        Ok(Self::from_rules(rules))
    }

    pub fn get(&self, english: &str) -> Option<&RelationRule> {
        self.rules.get(english)
    }

    /// Localized label for a catalog entry, when the table maps it to
    /// something non-blank
    pub fn localize(&self, kinship: Kinship) -> Option<&str> {
        self.rules
            .get(kinship.english())
            .map(|rule| rule.relation_localized.as_str())
            .filter(|label| !label.is_empty())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One derived relative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedRelation {
    pub kinship: Kinship,

    /// Localized label from the rules table, when mapped
    pub localized: Option<String>,

    pub related: SerNo,
}

/// Enumerate every catalog relation of a member.
///
/// An unknown serial number yields an empty list. References that do
/// not resolve in the directory are skipped, the member never relates
/// to itself, and each (label, relative) pair appears once, at its
/// first position in the catalog walk.
pub fn derive_relations(
    directory: &Directory,
    ser_no: SerNo,
    rules: &RelationRules,
) -> Vec<DerivedRelation> {
    let Some(person) = directory.get(ser_no) else {
        return Vec::new();
    };
    let deriver = Deriver {
        directory,
        rules,
        me: ser_no,
        seen: FxHashSet::default(),
        out: Vec::new(),
    };
    deriver.run(person)
}

struct Deriver<'a> {
    directory: &'a Directory,
    rules: &'a RelationRules,
    me: SerNo,
    seen: FxHashSet<(Kinship, SerNo)>,
    out: Vec<DerivedRelation>,
}

impl<'a> Deriver<'a> {
    fn add(&mut self, kinship: Kinship, related: &Member) {
        if related.ser_no == self.me {
            return;
        }
        if !self.seen.insert((kinship, related.ser_no)) {
            return;
        }
        self.out.push(DerivedRelation {
            kinship,
            localized: self.rules.localize(kinship).map(str::to_string),
            related: related.ser_no,
        });
    }

    fn get(&self, ser_no: Option<SerNo>) -> Option<&'a Member> {
        ser_no.and_then(|id| self.directory.get(id))
    }

    fn children_of(&self, person: &Member) -> Vec<&'a Member> {
        person
            .children_ser_nos
            .iter()
            .filter_map(|&id| self.directory.get(id))
            .collect()
    }

    /// Other resolvable children of the person's recorded parents;
    /// a child listed under both parents shows up twice and is deduped
    /// at add time
    fn siblings_of(&self, person: &Member) -> Vec<&'a Member> {
        let mut siblings = Vec::new();
        for parent_id in person.parent_ser_nos() {
            let Some(parent) = self.directory.get(parent_id) else {
                continue;
            };
            for &child_id in &parent.children_ser_nos {
                if child_id == person.ser_no {
                    continue;
                }
                if let Some(sibling) = self.directory.get(child_id) {
                    siblings.push(sibling);
                }
            }
        }
        siblings
    }

    fn run(mut self, person: &'a Member) -> Vec<DerivedRelation> {
        if let Some(father) = self.get(person.father_ser_no) {
            self.add(Kinship::Father, father);
        }
        if let Some(mother) = self.get(person.mother_ser_no) {
            self.add(Kinship::Mother, mother);
        }

        for child in self.children_of(person) {
            let kinship = if child.gender.is_male() {
                Kinship::Son
            } else {
                Kinship::Daughter
            };
            self.add(kinship, child);
        }

        for sibling in self.siblings_of(person) {
            let kinship = if sibling.gender.is_male() {
                Kinship::Brother
            } else {
                Kinship::Sister
            };
            self.add(kinship, sibling);
        }

        if let Some(spouse) = self.get(person.spouse_ser_no) {
            let kinship = if spouse.gender.is_male() {
                Kinship::Husband
            } else {
                Kinship::Wife
            };
            self.add(kinship, spouse);
        }

        if let Some(father) = self.get(person.father_ser_no) {
            if let Some(grandfather) = self.get(father.father_ser_no) {
                self.add(Kinship::GrandfatherPaternal, grandfather);
            }
            if let Some(grandmother) = self.get(father.mother_ser_no) {
                self.add(Kinship::GrandmotherPaternal, grandmother);
            }
        }
        if let Some(mother) = self.get(person.mother_ser_no) {
            if let Some(grandfather) = self.get(mother.father_ser_no) {
                self.add(Kinship::GrandfatherMaternal, grandfather);
            }
            if let Some(grandmother) = self.get(mother.mother_ser_no) {
                self.add(Kinship::GrandmotherMaternal, grandmother);
            }
        }

        for child in self.children_of(person) {
            for grandchild in self.children_of(child) {
                let kinship = if grandchild.gender.is_male() {
                    Kinship::Grandson
                } else {
                    Kinship::Granddaughter
                };
                self.add(kinship, grandchild);
            }
        }

        self.uncles_aunts_cousins(person);
        self.nephews_nieces(person);
        self.in_laws(person);

        self.out
    }

    fn uncles_aunts_cousins(&mut self, person: &Member) {
        for (parent_id, paternal) in [(person.father_ser_no, true), (person.mother_ser_no, false)] {
            let Some(parent) = self.get(parent_id) else {
                continue;
            };
            // both parent lines enumerate through the parent's father's
            // child list
            let Some(grandparent) = self.get(parent.father_ser_no) else {
                continue;
            };
            for &relative_id in &grandparent.children_ser_nos {
                if relative_id == parent.ser_no {
                    continue;
                }
                let Some(relative) = self.directory.get(relative_id) else {
                    continue;
                };

                if relative.gender.is_male() {
                    let kinship = if paternal {
                        Kinship::UncleFathersBrother
                    } else {
                        Kinship::UncleMothersBrother
                    };
                    self.add(kinship, relative);

                    if let Some(spouse) = self.get(relative.spouse_ser_no) {
                        let kinship = if paternal {
                            Kinship::AuntFathersBrothersWife
                        } else {
                            Kinship::AuntMothersBrothersWife
                        };
                        self.add(kinship, spouse);
                    }
                } else {
                    let kinship = if paternal {
                        Kinship::AuntFathersSister
                    } else {
                        Kinship::AuntMothersSister
                    };
                    self.add(kinship, relative);

                    if let Some(spouse) = self.get(relative.spouse_ser_no) {
                        let kinship = if paternal {
                            Kinship::UncleFathersSistersHusband
                        } else {
                            Kinship::UncleMothersSistersHusband
                        };
                        self.add(kinship, spouse);
                    }
                }

                for cousin in self.children_of(relative) {
                    let kinship = match (paternal, cousin.gender.is_male()) {
                        (true, true) => Kinship::CousinPaternalMale,
                        (true, false) => Kinship::CousinPaternalFemale,
                        (false, true) => Kinship::CousinMaternalMale,
                        (false, false) => Kinship::CousinMaternalFemale,
                    };
                    self.add(kinship, cousin);
                }
            }
        }
    }

    fn nephews_nieces(&mut self, person: &Member) {
        for sibling in self.siblings_of(person) {
            for child in self.children_of(sibling) {
                let kinship = match (sibling.gender.is_male(), child.gender.is_male()) {
                    (true, true) => Kinship::NephewBrothersSon,
                    (true, false) => Kinship::NieceBrothersDaughter,
                    (false, true) => Kinship::NephewSistersSon,
                    (false, false) => Kinship::NieceSistersDaughter,
                };
                self.add(kinship, child);
            }
        }
    }

    fn in_laws(&mut self, person: &Member) {
        let Some(spouse) = self.get(person.spouse_ser_no) else {
            return;
        };
        if let Some(father) = self.get(spouse.father_ser_no) {
            self.add(Kinship::FatherInLaw, father);
        }
        if let Some(mother) = self.get(spouse.mother_ser_no) {
            self.add(Kinship::MotherInLaw, mother);
        }
        for sibling in self.siblings_of(spouse) {
            if sibling.gender.is_male() {
                let kinship = if person.gender == Gender::Female {
                    Kinship::BrotherInLawWifesBrother
                } else {
                    Kinship::BrotherInLawHusbandsBrother
                };
                self.add(kinship, sibling);
            } else {
                let kinship = if person.gender.is_male() {
                    Kinship::SisterInLawWifesSister
                } else {
                    Kinship::SisterInLawHusbandsSister
                };
                self.add(kinship, sibling);
            }
        }
    }
}
