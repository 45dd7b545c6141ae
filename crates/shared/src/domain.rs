use std::{fmt, str::FromStr};

use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const STUDENT_ID_PREFIX: &str = "STU";

/// Registry-assigned student identifier.
///
/// The wire form is the prefix followed by the sequence number padded to at
/// least four digits. Numbers past 9999 keep growing without truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StudentId(pub u64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{STUDENT_ID_PREFIX}{:04}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid student id '{0}'")]
pub struct InvalidStudentId(pub String);

impl FromStr for StudentId {
    type Err = InvalidStudentId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let digits = raw
            .strip_prefix(STUDENT_ID_PREFIX)
            .filter(|digits| digits.len() >= 4 && digits.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| InvalidStudentId(raw.to_string()))?;
        let id = digits
            .parse::<u64>()
            .map(StudentId)
            .map_err(|_| InvalidStudentId(raw.to_string()))?;
        // Only the canonical spelling names a student; "STU00001" does not.
        if id.to_string() != raw {
            return Err(InvalidStudentId(raw.to_string()));
        }
        Ok(id)
    }
}

impl Serialize for StudentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StudentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    /// Bands are inclusive on their lower bound.
    pub fn from_gpa(gpa: f64) -> Self {
        if gpa >= 90.0 {
            Self::A
        } else if gpa >= 80.0 {
            Self::B
        } else if gpa >= 70.0 {
            Self::C
        } else if gpa >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical subject key to stored mark, in insertion order.
///
/// Keys are expected to be normalized by the owner before insertion; this
/// type only keeps them unique and ordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectMarks {
    entries: Vec<(String, f64)>,
}

impl SubjectMarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subject: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == subject)
            .map(|(_, mark)| *mark)
    }

    /// Overwrites in place when the key exists, otherwise appends.
    pub fn insert(&mut self, subject: String, mark: f64) -> Option<f64> {
        match self.entries.iter_mut().find(|(key, _)| *key == subject) {
            Some((_, slot)) => Some(std::mem::replace(slot, mark)),
            None => {
                self.entries.push((subject, mark));
                None
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, mark)| (key.as_str(), *mark))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, mark)| *mark)
    }
}

impl Serialize for SubjectMarks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (subject, mark) in &self.entries {
            map.serialize_entry(subject, mark)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SubjectMarks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let input = crate::protocol::MarksInput::deserialize(deserializer)?;
        let mut marks = SubjectMarks::new();
        for (subject, mark) in input.into_pairs() {
            marks.insert(subject, mark.unwrap_or(0.0));
        }
        Ok(marks)
    }
}
