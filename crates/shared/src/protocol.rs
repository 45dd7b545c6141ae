use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::domain::{LetterGrade, StudentId, SubjectMarks};

/// Raw subject marks as sent by a collaborator, before normalization.
///
/// Deserializes from a JSON object and keeps document order. A `null` score
/// is kept as absent so the core can sanitize it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarksInput(Vec<(String, Option<f64>)>);

impl MarksInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subject: impl Into<String>, score: Option<f64>) {
        self.0.push((subject.into(), score));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.0.iter().map(|(subject, score)| (subject.as_str(), *score))
    }

    pub fn into_pairs(self) -> Vec<(String, Option<f64>)> {
        self.0
    }
}

impl<S: Into<String>> FromIterator<(S, Option<f64>)> for MarksInput {
    fn from_iter<I: IntoIterator<Item = (S, Option<f64>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(subject, score)| (subject.into(), score))
                .collect(),
        )
    }
}

impl Serialize for MarksInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (subject, score) in &self.0 {
            map.serialize_entry(subject, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MarksInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MarksVisitor;

        impl<'de> Visitor<'de> for MarksVisitor {
            type Value = MarksInput;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of subject names to numeric marks")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((subject, score)) = access.next_entry::<String, Option<f64>>()? {
                    pairs.push((subject, score));
                }
                Ok(MarksInput(pairs))
            }
        }

        deserializer.deserialize_map(MarksVisitor)
    }
}

/// Read-only snapshot of a student handed to collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub gpa: f64,
    #[serde(default)]
    pub grades: Vec<f64>,
    #[serde(default)]
    pub subject_marks: SubjectMarks,
    pub letter_grade: LetterGrade,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_marks: Option<MarksInput>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AddGradeRequest {
    pub grade: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectMarksRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_marks: Option<MarksInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpaOrder {
    Asc,
    Desc,
}

impl GpaOrder {
    pub fn is_descending(self) -> bool {
        matches!(self, Self::Desc)
    }
}
