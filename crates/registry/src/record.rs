use shared::{
    domain::{LetterGrade, StudentId, SubjectMarks},
    protocol::StudentRecord,
};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Rounds half away from zero at two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Canonical subject key: trimmed and upper-cased. Blank names have no key.
pub fn normalize_subject(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Clamps into the score range and rounds. Absent and NaN become zero.
pub fn sanitize_score(score: Option<f64>) -> f64 {
    let value = match score {
        Some(value) if !value.is_nan() => value,
        _ => return MIN_SCORE,
    };
    round2(value.clamp(MIN_SCORE, MAX_SCORE))
}

/// A student and their marks.
///
/// `gpa` is derived and recomputed by every mutator; nothing outside this
/// type can write it.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    id: StudentId,
    pub name: String,
    pub email: Option<String>,
    grades: Vec<f64>,
    subject_marks: SubjectMarks,
    gpa: f64,
}

impl Student {
    pub(crate) fn new(id: StudentId, name: String, email: Option<String>) -> Self {
        Self {
            id,
            name,
            email,
            grades: Vec::new(),
            subject_marks: SubjectMarks::new(),
            gpa: 0.0,
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn grades(&self) -> &[f64] {
        &self.grades
    }

    pub fn subject_marks(&self) -> &SubjectMarks {
        &self.subject_marks
    }

    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    pub fn letter_grade(&self) -> LetterGrade {
        LetterGrade::from_gpa(self.gpa)
    }

    /// Appends a standalone grade. Values outside `[0, 100]` (and NaN) are
    /// ignored rather than clamped. Returns whether the grade was stored.
    pub(crate) fn add_grade(&mut self, value: f64) -> bool {
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return false;
        }
        self.grades.push(value);
        self.recalculate_gpa();
        true
    }

    /// Removes the grade at `index`, shifting later grades down. Any index
    /// outside the list, negative included, is ignored.
    pub(crate) fn remove_grade(&mut self, index: i64) -> bool {
        let Some(index) = usize::try_from(index)
            .ok()
            .filter(|index| *index < self.grades.len())
        else {
            return false;
        };
        self.grades.remove(index);
        self.recalculate_gpa();
        true
    }

    /// Merges marks into the existing map. Keys are normalized, blank keys
    /// dropped and scores sanitized. GPA is recomputed once, and only when a
    /// stored value actually changed.
    pub(crate) fn add_or_update_subject_marks<I, S>(&mut self, marks: I) -> bool
    where
        I: IntoIterator<Item = (S, Option<f64>)>,
        S: AsRef<str>,
    {
        let mut changed = false;
        for (subject, score) in marks {
            let Some(key) = normalize_subject(subject.as_ref()) else {
                continue;
            };
            let sanitized = sanitize_score(score);
            if self.subject_marks.get(&key) != Some(sanitized) {
                self.subject_marks.insert(key, sanitized);
                changed = true;
            }
        }
        if changed {
            self.recalculate_gpa();
        }
        changed
    }

    /// Replaces every subject mark with `marks`.
    pub(crate) fn set_subject_marks<I, S>(&mut self, marks: I)
    where
        I: IntoIterator<Item = (S, Option<f64>)>,
        S: AsRef<str>,
    {
        self.subject_marks.clear();
        self.add_or_update_subject_marks(marks);
        // Unconditional: an input made only of blank subjects still clears.
        self.recalculate_gpa();
    }

    /// Subject marks win over standalone grades; the two are never mixed.
    fn recalculate_gpa(&mut self) {
        self.gpa = if !self.subject_marks.is_empty() {
            mean(self.subject_marks.values(), self.subject_marks.len())
        } else if !self.grades.is_empty() {
            mean(self.grades.iter().copied(), self.grades.len())
        } else {
            0.0
        };
    }

    /// Deep copy of the current state plus its letter grade.
    pub fn to_record(&self) -> StudentRecord {
        StudentRecord {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            gpa: self.gpa,
            grades: self.grades.clone(),
            subject_marks: self.subject_marks.clone(),
            letter_grade: self.letter_grade(),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    round2(values.sum::<f64>() / count as f64)
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
