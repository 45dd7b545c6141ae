//! In-memory student registry.
//!
//! All state lives behind one mutex per [`Registry`]; cloning the registry
//! shares that state. Operations that read and then write a student hold
//! the lock for their whole duration, and id minting happens under the same
//! lock as the insert, so no id is ever issued twice.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use shared::{
    domain::{LetterGrade, StudentId},
    protocol::{MarksInput, StudentRecord},
};
use tracing::debug;

mod record;

pub use record::{normalize_subject, round2, sanitize_score, Student, MAX_SCORE, MIN_SCORE};

#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    // Keyed by sequence number, so iteration order is creation order.
    students: BTreeMap<StudentId, Student>,
    last_sequence: u64,
}

impl Inner {
    fn mint_id(&mut self) -> StudentId {
        self.last_sequence += 1;
        StudentId(self.last_sequence)
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates a student with a freshly minted id, ingesting any initial
    /// subject marks through the same normalization as later updates.
    pub fn add_student(
        &self,
        name: impl Into<String>,
        email: Option<String>,
        subject_marks: Option<&MarksInput>,
    ) -> Student {
        let mut inner = self.lock();
        let id = inner.mint_id();
        let mut student = Student::new(id, name.into(), email);
        if let Some(marks) = subject_marks {
            student.add_or_update_subject_marks(marks.iter());
        }
        inner.students.insert(id, student.clone());
        debug!(%id, "student added");
        student
    }

    pub fn remove_student(&self, id: StudentId) -> bool {
        let removed = self.lock().students.remove(&id).is_some();
        debug!(%id, removed, "student remove requested");
        removed
    }

    pub fn get_student(&self, id: StudentId) -> Option<Student> {
        self.lock().students.get(&id).cloned()
    }

    pub fn get_record(&self, id: StudentId) -> Option<StudentRecord> {
        self.lock().students.get(&id).map(Student::to_record)
    }

    /// All students in registry order.
    pub fn all_students(&self) -> Vec<Student> {
        self.lock().students.values().cloned().collect()
    }

    pub fn list_records(&self) -> Vec<StudentRecord> {
        self.lock().students.values().map(Student::to_record).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().students.is_empty()
    }

    /// Adds a standalone grade. An unknown id or an out-of-range value is a
    /// silent no-op; the returned record is `None` only for an unknown id.
    pub fn add_grade_to_student(&self, id: StudentId, grade: f64) -> Option<StudentRecord> {
        self.mutate(id, |student| {
            if !student.add_grade(grade) {
                debug!(%id, grade, "grade outside score range ignored");
            }
        })
    }

    pub fn remove_grade_from_student(&self, id: StudentId, index: i64) -> Option<StudentRecord> {
        self.mutate(id, |student| {
            if !student.remove_grade(index) {
                debug!(%id, index, "grade index out of bounds ignored");
            }
        })
    }

    /// Merges marks into the student's existing subject marks.
    pub fn update_subject_marks(
        &self,
        id: StudentId,
        marks: Option<&MarksInput>,
    ) -> Option<StudentRecord> {
        self.mutate(id, |student| {
            if let Some(marks) = marks {
                student.add_or_update_subject_marks(marks.iter());
            }
        })
    }

    /// Replaces the student's subject marks; `None` or an empty input
    /// clears them.
    pub fn set_subject_marks(
        &self,
        id: StudentId,
        marks: Option<&MarksInput>,
    ) -> Option<StudentRecord> {
        self.mutate(id, |student| match marks {
            Some(marks) => student.set_subject_marks(marks.iter()),
            None => student.set_subject_marks(std::iter::empty::<(&str, Option<f64>)>()),
        })
    }

    /// Snapshot of every student ordered by GPA. Equal GPAs keep registry
    /// order.
    pub fn get_students_by_gpa(&self, descending: bool) -> Vec<Student> {
        let mut students = self.all_students();
        if descending {
            students.sort_by(|a, b| b.gpa().total_cmp(&a.gpa()));
        } else {
            students.sort_by(|a, b| a.gpa().total_cmp(&b.gpa()));
        }
        students
    }

    pub fn letter_grade(&self, student: &Student) -> LetterGrade {
        student.letter_grade()
    }

    fn mutate(&self, id: StudentId, apply: impl FnOnce(&mut Student)) -> Option<StudentRecord> {
        let mut inner = self.lock();
        let Some(student) = inner.students.get_mut(&id) else {
            debug!(%id, "mutation on unknown student ignored");
            return None;
        };
        apply(student);
        Some(student.to_record())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
