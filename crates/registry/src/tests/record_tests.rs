use super::*;

fn student() -> Student {
    Student::new(StudentId(1), "Asha".into(), None)
}

#[test]
fn round2_rounds_half_away_from_zero() {
    assert_eq!(round2(84.125), 84.13);
    assert_eq!(round2(66.666_666), 66.67);
    assert_eq!(round2(-1.005_1), -1.01);
    assert_eq!(round2(70.0), 70.0);
}

#[test]
fn gpa_is_mean_of_grades_when_no_subject_marks() {
    let mut s = student();
    assert!(s.add_grade(80.0));
    assert!(s.add_grade(90.0));
    assert!(s.add_grade(85.0));
    assert_eq!(s.gpa(), 85.0);

    assert!(s.add_grade(100.0));
    assert!(s.add_grade(0.0));
    assert_eq!(s.gpa(), 71.0);
}

#[test]
fn gpa_mean_is_rounded_to_two_places() {
    let mut s = student();
    s.add_grade(100.0);
    s.add_grade(100.0);
    s.add_grade(0.0);
    assert_eq!(s.gpa(), 66.67);
}

#[test]
fn out_of_range_grade_is_ignored() {
    let mut s = student();
    s.add_grade(75.0);

    assert!(!s.add_grade(100.5));
    assert!(!s.add_grade(-0.1));
    assert!(!s.add_grade(f64::NAN));
    assert!(!s.add_grade(f64::INFINITY));

    assert_eq!(s.grades(), [75.0]);
    assert_eq!(s.gpa(), 75.0);
}

#[test]
fn remove_grade_shifts_and_recalculates() {
    let mut s = student();
    for grade in [60.0, 70.0, 80.0] {
        s.add_grade(grade);
    }
    assert!(s.remove_grade(0));
    assert_eq!(s.grades(), [70.0, 80.0]);
    assert_eq!(s.gpa(), 75.0);

    assert!(s.remove_grade(1));
    assert!(s.remove_grade(0));
    assert!(s.grades().is_empty());
    assert_eq!(s.gpa(), 0.0);
}

#[test]
fn remove_grade_with_bad_index_is_a_no_op() {
    let mut s = student();
    s.add_grade(60.0);
    s.add_grade(90.0);

    assert!(!s.remove_grade(-1));
    assert!(!s.remove_grade(2));
    assert!(!s.remove_grade(i64::MAX));

    assert_eq!(s.grades(), [60.0, 90.0]);
    assert_eq!(s.gpa(), 75.0);
}

#[test]
fn subject_scores_are_clamped_rounded_and_defaulted() {
    let mut s = student();
    s.add_or_update_subject_marks([
        ("high", Some(150.0)),
        ("low", Some(-5.0)),
        ("missing", None),
        ("nan", Some(f64::NAN)),
        ("fine", Some(72.456)),
    ]);

    let marks = s.subject_marks();
    assert_eq!(marks.get("HIGH"), Some(100.0));
    assert_eq!(marks.get("LOW"), Some(0.0));
    assert_eq!(marks.get("MISSING"), Some(0.0));
    assert_eq!(marks.get("NAN"), Some(0.0));
    assert_eq!(marks.get("FINE"), Some(72.46));
}

#[test]
fn subject_keys_are_case_insensitive_and_trimmed() {
    let mut s = student();
    s.add_or_update_subject_marks([("  math  ", Some(50.0))]);
    s.add_or_update_subject_marks([("Math", Some(60.0))]);
    s.add_or_update_subject_marks([("MATH", Some(70.0))]);

    assert_eq!(s.subject_marks().len(), 1);
    assert_eq!(s.subject_marks().get("MATH"), Some(70.0));
    assert_eq!(s.gpa(), 70.0);
}

#[test]
fn blank_subjects_are_dropped() {
    let mut s = student();
    let changed = s.add_or_update_subject_marks([("", Some(80.0)), ("   ", Some(90.0))]);
    assert!(!changed);
    assert!(s.subject_marks().is_empty());
    assert_eq!(s.gpa(), 0.0);
}

#[test]
fn unchanged_marks_report_no_change() {
    let mut s = student();
    assert!(s.add_or_update_subject_marks([("english", Some(85.0))]));
    assert!(!s.add_or_update_subject_marks([("ENGLISH", Some(85.0))]));
    assert!(!s.add_or_update_subject_marks(Vec::<(&str, Option<f64>)>::new()));
}

#[test]
fn subject_marks_take_precedence_over_grades() {
    let mut s = student();
    s.add_grade(40.0);
    s.add_or_update_subject_marks([("MATH", Some(95.0)), ("ENGLISH", Some(85.0))]);
    assert_eq!(s.gpa(), 90.0);

    s.add_grade(10.0);
    assert_eq!(s.grades(), [40.0, 10.0]);
    assert_eq!(s.gpa(), 90.0);
}

#[test]
fn set_subject_marks_replaces_instead_of_merging() {
    let mut s = student();
    s.add_or_update_subject_marks([("MATH", Some(95.0)), ("ENGLISH", Some(85.0))]);
    s.set_subject_marks([("physics", Some(60.0))]);

    let keys: Vec<&str> = s.subject_marks().iter().map(|(key, _)| key).collect();
    assert_eq!(keys, ["PHYSICS"]);
    assert_eq!(s.gpa(), 60.0);
}

#[test]
fn clearing_subject_marks_falls_back_to_grades() {
    let mut s = student();
    s.add_grade(70.0);
    s.add_or_update_subject_marks([("MATH", Some(95.0))]);
    assert_eq!(s.gpa(), 95.0);

    s.set_subject_marks(Vec::<(&str, Option<f64>)>::new());
    assert!(s.subject_marks().is_empty());
    assert_eq!(s.gpa(), 70.0);
}

#[test]
fn replacing_with_only_blank_subjects_still_clears() {
    let mut s = student();
    s.add_or_update_subject_marks([("MATH", Some(95.0))]);
    s.set_subject_marks([("  ", Some(10.0))]);
    assert!(s.subject_marks().is_empty());
    assert_eq!(s.gpa(), 0.0);
}

#[test]
fn record_is_a_detached_copy() {
    let mut s = student();
    s.add_grade(88.0);
    s.add_or_update_subject_marks([("BIOLOGY", Some(91.0))]);

    let mut record = s.to_record();
    record.grades.push(1.0);
    record.subject_marks.insert("BIOLOGY".into(), 0.0);
    record.name.push_str(" (edited)");

    assert_eq!(s.grades(), [88.0]);
    assert_eq!(s.subject_marks().get("BIOLOGY"), Some(91.0));
    assert_eq!(s.name, "Asha");
    assert_eq!(record.letter_grade, LetterGrade::A);
}
