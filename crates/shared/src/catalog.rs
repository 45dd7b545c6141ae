//! Curriculum subjects recognized by the web client.
//!
//! Reference data only: the registry accepts any non-blank subject name.

pub const SUBJECTS: &[&str] = &[
    "ENGLISH",
    "KISWAHILI",
    "MATHEMATICS",
    "BIOLOGY",
    "PHYSICS",
    "CHEMISTRY",
    "HISTORY AND GOVERNMENT",
    "GEOGRAPHY",
    "CHRISTIAN RELIGIOUS EDUCATION",
    "BUSINESS STUDIES",
    "AGRICULTURE",
];

pub fn is_catalog_subject(name: &str) -> bool {
    let wanted = name.trim().to_uppercase();
    SUBJECTS.iter().any(|subject| *subject == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_after_trim_and_uppercase() {
        assert!(is_catalog_subject("  history and government "));
        assert!(is_catalog_subject("Physics"));
        assert!(!is_catalog_subject("MATH"));
        assert!(!is_catalog_subject("   "));
    }
}
