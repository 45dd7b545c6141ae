use registry::Registry;
use shared::{
    catalog::SUBJECTS,
    domain::StudentId,
    error::ApiError,
    protocol::{
        AddGradeRequest, CreateStudentRequest, GpaOrder, StudentRecord, SubjectMarksRequest,
    },
};
use tracing::{debug, info};

#[derive(Clone, Default)]
pub struct ApiContext {
    pub registry: Registry,
}

impl ApiContext {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

pub fn list_subjects() -> Vec<String> {
    SUBJECTS.iter().map(|subject| subject.to_string()).collect()
}

pub fn create_student(
    ctx: &ApiContext,
    req: CreateStudentRequest,
) -> Result<StudentRecord, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("student name is required"));
    }
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string);

    let student = ctx
        .registry
        .add_student(name, email, req.subject_marks.as_ref());
    info!(id = %student.id(), "student created");
    Ok(student.to_record())
}

pub fn list_students(ctx: &ApiContext) -> Vec<StudentRecord> {
    ctx.registry.list_records()
}

pub fn list_students_by_gpa(ctx: &ApiContext, order: GpaOrder) -> Vec<StudentRecord> {
    ctx.registry
        .get_students_by_gpa(order.is_descending())
        .iter()
        .map(|student| student.to_record())
        .collect()
}

pub fn get_student(ctx: &ApiContext, raw_id: &str) -> Result<StudentRecord, ApiError> {
    let id = parse_id(raw_id)?;
    ctx.registry
        .get_record(id)
        .ok_or_else(|| not_found(raw_id))
}

/// `Ok(false)` for an id that was never issued or is already gone.
pub fn delete_student(ctx: &ApiContext, raw_id: &str) -> bool {
    let Ok(id) = raw_id.parse::<StudentId>() else {
        debug!(raw_id, "delete of malformed student id");
        return false;
    };
    let removed = ctx.registry.remove_student(id);
    if removed {
        info!(%id, "student deleted");
    }
    removed
}

pub fn add_grade(
    ctx: &ApiContext,
    raw_id: &str,
    req: AddGradeRequest,
) -> Result<StudentRecord, ApiError> {
    let id = parse_id(raw_id)?;
    let record = ctx
        .registry
        .add_grade_to_student(id, req.grade)
        .ok_or_else(|| not_found(raw_id))?;
    info!(%id, grade = req.grade, "grade add requested");
    Ok(record)
}

pub fn remove_grade(ctx: &ApiContext, raw_id: &str, index: i64) -> Result<StudentRecord, ApiError> {
    let id = parse_id(raw_id)?;
    let record = ctx
        .registry
        .remove_grade_from_student(id, index)
        .ok_or_else(|| not_found(raw_id))?;
    info!(%id, index, "grade removal requested");
    Ok(record)
}

pub fn replace_subject_marks(
    ctx: &ApiContext,
    raw_id: &str,
    req: SubjectMarksRequest,
) -> Result<StudentRecord, ApiError> {
    let id = parse_id(raw_id)?;
    let record = ctx
        .registry
        .set_subject_marks(id, req.subject_marks.as_ref())
        .ok_or_else(|| not_found(raw_id))?;
    info!(%id, subjects = record.subject_marks.len(), "subject marks replaced");
    Ok(record)
}

pub fn upsert_subject_marks(
    ctx: &ApiContext,
    raw_id: &str,
    req: SubjectMarksRequest,
) -> Result<StudentRecord, ApiError> {
    let id = parse_id(raw_id)?;
    let record = ctx
        .registry
        .update_subject_marks(id, req.subject_marks.as_ref())
        .ok_or_else(|| not_found(raw_id))?;
    info!(%id, subjects = record.subject_marks.len(), "subject marks updated");
    Ok(record)
}

fn parse_id(raw_id: &str) -> Result<StudentId, ApiError> {
    raw_id.parse().map_err(|_| not_found(raw_id))
}

fn not_found(raw_id: &str) -> ApiError {
    debug!(raw_id, "student not found");
    ApiError::not_found(format!("student '{raw_id}' not found"))
}
