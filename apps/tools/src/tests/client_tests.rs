use super::*;
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::{LetterGrade, StudentId, SubjectMarks},
    error::ErrorCode,
};
use std::collections::HashMap;
use tokio::net::TcpListener;

fn record(id: u64, name: &str, gpa: f64) -> StudentRecord {
    StudentRecord {
        id: StudentId(id),
        name: name.to_string(),
        email: None,
        gpa,
        grades: Vec::new(),
        subject_marks: SubjectMarks::new(),
        letter_grade: LetterGrade::from_gpa(gpa),
    }
}

async fn list_students(Query(q): Query<HashMap<String, String>>) -> Json<Vec<StudentRecord>> {
    let mut records = vec![record(1, "low", 40.0), record(2, "high", 90.0)];
    if q.get("order").map(String::as_str) == Some("desc") {
        records.reverse();
    }
    Json(records)
}

async fn show_student(
    Path(id): Path<String>,
) -> Result<Json<StudentRecord>, (StatusCode, Json<ApiError>)> {
    if id == "STU0001" {
        return Ok(Json(record(1, "Asha", 0.0)));
    }
    Err((
        StatusCode::NOT_FOUND,
        Json(ApiError::not_found(format!("student '{id}' not found"))),
    ))
}

async fn update_marks(
    Path(_id): Path<String>,
    Json(req): Json<SubjectMarksRequest>,
) -> Json<StudentRecord> {
    let mut out = record(1, "Asha", 0.0);
    for (subject, score) in req.subject_marks.unwrap_or_default().iter() {
        out.subject_marks
            .insert(subject.to_uppercase(), score.unwrap_or(0.0));
    }
    Json(out)
}

async fn spawn_gradebook_server() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/api/students", get(list_students))
        .route("/api/students/:id", get(show_student))
        .route("/api/students/:id/subjects", post(update_marks))
        .route("/api/broken", get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn list_passes_gpa_order_as_query() {
    let client = GradebookClient::new(spawn_gradebook_server().await);
    let records = client.list(Some(GpaOrder::Desc)).await.expect("list");
    assert_eq!(records[0].name, "high");
    let records = client.list(None).await.expect("list");
    assert_eq!(records[0].name, "low");
}

#[tokio::test]
async fn api_error_body_becomes_typed_error() {
    let client = GradebookClient::new(spawn_gradebook_server().await);
    assert_eq!(client.show("STU0001").await.expect("show").name, "Asha");

    match client.show("STU0404").await {
        Err(ClientError::Api(err)) => assert_eq!(err.code, ErrorCode::NotFound),
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_failure_is_reported_as_internal() {
    let server_url = spawn_gradebook_server().await;
    let client = GradebookClient::new(format!("{server_url}/"));
    let result: ClientResult<Vec<String>> = client
        .send(client.http.get(format!("{server_url}/api/broken")))
        .await;
    match result {
        Err(ClientError::Api(err)) => {
            assert_eq!(err.code, ErrorCode::Internal);
            assert!(err.message.contains("upstream down"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn marks_are_sent_as_an_object() {
    let client = GradebookClient::new(spawn_gradebook_server().await);
    let marks: MarksInput = [("math", Some(95.0)), ("english", None)]
        .into_iter()
        .collect();
    let record = client.update_marks("STU0001", marks).await.expect("update");
    assert_eq!(record.subject_marks.get("MATH"), Some(95.0));
    assert_eq!(record.subject_marks.get("ENGLISH"), Some(0.0));
}
