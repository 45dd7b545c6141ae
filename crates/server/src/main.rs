use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use server_api::{
    add_grade, create_student, delete_student, get_student, list_students,
    list_students_by_gpa, list_subjects, remove_grade, replace_subject_marks,
    upsert_subject_marks, ApiContext,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        AddGradeRequest, CreateStudentRequest, GpaOrder, StudentRecord, SubjectMarksRequest,
    },
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, Settings};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[derive(Debug, Deserialize)]
struct ListStudentsQuery {
    order: Option<GpaOrder>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let state = AppState {
        api: ApiContext::default(),
    };
    let app = build_router(Arc::new(state), &settings)?;

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, allowed_origin = ?settings.allowed_origin, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped; in-memory records discarded");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}

fn build_router(state: Arc<AppState>, settings: &Settings) -> anyhow::Result<Router> {
    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/subjects", get(http_list_subjects))
        .route(
            "/api/students",
            get(http_list_students).post(http_create_student),
        )
        .route(
            "/api/students/:id",
            get(http_get_student).delete(http_delete_student),
        )
        .route("/api/students/:id/grades", post(http_add_grade))
        .route("/api/students/:id/grades/:index", delete(http_remove_grade))
        .route(
            "/api/students/:id/subjects",
            post(http_upsert_subject_marks).put(http_replace_subject_marks),
        )
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
        .with_state(state);

    match settings.allowed_origin.as_deref() {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .with_context(|| format!("invalid allowed origin '{origin}'"))?;
            Ok(router.layer(
                CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ))
        }
        None => Ok(router),
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_subjects() -> Json<Vec<String>> {
    Json(list_subjects())
}

async fn http_create_student(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateStudentRequest>,
) -> ApiResult<StudentRecord> {
    create_student(&state.api, req).map(Json).map_err(reject)
}

async fn http_list_students(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListStudentsQuery>,
) -> Json<Vec<StudentRecord>> {
    let records = match q.order {
        Some(order) => list_students_by_gpa(&state.api, order),
        None => list_students(&state.api),
    };
    Json(records)
}

async fn http_get_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StudentRecord> {
    get_student(&state.api, &id).map(Json).map_err(reject)
}

async fn http_delete_student(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<bool> {
    Json(delete_student(&state.api, &id))
}

async fn http_add_grade(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddGradeRequest>,
) -> ApiResult<StudentRecord> {
    add_grade(&state.api, &id, req).map(Json).map_err(reject)
}

async fn http_remove_grade(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, i64)>,
) -> ApiResult<StudentRecord> {
    remove_grade(&state.api, &id, index)
        .map(Json)
        .map_err(reject)
}

async fn http_replace_subject_marks(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SubjectMarksRequest>,
) -> ApiResult<StudentRecord> {
    replace_subject_marks(&state.api, &id, req)
        .map(Json)
        .map_err(reject)
}

async fn http_upsert_subject_marks(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SubjectMarksRequest>,
) -> ApiResult<StudentRecord> {
    upsert_subject_marks(&state.api, &id, req)
        .map(Json)
        .map_err(reject)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
