use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    error::{ApiError, ApiException},
    protocol::{
        AddGradeRequest, CreateStudentRequest, GpaOrder, MarksInput, StudentRecord,
        SubjectMarksRequest,
    },
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server rejected request: {0}")]
    Api(#[from] ApiException),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Thin HTTP client for the gradebook server.
pub struct GradebookClient {
    http: Client,
    server_url: String,
}

impl GradebookClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.server_url)
    }

    pub async fn subjects(&self) -> ClientResult<Vec<String>> {
        self.send(self.http.get(self.url("/subjects"))).await
    }

    pub async fn list(&self, order: Option<GpaOrder>) -> ClientResult<Vec<StudentRecord>> {
        let mut request = self.http.get(self.url("/students"));
        if let Some(order) = order {
            request = request.query(&[("order", order)]);
        }
        self.send(request).await
    }

    pub async fn show(&self, id: &str) -> ClientResult<StudentRecord> {
        self.send(self.http.get(self.url(&format!("/students/{id}"))))
            .await
    }

    pub async fn create(&self, req: &CreateStudentRequest) -> ClientResult<StudentRecord> {
        self.send(self.http.post(self.url("/students")).json(req))
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<bool> {
        self.send(self.http.delete(self.url(&format!("/students/{id}"))))
            .await
    }

    pub async fn add_grade(&self, id: &str, grade: f64) -> ClientResult<StudentRecord> {
        self.send(
            self.http
                .post(self.url(&format!("/students/{id}/grades")))
                .json(&AddGradeRequest { grade }),
        )
        .await
    }

    pub async fn remove_grade(&self, id: &str, index: i64) -> ClientResult<StudentRecord> {
        self.send(
            self.http
                .delete(self.url(&format!("/students/{id}/grades/{index}"))),
        )
        .await
    }

    pub async fn set_marks(&self, id: &str, marks: MarksInput) -> ClientResult<StudentRecord> {
        self.send(
            self.http
                .put(self.url(&format!("/students/{id}/subjects")))
                .json(&SubjectMarksRequest {
                    subject_marks: Some(marks),
                }),
        )
        .await
    }

    pub async fn update_marks(&self, id: &str, marks: MarksInput) -> ClientResult<StudentRecord> {
        self.send(
            self.http
                .post(self.url(&format!("/students/{id}/subjects")))
                .json(&SubjectMarksRequest {
                    subject_marks: Some(marks),
                }),
        )
        .await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "gradebook response");
        if status.is_client_error() || status.is_server_error() {
            let bytes = response.bytes().await?;
            return match serde_json::from_slice::<ApiError>(&bytes) {
                Ok(api_error) => Err(ApiException::from(api_error).into()),
                Err(_) => Err(ClientError::Api(ApiException::new(
                    shared::error::ErrorCode::Internal,
                    format!("HTTP {status}: {}", String::from_utf8_lossy(&bytes)),
                ))),
            };
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
