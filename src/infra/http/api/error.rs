use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::error::ErrorReport;
use crate::application::faqs::FaqError;
use crate::application::repos::RepoError;
use crate::domain::error::{DomainError, ValidationErrors};

use super::models::{ApiErrorBody, ApiErrorMessage, FieldErrorView};

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const VALIDATION: &str = "validation_failed";
    pub const INVALID_ID: &str = "invalid_id";
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const REPO: &str = "repo_error";
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    fields: Vec<FieldErrorView>,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            fields: Vec::new(),
            detail: None,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut error = Self::new(
            StatusCode::BAD_REQUEST,
            codes::VALIDATION,
            "Validation failed",
            None,
        );
        error.fields = errors
            .violations()
            .iter()
            .map(|violation| FieldErrorView {
                field: violation.field.to_string(),
                message: violation.message.clone(),
            })
            .collect();
        error.detail = Some(errors.to_string());
        error
    }

    /// Internal diagnostic that is logged but never sent to the client.
    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self
            .detail
            .clone()
            .or_else(|| self.hint.clone())
            .unwrap_or_else(|| self.message.to_string());
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
                fields: self.fields,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!("{}: {detail}", self.code),
        )
        .attach(&mut response);
        response
    }
}

impl From<FaqError> for ApiError {
    fn from(err: FaqError) -> Self {
        match err {
            FaqError::Domain(DomainError::Validation(errors)) => ApiError::validation(&errors),
            FaqError::Domain(DomainError::InvalidIdentifier { value }) => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::INVALID_ID,
                "Invalid FAQ identifier",
                Some(format!("`{value}` is not a valid identifier")),
            ),
            FaqError::NotFound => ApiError::not_found("FAQ not found"),
            FaqError::Duplicate => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::DUPLICATE,
                "A FAQ with this question already exists",
                None,
            ),
            FaqError::Repo(err) => repo_to_api(err),
        }
    }
}

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Service temporarily unavailable",
            None,
        )
        .with_detail(err.to_string()),
        RepoError::NotFound => ApiError::not_found("FAQ not found"),
        other => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Internal server error",
            None,
        )
        .with_detail(other.to_string()),
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid JSON body", Some(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("Invalid query string", Some(rejection.body_text()))
    }
}
