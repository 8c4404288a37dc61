use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::publishing::{RepositoryError, WorkflowError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Pool(e) => {
                tracing::error!("Pool error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Json(e) => {
                tracing::error!("JSON error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Workflow(e) => return workflow_response(e),
            AppError::Repository(e) => return repository_response(e),
        };

        error_body(status, &message)
    }
}

fn workflow_response(err: &WorkflowError) -> Response {
    match err {
        WorkflowError::Forbidden(_) => error_body(StatusCode::FORBIDDEN, &err.to_string()),
        WorkflowError::InvalidRole(_)
        | WorkflowError::InvalidStatus(_)
        | WorkflowError::InvalidAction(_) => error_body(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn repository_response(err: &RepositoryError) -> Response {
    match err {
        RepositoryError::NotFound(_) => error_body(StatusCode::NOT_FOUND, "Not found"),
        RepositoryError::Conflict(msg) => error_body(StatusCode::BAD_REQUEST, msg),
        RepositoryError::Invalid(msg) => error_body(StatusCode::BAD_REQUEST, msg),
        RepositoryError::Workflow(e) => workflow_response(e),
        RepositoryError::Database(e) => {
            tracing::error!("Pool error: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
        RepositoryError::Sql(e) => {
            tracing::error!("Database error: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
        RepositoryError::Serialization(e) => {
            tracing::error!("Serialization error: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub type AppResult<T> = Result<T, AppError>;
