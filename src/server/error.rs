//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::RecappError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Pipeline(#[from] RecappError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Pipeline(err) => match err {
                RecappError::Parse(_) | RecappError::MissingFeature(_) | RecappError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                RecappError::NotFound(_) => StatusCode::NOT_FOUND,
                RecappError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
                RecappError::EmptyDataset(_) | RecappError::Training(_) => StatusCode::UNPROCESSABLE_ENTITY,
                RecappError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("pipeline task failed: {}", err))
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::Internal(msg) => {
                tracing::error!(detail = %msg, "Internal server error");
                "An internal error occurred".to_string()
            }
            ServerError::Pipeline(RecappError::Io(e)) => {
                tracing::error!(detail = %e, "IO error");
                "A file system error occurred".to_string()
            }
            other => {
                tracing::warn!(status = status.as_u16(), detail = %other, "Request failed");
                other.to_string()
            }
        };

        let body = Json(json!({
            "status": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
