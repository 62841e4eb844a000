use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid {entity} data.")]
    InvalidBody {
        entity: &'static str,
        reason: String,
    },

    #[error("Invalid query parameters.")]
    InvalidQuery { reason: String },

    #[error("Failed to create {entity}. Please check server logs.")]
    MalformedBody {
        entity: &'static str,
        reason: String,
    },

    #[error("Resource not found")]
    NotFound,

    #[error("Internal Server Error")]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn invalid_query(rejection: QueryRejection) -> Self {
        Self::InvalidQuery {
            reason: rejection.body_text(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidBody { .. } | AppError::InvalidQuery { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MalformedBody { .. } | AppError::Anyhow(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::MalformedBody { entity, reason } => {
                tracing::error!(entity = *entity, reason = %reason, "failed to read request body");
                self.to_string()
            }
            AppError::Anyhow(e) => {
                tracing::error!(error = ?e, "system error");
                "Something went wrong".to_string()
            }
            AppError::Validation(msg) => {
                tracing::warn!(message = %msg, "rejected payload");
                msg.clone()
            }
            AppError::InvalidBody { entity, reason } => {
                tracing::warn!(entity = *entity, reason = %reason, "payload has the wrong shape");
                self.to_string()
            }
            AppError::InvalidQuery { reason } => {
                tracing::warn!(reason = %reason, "rejected query string");
                self.to_string()
            }
            AppError::NotFound => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
