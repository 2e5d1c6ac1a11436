//! HTTP-facing error type.
//!
//! Handlers return `Result<_, ApiError>`; every variant maps to a status code and a
//! JSON body of the shape `{ error, message?, loginUrl?, suggestion?, debug? }`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::LOGIN_URL;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable session; the body carries a login hint.
    #[error("{error}")]
    Unauthorized {
        error: &'static str,
        message: &'static str,
    },

    /// Email domain is not on the allow list.
    #[error("{0}")]
    DomainNotAllowed(String),

    #[error("{0}")]
    BadRequest(&'static str),

    /// Anything unexpected. Only `debug` ever carries internal detail.
    #[error("{error}")]
    Internal {
        error: &'static str,
        message: Option<&'static str>,
        debug: Option<String>,
    },
}

impl ApiError {
    pub fn login_required() -> Self {
        ApiError::Unauthorized {
            error: "Authentication required",
            message: "Please log in to access this resource",
        }
    }

    pub fn inactive_user() -> Self {
        ApiError::Unauthorized {
            error: "Invalid or inactive user",
            message: "Please log in again",
        }
    }

    pub fn internal(error: &'static str) -> Self {
        ApiError::Internal {
            error,
            message: None,
            debug: None,
        }
    }

    pub fn internal_with(error: &'static str, message: &'static str) -> Self {
        ApiError::Internal {
            error,
            message: Some(message),
            debug: None,
        }
    }

    pub fn with_debug(self, detail: impl Into<String>) -> Self {
        match self {
            ApiError::Internal { error, message, .. } => ApiError::Internal {
                error,
                message,
                debug: Some(detail.into()),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::DomainNotAllowed(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Malformed or mistyped JSON bodies are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "rejected request body");
        ApiError::BadRequest("Invalid request body")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Unauthorized { error, message } => ErrorBody {
                error: error.into(),
                message: Some(message.into()),
                login_url: Some(LOGIN_URL),
                ..Default::default()
            },
            ApiError::DomainNotAllowed(message) => ErrorBody {
                error: "Access Denied".into(),
                message: Some(message),
                suggestion: Some(
                    "Please contact your administrator if you believe this is an error.",
                ),
                ..Default::default()
            },
            ApiError::BadRequest(error) => ErrorBody {
                error: error.into(),
                ..Default::default()
            },
            ApiError::Internal {
                error,
                message,
                debug,
            } => ErrorBody {
                error: error.into(),
                message: message.map(Into::into),
                debug,
                ..Default::default()
            },
        };

        (status, Json(body)).into_response()
    }
}
