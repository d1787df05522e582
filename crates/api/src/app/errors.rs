//! Consistent error responses.
//!
//! Every failing request is answered with the same envelope:
//!
//! ```json
//! {
//!   "error": {
//!     "code": 400,
//!     "message": "name is required",
//!     "errors": [
//!       { "message": "name is required", "reason": "required",
//!         "locationType": "body", "location": "name" }
//!     ]
//!   }
//! }
//! ```
//!
//! `errors` holds one [`ApiError`] per offending input and may be empty for
//! failures that are not tied to an input (panics, draining, 405, ...).

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use orgbook_core::DomainError;

/// Input came from the JSON request body.
pub const LOCATION_BODY: &str = "body";
/// Input came from a URL path parameter.
pub const LOCATION_PARAMETER: &str = "parameter";
/// Input came from the query string.
pub const LOCATION_QUERY: &str = "query";
/// The request path itself (unknown routes).
pub const LOCATION_PATH: &str = "path";
/// A domain resource rather than a specific input.
pub const LOCATION_RESOURCE: &str = "resource";

/// Why an input was rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiErrorReason {
    Required,
    InvalidArgument,
    InvalidParameter,
    Conflict,
    NotFound,
}

impl ApiErrorReason {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiErrorReason::Required => "required",
            ApiErrorReason::InvalidArgument => "invalidArgument",
            ApiErrorReason::InvalidParameter => "invalidParameter",
            ApiErrorReason::Conflict => "conflict",
            ApiErrorReason::NotFound => "notFound",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ApiErrorReason::Required
            | ApiErrorReason::InvalidArgument
            | ApiErrorReason::InvalidParameter => StatusCode::BAD_REQUEST,
            ApiErrorReason::Conflict => StatusCode::CONFLICT,
            ApiErrorReason::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// A single field/parameter-level error surfaced in a response body.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub reason: ApiErrorReason,
    pub location_type: String,
    pub location: String,
}

impl ApiError {
    pub fn new(
        message: impl Into<String>,
        reason: ApiErrorReason,
        location_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            reason,
            location_type: location_type.into(),
            location: location.into(),
        }
    }

    /// Error about a field of the request body.
    pub fn argument(
        message: impl Into<String>,
        reason: ApiErrorReason,
        location: impl Into<String>,
    ) -> Self {
        Self::new(message, reason, LOCATION_BODY, location)
    }

    /// Error about a URL parameter.
    pub fn parameter(
        message: impl Into<String>,
        reason: ApiErrorReason,
        location: impl Into<String>,
    ) -> Self {
        Self::new(message, reason, LOCATION_PARAMETER, location)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

/// Response-level error envelope (see module docs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>, errors: Vec<ApiError>) -> Self {
        Self {
            error: ErrorBody {
                code: status.as_u16(),
                message: message.into(),
                errors,
            },
        }
    }

    /// Envelope for failures that do not point at a specific input.
    pub fn plain(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, message, Vec::new())
    }

    /// Envelope for field-level errors; status and message follow the first one.
    pub fn from_errors(errors: Vec<ApiError>) -> Self {
        let (status, message) = match errors.first() {
            Some(first) => (first.reason.status(), first.message.clone()),
            None => (StatusCode::BAD_REQUEST, "invalid request".to_string()),
        };
        Self::new(status, message, errors)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.error.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn errors(&self) -> &[ApiError] {
        &self.error.errors
    }
}

impl From<ApiError> for ErrorResponse {
    fn from(value: ApiError) -> Self {
        Self::from_errors(vec![value])
    }
}

impl From<DomainError> for ErrorResponse {
    fn from(value: DomainError) -> Self {
        let message = value.to_string();
        let error = match value {
            DomainError::Required { field } => {
                ApiError::argument(message, ApiErrorReason::Required, field)
            }
            DomainError::InvalidArgument { field, .. } => {
                ApiError::argument(message, ApiErrorReason::InvalidArgument, field)
            }
            DomainError::Validation(_) => {
                ApiError::argument(message, ApiErrorReason::InvalidArgument, "")
            }
            DomainError::InvalidId(_) => {
                ApiError::parameter(message, ApiErrorReason::InvalidParameter, "id")
            }
            DomainError::NotFound { resource } => {
                ApiError::new(message, ApiErrorReason::NotFound, LOCATION_RESOURCE, resource)
            }
            DomainError::Conflict(_) => {
                ApiError::new(message, ApiErrorReason::Conflict, LOCATION_RESOURCE, "")
            }
        };
        Self::from(error)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), axum::Json(self)).into_response()
    }
}
