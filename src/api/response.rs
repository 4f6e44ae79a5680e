//! Response types for the Earnings Engine API.
//!
//! This module defines the success envelopes, the error response structures
//! and the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::CalculationResult;

/// Response body for a successful calculation.
///
/// Wraps the deterministic [`CalculationResult`] with the per-request id,
/// timestamp and engine version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The engine version that produced the result.
    pub engine_version: String,
    /// The country id the rules came from.
    pub country: String,
    /// The variant slug the rules came from.
    pub variant: String,
    /// The share query that reproduces this calculation.
    pub share_query: String,
    /// The breakdown for every term.
    pub result: CalculationResult,
}

/// Response body for the `/share` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    /// The encoded query string.
    pub query: String,
    /// The full share link.
    pub link: String,
    /// The plain-text summary to send with the link.
    pub message: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    fn internal(error: ApiError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidSchedule { field, .. } => Self::bad_request(ApiError::with_details(
                "INVALID_SCHEDULE",
                message,
                format!("Check the schedule field '{}'", field),
            )),
            EngineError::InvalidRate { .. } => {
                Self::bad_request(ApiError::new("INVALID_RATE", message))
            }
            EngineError::InvalidTerm { .. } => {
                Self::bad_request(ApiError::new("INVALID_TERM", message))
            }
            EngineError::InvalidNumber { .. } => {
                Self::bad_request(ApiError::new("INVALID_NUMBER", message))
            }
            EngineError::Overflow { .. } => Self::bad_request(ApiError::with_details(
                "OVERFLOW",
                message,
                "The rate is too large to calculate with",
            )),
            EngineError::CountryNotFound { .. } => {
                Self::bad_request(ApiError::new("COUNTRY_NOT_FOUND", message))
            }
            EngineError::VariantNotFound { .. } => {
                Self::bad_request(ApiError::new("VARIANT_NOT_FOUND", message))
            }
            EngineError::InvalidShareLink { .. } => {
                Self::bad_request(ApiError::new("INVALID_SHARE_LINK", message))
            }
            EngineError::InvalidTaxRule { .. } => Self::internal(ApiError::with_details(
                "INVALID_TAX_RULE",
                "Configured tax rules are invalid",
                message,
            )),
            EngineError::ConfigNotFound { .. } => Self::internal(ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration error",
                message,
            )),
            EngineError::ConfigParseError { .. } => Self::internal(ApiError::with_details(
                "CONFIG_ERROR",
                "Configuration parse error",
                message,
            )),
        }
    }
}
