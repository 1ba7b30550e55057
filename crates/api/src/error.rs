// HTTP error bodies and the mapping from domain errors

use axum::{http::StatusCode, Json};
use hms_services::ServiceError;
use hms_tenant::{ResolutionError, UnresolvedReason};
use serde::{Deserialize, Serialize};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }
}

pub fn api_error(status: StatusCode, error: &str, message: &str) -> ApiError {
    (status, Json(ErrorResponse::new(error, message)))
}

/// Tenant resolution failures end the request; nothing is served for a
/// fallback hotel.
///
/// Context construction failures echo the parser's message only when
/// `detailed` is set.
pub fn resolution_error(err: ResolutionError, detailed: bool) -> ApiError {
    match &err {
        ResolutionError::TenantNotResolved(UnresolvedReason::UnknownCode(_)) => (
            StatusCode::NOT_FOUND,
            Json(
                ErrorResponse::new("hotel_not_found", &err.to_string()).with_hint(
                    "The hotel code does not exist in the master database. Verify the hotel code.",
                ),
            ),
        ),
        ResolutionError::TenantNotResolved(_) => (
            StatusCode::UNAUTHORIZED,
            Json(
                ErrorResponse::new("tenant_not_resolved", &err.to_string())
                    .with_hint("Provide the 'X-Hotel-Code' header with a valid hotel code (e.g. HOTEL001)."),
            ),
        ),
        ResolutionError::DirectoryUnavailable(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(
                ErrorResponse::new("directory_unavailable", "Tenant directory unavailable")
                    .with_hint("Check the master database connection."),
            ),
        ),
        ResolutionError::ConnectionResolution { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(
                ErrorResponse::new("tenant_configuration_error", &err.to_string())
                    .with_hint("Check the hotel's database settings in the master database."),
            ),
        ),
        ResolutionError::ContextConstruction { tenant_code, .. } => {
            let message = if detailed {
                err.to_string()
            } else {
                format!("Failed to build database context for tenant {}", tenant_code)
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ErrorResponse::new("context_construction_failed", &message)
                        .with_hint("Check the hotel's connection string in the master database."),
                ),
            )
        }
    }
}

pub fn service_error(err: ServiceError) -> ApiError {
    match &err {
        ServiceError::NotFound(msg) => api_error(StatusCode::NOT_FOUND, "not_found", msg),
        ServiceError::InvalidInput(msg) => api_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
        ServiceError::HotelNotConfigured(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(
                ErrorResponse::new("hotel_not_configured", &err.to_string())
                    .with_hint("Add the hotel's row to hotel_settings in its database."),
            ),
        ),
        ServiceError::Persistence(msg) => {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "persistence_error", msg)
        }
    }
}
