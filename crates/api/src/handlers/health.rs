use crate::error::{resolution_error, ApiError};
use crate::middleware::CurrentTenant;
use crate::AppState;
use axum::{extract::State, Json};
use hms_tenant::TenantConnectionStatus;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Connectivity of the requesting hotel's database
pub async fn tenant_health(
    State(state): State<Arc<AppState>>,
    CurrentTenant(accessor): CurrentTenant,
) -> Result<Json<TenantConnectionStatus>, ApiError> {
    let status = state
        .context_resolver
        .validate_tenant_connection(&accessor)
        .await
        .map_err(|e| resolution_error(e, state.detailed_errors()))?;

    Ok(Json(status))
}
