use crate::error::{resolution_error, ApiError};
use crate::middleware::CurrentTenant;
use crate::AppState;
use axum::{extract::State, Json};
use hms_models::TenantSummary;
use hms_tenant::QueueSettings;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct CurrentHotelResponse {
    pub hotel: TenantSummary,
    pub database: Option<String>,
    pub queue: QueueSettings,
}

/// The hotel this request is addressed to, with its effective queue settings
pub async fn current_hotel(
    State(state): State<Arc<AppState>>,
    CurrentTenant(accessor): CurrentTenant,
) -> Result<Json<CurrentHotelResponse>, ApiError> {
    let tenant = accessor
        .get_tenant()
        .map_err(|e| resolution_error(e, state.detailed_errors()))?;

    Ok(Json(CurrentHotelResponse {
        hotel: tenant.summary(),
        database: tenant.database_name.clone(),
        queue: state.queue_defaults.resolve_for_tenant(Some(tenant)),
    }))
}
