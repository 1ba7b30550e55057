// Tenant directory administration
// Served without a hotel code; reads the master database only

use crate::error::{api_error, ApiError};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use hms_database::DbContextStats;
use hms_models::TenantSummary;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

fn directory_error(e: hms_database::DatabaseError) -> ApiError {
    tracing::error!("Tenant directory query failed: {}", e);
    api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "directory_unavailable",
        "Failed to read the tenant directory",
    )
}

/// List all hotels
pub async fn list_hotels(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TenantSummary>>, ApiError> {
    let hotels = state
        .tenant_resolver
        .directory()
        .list()
        .await
        .map_err(directory_error)?;

    Ok(Json(hotels))
}

/// Get one hotel by code
pub async fn get_hotel(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<TenantSummary>, ApiError> {
    let tenant = state
        .tenant_resolver
        .directory()
        .find_by_code(&code)
        .await
        .map_err(directory_error)?
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                "hotel_not_found",
                &format!("Hotel with code '{}' not found", code),
            )
        })?;

    Ok(Json(tenant.summary()))
}

#[derive(Debug, Default, Deserialize)]
pub struct InvalidateRequest {
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub invalidated: String,
    /// Tenant database pools closed along with the directory entries
    pub pools_closed: usize,
}

/// Drop cached directory entries and tenant pools for one hotel, or all of them
///
/// The body is optional; an empty body invalidates everything.
pub async fn invalidate_cache(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<InvalidateResponse>, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        InvalidateRequest::default()
    } else {
        serde_json::from_slice::<InvalidateRequest>(&body).map_err(|e| {
            api_error(
                StatusCode::BAD_REQUEST,
                "invalid_input",
                &format!("Invalid request body: {}", e),
            )
        })?
    };

    let directory = state.tenant_resolver.directory();
    let factory = state.context_resolver.factory();

    let response = match request.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => {
            // Resolve the current target before the directory entry is dropped
            let connection_string = match state.tenant_resolver.resolve(Some(code)).await {
                Ok(accessor) => accessor.get_tenant_connection_string().ok(),
                Err(e) => {
                    tracing::debug!("No pool to evict for {}: {}", code, e);
                    None
                }
            };
            let pools_closed = match connection_string {
                Some(cs) if factory.evict(&cs).await => 1,
                _ => 0,
            };
            directory.invalidate(code).await;
            tracing::info!("Invalidated tenant {} ({} pool closed)", code, pools_closed);

            InvalidateResponse {
                invalidated: code.to_string(),
                pools_closed,
            }
        }
        None => {
            directory.invalidate_all().await;
            let pools_closed = factory.evict_all().await;
            tracing::info!("Invalidated all tenants ({} pools closed)", pools_closed);

            InvalidateResponse {
                invalidated: "all".to_string(),
                pools_closed,
            }
        }
    };

    Ok(Json(response))
}

/// Context factory statistics
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<DbContextStats> {
    Json(state.context_resolver.factory().stats())
}
