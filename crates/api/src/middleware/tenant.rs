use crate::error::{resolution_error, ApiError};
use crate::AppState;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use hms_database::TenantDbContext;
use hms_tenant::{is_tenant_exempt, TenantAccessor, TenantExtractor};
use std::sync::Arc;

/// Middleware resolving the hotel for every request
///
/// Exempt paths get an unresolved accessor; everything else must carry a
/// known hotel code or the request ends here.
pub async fn resolve_tenant(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let accessor = if is_tenant_exempt(request.uri().path()) {
        state.tenant_resolver.unresolved()
    } else {
        let code = TenantExtractor::new().extract_code(request.headers());
        state
            .tenant_resolver
            .resolve(code.as_deref())
            .await
            .map_err(|e| resolution_error(e, state.detailed_errors()))?
    };

    request.extensions_mut().insert(accessor);

    Ok(next.run(request).await)
}

fn accessor_from_parts(parts: &Parts, state: &AppState) -> TenantAccessor {
    parts
        .extensions
        .get::<TenantAccessor>()
        .cloned()
        .unwrap_or_else(|| state.tenant_resolver.unresolved())
}

/// The hotel resolved for this request
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub TenantAccessor);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentTenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let accessor = accessor_from_parts(parts, state);
        accessor
            .get_tenant()
            .map_err(|e| resolution_error(e, state.detailed_errors()))?;
        Ok(Self(accessor))
    }
}

/// A fresh database context for this request's hotel
pub struct TenantDb(pub TenantDbContext);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for TenantDb {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let accessor = accessor_from_parts(parts, state);
        state
            .context_resolver
            .get_current_db_context(&accessor)
            .await
            .map(Self)
            .map_err(|e| resolution_error(e, state.detailed_errors()))
    }
}
