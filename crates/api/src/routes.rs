use crate::handlers;
use crate::middleware;
use crate::AppState;
use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .route("/api/health/tenant", get(handlers::health::tenant_health))
        // Tenant directory administration (no hotel code)
        .route("/api/tenant/hotels", get(handlers::tenant::list_hotels))
        .route("/api/tenant/hotels/:code", get(handlers::tenant::get_hotel))
        .route("/api/tenant/cache/invalidate", post(handlers::tenant::invalidate_cache))
        .route("/api/tenant/stats", get(handlers::tenant::stats))
        // Current hotel
        .route("/api/hotel/current", get(handlers::hotel::current_hotel))
        // Customers
        .route(
            "/api/customers",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route("/api/customers/search", get(handlers::customers::search_customers))
        .route(
            "/api/customers/by-number/:customer_no",
            get(handlers::customers::get_customer_by_number),
        )
        .route(
            "/api/customers/:id",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        // Expenses
        .route(
            "/api/expenses",
            get(handlers::expenses::list_expenses).post(handlers::expenses::create_expense),
        )
        .route(
            "/api/expenses/:id",
            get(handlers::expenses::get_expense)
                .put(handlers::expenses::update_expense)
                .delete(handlers::expenses::delete_expense),
        )
        .layer(from_fn_with_state(state.clone(), middleware::resolve_tenant))
        .with_state(state)
}
