// Hotel API
// REST surface over the per-tenant hotel databases

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use hms_tenant::{QueueSettings, TenantDbContextResolver, TenantResolver};

pub struct AppState {
    pub tenant_resolver: TenantResolver,
    pub context_resolver: TenantDbContextResolver,
    pub queue_defaults: QueueSettings,
}

impl AppState {
    /// Whether error bodies may carry driver and parser detail
    pub fn detailed_errors(&self) -> bool {
        self.context_resolver.factory().options().detailed_errors
    }
}
