// Tenant resolution and per-request database routing
//
// The middleware resolves a `TenantAccessor` once per request from the hotel
// code header; services ask the `TenantDbContextResolver` for a fresh
// `TenantDbContext` bound to that hotel's database.

pub mod context;
pub mod error;
pub mod extractor;
pub mod queue;
pub mod resolver;

pub use context::{TenantAccessor, TenantResolver};
pub use error::{ResolutionError, Result, UnresolvedReason};
pub use extractor::{is_tenant_exempt, TenantExtractor, HOTEL_CODE_HEADER};
pub use queue::QueueSettings;
pub use resolver::{TenantConnectionStatus, TenantDbContextResolver};
