// Entity services
//
// Each service is built from one `TenantDbContext` and lives for one unit of
// work. Every operation resolves the hotel id from the tenant database's
// settings before touching hotel-scoped rows.

pub mod customer_service;
pub mod error;
pub mod expense_service;

pub use customer_service::{CustomerDetails, CustomerService};
pub use error::{Result, ServiceError};
pub use expense_service::ExpenseService;
