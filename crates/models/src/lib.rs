// Core modules
pub mod tenant;

// Tenant-database entities
pub mod customer;
pub mod expense;

// Re-export commonly used types
pub use tenant::{Tenant, TenantSummary};
pub use customer::{Customer, CreateCustomer, UpdateCustomer, CustomerPage};
pub use expense::{Expense, CreateExpense, UpdateExpense};
