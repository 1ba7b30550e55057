pub mod customers;
pub mod expenses;
pub mod health;
pub mod hotel;
pub mod tenant;

// Re-export common types
pub use crate::error::ErrorResponse;
