pub mod connection;
pub mod connection_string;
pub mod context;
pub mod error;
pub mod repositories;
pub mod tenant_directory;

pub use connection::{Database, DatabaseConfig};
pub use connection_string::{parse_connection_string, TenantServerSettings};
pub use context::{ConnectionCheck, DbContextFactory, DbContextOptions, DbContextStats, TenantDbContext};
pub use error::{DatabaseError, Result};
pub use repositories::{
    customers::CustomerRepository,
    expenses::ExpenseRepository,
    hotel_settings::HotelSettingsRepository,
};
pub use tenant_directory::{
    CachedTenantDirectory, DirectoryCacheConfig, InMemoryTenantDirectory, PgTenantDirectory,
    TenantDirectory,
};
