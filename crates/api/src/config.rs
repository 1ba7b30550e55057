use hms_database::{DatabaseConfig, DbContextOptions, DirectoryCacheConfig, TenantServerSettings};
use hms_tenant::QueueSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub database: DatabaseConfig,
    pub tenant_server: TenantServerSettings,
    pub directory_cache: DirectoryCacheConfig,
    pub db_context: DbContextOptions,
    pub queue: QueueSettings,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "production".to_string()),
            database: DatabaseConfig::from_env(),
            tenant_server: TenantServerSettings::from_env(),
            directory_cache: DirectoryCacheConfig::from_env(),
            db_context: DbContextOptions::from_env(),
            queue: QueueSettings::from_env(),
        }
    }
}
