use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Hotel (tenant) record from the master database `tenants` table
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: i32,
    pub code: String,
    pub name: String,

    /// Explicit override; when absent the connection string is composed
    /// from `database_name` and the shared tenant server settings.
    #[serde(skip_serializing)]
    pub connection_string: Option<String>,
    pub database_name: Option<String>,
    pub base_url: Option<String>,

    // Partner queue overrides
    pub enable_queue_mode: Option<bool>,
    pub enable_queue_worker: Option<bool>,
    pub queue_worker_interval_seconds: Option<i32>,
    pub queue_worker_batch_size: Option<i32>,
    pub use_queue_middleware: Option<bool>,
    pub default_partner: Option<String>,
}

impl fmt::Debug for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tenant")
            .field("id", &self.id)
            .field("code", &self.code)
            .field("name", &self.name)
            .field("connection_string", &self.connection_string.as_ref().map(|_| "***"))
            .field("database_name", &self.database_name)
            .field("base_url", &self.base_url)
            .field("enable_queue_mode", &self.enable_queue_mode)
            .field("enable_queue_worker", &self.enable_queue_worker)
            .field("queue_worker_interval_seconds", &self.queue_worker_interval_seconds)
            .field("queue_worker_batch_size", &self.queue_worker_batch_size)
            .field("use_queue_middleware", &self.use_queue_middleware)
            .field("default_partner", &self.default_partner)
            .finish()
    }
}

impl Tenant {
    pub fn new(id: i32, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            connection_string: None,
            database_name: None,
            base_url: None,
            enable_queue_mode: None,
            enable_queue_worker: None,
            queue_worker_interval_seconds: None,
            queue_worker_batch_size: None,
            use_queue_middleware: None,
            default_partner: None,
        }
    }

    pub fn with_database(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = Some(database_name.into());
        self
    }

    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Explicit connection string, ignoring blank values
    pub fn explicit_connection_string(&self) -> Option<&str> {
        self.connection_string
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Database name usable for composing a connection string
    pub fn usable_database_name(&self) -> Option<&str> {
        self.database_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn summary(&self) -> TenantSummary {
        TenantSummary {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

/// Public projection of a tenant, safe to return from admin endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TenantSummary {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub base_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_connection_string_is_not_explicit() {
        let tenant = Tenant::new(1, "HOTEL001", "Hotel One").with_connection_string("   ");
        assert_eq!(tenant.explicit_connection_string(), None);

        let tenant = tenant.with_connection_string("Server=x;Database=custom_db");
        assert_eq!(
            tenant.explicit_connection_string(),
            Some("Server=x;Database=custom_db")
        );
    }

    #[test]
    fn test_usable_database_name_is_trimmed() {
        let tenant = Tenant::new(1, "HOTEL001", "Hotel One").with_database("  hotel001_db ");
        assert_eq!(tenant.usable_database_name(), Some("hotel001_db"));

        let tenant = Tenant::new(2, "HOTEL002", "Hotel Two").with_database("");
        assert_eq!(tenant.usable_database_name(), None);
    }

    #[test]
    fn test_debug_redacts_connection_string() {
        let tenant = Tenant::new(2, "HOTEL002", "Hotel Two")
            .with_database("hotel002_db")
            .with_connection_string("Server=x;Database=custom_db;User Id=u;Password=secret");
        let rendered = format!("{:?}", tenant);
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("Server=x"));
        assert!(rendered.contains("connection_string: Some(\"***\")"));
        assert!(rendered.contains("hotel002_db"));

        let rendered = format!("{:?}", Tenant::new(1, "HOTEL001", "Hotel One"));
        assert!(rendered.contains("connection_string: None"));
    }

    #[test]
    fn test_connection_string_is_not_serialized() {
        let tenant = Tenant::new(1, "HOTEL002", "Hotel Two")
            .with_connection_string("Server=x;Password=secret");
        let json = serde_json::to_value(&tenant).unwrap();
        assert!(json.get("connection_string").is_none());
        assert_eq!(json["code"], "HOTEL002");
    }
}
