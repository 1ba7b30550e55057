//! Tenant Directory
//!
//! Lookup of hotels (tenants) by code in the master database. Codes are
//! matched case-insensitively. [`CachedTenantDirectory`] adds a process-wide
//! TTL cache in front of any directory, with explicit invalidation.

use crate::error::Result;
use async_trait::async_trait;
use hms_models::{Tenant, TenantSummary};
use moka::future::Cache;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait TenantDirectory: Send + Sync {
    /// Find a tenant by code (case-insensitive)
    async fn find_by_code(&self, code: &str) -> Result<Option<Tenant>>;

    /// List all tenants ordered by id
    async fn list(&self) -> Result<Vec<TenantSummary>>;

    /// Drop any cached entry for `code`
    async fn invalidate(&self, _code: &str) {}

    /// Drop all cached entries
    async fn invalidate_all(&self) {}
}

const TENANT_COLUMNS: &str = r#"
    id, code, name, connection_string, database_name, base_url,
    enable_queue_mode, enable_queue_worker,
    queue_worker_interval_seconds, queue_worker_batch_size,
    use_queue_middleware, default_partner
"#;

/// Directory backed by the master database `tenants` table
#[derive(Clone)]
pub struct PgTenantDirectory {
    pool: PgPool,
}

impl PgTenantDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn find_by_code(&self, code: &str) -> Result<Option<Tenant>> {
        let query = format!(
            "SELECT {} FROM tenants WHERE LOWER(code) = LOWER($1) LIMIT 1",
            TENANT_COLUMNS
        );

        let tenant = sqlx::query_as::<_, Tenant>(&query)
            .bind(code.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(tenant)
    }

    async fn list(&self) -> Result<Vec<TenantSummary>> {
        let tenants = sqlx::query_as::<_, TenantSummary>(
            "SELECT id, code, name, base_url FROM tenants ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tenants)
    }
}

/// Directory held in memory, for local development and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantDirectory {
    tenants: HashMap<String, Tenant>,
}

impl InMemoryTenantDirectory {
    pub fn new(tenants: impl IntoIterator<Item = Tenant>) -> Self {
        let tenants = tenants
            .into_iter()
            .map(|t| (t.code.to_lowercase(), t))
            .collect();
        Self { tenants }
    }
}

#[async_trait]
impl TenantDirectory for InMemoryTenantDirectory {
    async fn find_by_code(&self, code: &str) -> Result<Option<Tenant>> {
        Ok(self.tenants.get(&code.trim().to_lowercase()).cloned())
    }

    async fn list(&self) -> Result<Vec<TenantSummary>> {
        let mut tenants: Vec<TenantSummary> = self.tenants.values().map(Tenant::summary).collect();
        tenants.sort_by_key(|t| t.id);
        Ok(tenants)
    }
}

/// Configuration for the directory cache
#[derive(Debug, Clone)]
pub struct DirectoryCacheConfig {
    /// Maximum number of tenants to cache
    pub capacity: u64,
    /// Time-to-live for cached tenants
    pub ttl: Duration,
}

impl Default for DirectoryCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl: Duration::from_secs(300),
        }
    }
}

impl DirectoryCacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: std::env::var("TENANT_DIRECTORY_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.capacity),
            ttl: std::env::var("TENANT_DIRECTORY_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
        }
    }
}

/// TTL cache in front of another directory. Only hits are cached, so a newly
/// registered hotel is visible on its first request.
pub struct CachedTenantDirectory<D> {
    inner: Arc<D>,
    cache: Cache<String, Tenant>,
}

impl<D: TenantDirectory> CachedTenantDirectory<D> {
    pub fn new(inner: D, config: DirectoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.ttl)
            .build();

        Self {
            inner: Arc::new(inner),
            cache,
        }
    }
}

#[async_trait]
impl<D: TenantDirectory + 'static> TenantDirectory for CachedTenantDirectory<D> {
    async fn find_by_code(&self, code: &str) -> Result<Option<Tenant>> {
        let key = code.trim().to_lowercase();
        if let Some(tenant) = self.cache.get(&key).await {
            return Ok(Some(tenant));
        }

        let tenant = self.inner.find_by_code(&key).await?;
        if let Some(tenant) = &tenant {
            self.cache.insert(key, tenant.clone()).await;
        }
        Ok(tenant)
    }

    async fn list(&self) -> Result<Vec<TenantSummary>> {
        self.inner.list().await
    }

    async fn invalidate(&self, code: &str) {
        self.cache.invalidate(&code.trim().to_lowercase()).await;
        tracing::info!("Invalidated cached tenant: {}", code);
    }

    async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        tracing::info!("Invalidated all cached tenants");
    }
}
