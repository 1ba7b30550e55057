//! Tenant Database Contexts
//!
//! A [`TenantDbContext`] is a data-access handle bound to exactly one tenant
//! database. [`DbContextFactory`] builds a new one for every unit of work:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      DbContextFactory                         │
//! │   connection string ──► parse ──► PgConnectOptions            │
//! │                                        │                      │
//! │   ┌────────────────────────────────────▼──────────────────┐   │
//! │   │  Connection pools keyed by exact connection string    │   │
//! │   │  (lazy, TTL-evicted; never shared across strings)     │   │
//! │   └────────────────────────────────────┬──────────────────┘   │
//! │                                        ▼                      │
//! │              new TenantDbContext { id, tenant, pool }         │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The context owns nothing global: dropping it releases its pool handle and
//! any connection it holds goes back to (or is closed by) the pool.

use crate::connection_string::parse_connection_string;
use crate::error::Result;
use moka::future::Cache;
use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Options applied to every context. Environment-controlled; none of them
/// influence which database a context targets.
#[derive(Debug, Clone)]
pub struct DbContextOptions {
    /// Include driver error details in persistence errors and log statements
    pub detailed_errors: bool,
    /// Max connections per tenant database
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// How long an unused tenant pool is kept
    pub pool_ttl: Duration,
    /// Maximum number of tenant pools kept at once
    pub max_cached_pools: u64,
}

impl Default for DbContextOptions {
    fn default() -> Self {
        Self {
            detailed_errors: false,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            pool_ttl: Duration::from_secs(3600),
            max_cached_pools: 100,
        }
    }
}

impl DbContextOptions {
    /// Load options from environment variables
    ///
    /// `DB_CONTEXT_DETAILED_ERRORS` defaults to true only when
    /// `ENVIRONMENT=development`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let development = std::env::var("ENVIRONMENT")
            .map(|v| v.eq_ignore_ascii_case("development"))
            .unwrap_or(false);

        Self {
            detailed_errors: std::env::var("DB_CONTEXT_DETAILED_ERRORS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(development),
            max_connections: std::env::var("TENANT_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            acquire_timeout: std::env::var("TENANT_DB_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            idle_timeout: defaults.idle_timeout,
            pool_ttl: std::env::var("TENANT_POOL_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.pool_ttl),
            max_cached_pools: std::env::var("TENANT_POOL_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_cached_pools),
        }
    }
}

/// Data-access handle bound to one tenant database
///
/// Not `Clone`: a context belongs to the unit of work that requested it.
pub struct TenantDbContext {
    id: Uuid,
    tenant_code: String,
    connection_string: String,
    database: Option<String>,
    host: String,
    pool: PgPool,
    detailed_errors: bool,
}

impl fmt::Debug for TenantDbContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantDbContext")
            .field("id", &self.id)
            .field("tenant_code", &self.tenant_code)
            .field("database", &self.database)
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl TenantDbContext {
    /// Unique per context instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn tenant_code(&self) -> &str {
        &self.tenant_code
    }

    /// The exact connection string this context targets
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Target database name as parsed from the connection string
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn detailed_errors(&self) -> bool {
        self.detailed_errors
    }

    /// Name of the database the server actually connected us to
    pub async fn current_database(&self) -> Result<String> {
        let name: String = sqlx::query_scalar("SELECT current_database()")
            .fetch_one(&self.pool)
            .await?;
        Ok(name)
    }

    /// Connect and compare the server-reported database with `expected`
    pub async fn verify_target(&self, expected: &str) -> Result<ConnectionCheck> {
        let start = Instant::now();
        let actual = self.current_database().await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(ConnectionCheck {
            matches: actual.eq_ignore_ascii_case(expected),
            expected: expected.to_string(),
            actual,
            latency_ms,
        })
    }
}

/// Result of connecting to a tenant database and checking its name
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionCheck {
    pub expected: String,
    pub actual: String,
    pub matches: bool,
    pub latency_ms: u64,
}

/// Factory statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbContextStats {
    pub contexts_created: u64,
    pub pooled_targets: u64,
    pub max_pooled_targets: u64,
}

/// Builds a fresh [`TenantDbContext`] per call
#[derive(Clone)]
pub struct DbContextFactory {
    options: DbContextOptions,
    /// Pools keyed by the exact connection string
    pools: Cache<String, PgPool>,
    contexts_created: Arc<AtomicU64>,
}

impl DbContextFactory {
    pub fn new(options: DbContextOptions) -> Self {
        let pools = Cache::builder()
            .max_capacity(options.max_cached_pools)
            .time_to_idle(options.pool_ttl)
            .build();

        Self {
            options,
            pools,
            contexts_created: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn options(&self) -> &DbContextOptions {
        &self.options
    }

    /// Create a new context targeting `connection_string`
    ///
    /// Parsing failures surface as [`crate::DatabaseError::InvalidConnectionString`].
    /// No connection is opened here; the first query connects.
    pub async fn create(&self, tenant_code: &str, connection_string: &str) -> Result<TenantDbContext> {
        let connect_options = parse_connection_string(connection_string)?;
        let database = connect_options.get_database().map(str::to_string);
        let host = connect_options.get_host().to_string();

        let pool = self
            .pools
            .get_with_by_ref(connection_string, async {
                tracing::info!(
                    "Creating connection pool for tenant {} ({}/{})",
                    tenant_code,
                    host,
                    database.as_deref().unwrap_or("-")
                );
                self.build_pool(connect_options)
            })
            .await;

        self.contexts_created.fetch_add(1, Ordering::Relaxed);

        Ok(TenantDbContext {
            id: Uuid::new_v4(),
            tenant_code: tenant_code.to_string(),
            connection_string: connection_string.to_string(),
            database,
            host,
            pool,
            detailed_errors: self.options.detailed_errors,
        })
    }

    /// Close and drop the pool for a connection string, e.g. after a tenant's
    /// database moved. Returns whether a pool was cached for it.
    pub async fn evict(&self, connection_string: &str) -> bool {
        match self.pools.remove(connection_string).await {
            Some(pool) => {
                pool.close().await;
                true
            }
            None => false,
        }
    }

    /// Close and drop every cached pool, returning how many were closed
    pub async fn evict_all(&self) -> usize {
        let pools: Vec<PgPool> = self.pools.iter().map(|(_, pool)| pool).collect();
        self.pools.invalidate_all();
        for pool in &pools {
            pool.close().await;
        }
        pools.len()
    }

    pub fn stats(&self) -> DbContextStats {
        DbContextStats {
            contexts_created: self.contexts_created.load(Ordering::Relaxed),
            pooled_targets: self.pools.entry_count(),
            max_pooled_targets: self.options.max_cached_pools,
        }
    }

    fn build_pool(&self, connect_options: PgConnectOptions) -> PgPool {
        let connect_options = if self.options.detailed_errors {
            connect_options
        } else {
            connect_options.disable_statement_logging()
        };

        PgPoolOptions::new()
            .max_connections(self.options.max_connections)
            .min_connections(0)
            .acquire_timeout(self.options.acquire_timeout)
            .idle_timeout(self.options.idle_timeout)
            .connect_lazy_with(connect_options)
    }
}
