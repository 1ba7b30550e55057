//! Tenant Database Context Resolver
//!
//! Builds the data-access context for "the current tenant":
//!
//! 1. read the tenant from the request's [`TenantAccessor`] (fail fast if none)
//! 2. read the tenant's connection string (enriched with the tenant code on failure)
//! 3. ask the [`DbContextFactory`] for a brand new context targeting exactly that string
//!
//! The resolver keeps no reference to the contexts it returns.

use crate::context::TenantAccessor;
use crate::error::{ResolutionError, Result};
use hms_database::{DbContextFactory, TenantDbContext};
use serde::Serialize;

#[derive(Clone)]
pub struct TenantDbContextResolver {
    factory: DbContextFactory,
}

/// Outcome of a tenant database connectivity check
#[derive(Debug, Clone, Serialize)]
pub struct TenantConnectionStatus {
    pub tenant_code: String,
    pub expected_database: Option<String>,
    pub actual_database: Option<String>,
    pub connected: bool,
    pub database_matches: bool,
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TenantDbContextResolver {
    pub fn new(factory: DbContextFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &DbContextFactory {
        &self.factory
    }

    /// Fresh context bound to the current tenant's database
    pub async fn get_current_db_context(&self, accessor: &TenantAccessor) -> Result<TenantDbContext> {
        let tenant = accessor.get_tenant()?;
        let connection_string = accessor.get_tenant_connection_string()?;

        let context = self
            .factory
            .create(&tenant.code, &connection_string)
            .await
            .map_err(|source| {
                tracing::error!(
                    tenant_code = %tenant.code,
                    database = tenant.database_name.as_deref().unwrap_or("-"),
                    "Failed to build database context: {}",
                    source
                );
                ResolutionError::ContextConstruction {
                    tenant_code: tenant.code.clone(),
                    source,
                }
            })?;

        tracing::debug!(
            context_id = %context.id(),
            tenant_code = %tenant.code,
            database = context.database().unwrap_or("-"),
            host = context.host(),
            "Created tenant database context"
        );

        Ok(context)
    }

    /// Connect to the current tenant's database and check it is the expected one
    ///
    /// Resolution failures are returned as errors; connection failures are
    /// reported in the status.
    pub async fn validate_tenant_connection(
        &self,
        accessor: &TenantAccessor,
    ) -> Result<TenantConnectionStatus> {
        let context = self.get_current_db_context(accessor).await?;
        let tenant = accessor.get_tenant()?;

        let expected = tenant
            .usable_database_name()
            .or(context.database())
            .map(str::to_string);

        let mut status = TenantConnectionStatus {
            tenant_code: tenant.code.clone(),
            expected_database: expected.clone(),
            actual_database: None,
            connected: false,
            database_matches: false,
            latency_ms: None,
            error: None,
        };

        let check = match expected.as_deref() {
            Some(expected) => context.verify_target(expected).await,
            None => return Ok(status),
        };

        match check {
            Ok(check) => {
                status.connected = true;
                status.database_matches = check.matches;
                status.actual_database = Some(check.actual);
                status.latency_ms = Some(check.latency_ms);
                if !check.matches {
                    tracing::warn!(
                        "Tenant {} is connected to database {:?}, expected {:?}",
                        tenant.code,
                        status.actual_database,
                        status.expected_database
                    );
                }
            }
            Err(e) => {
                tracing::warn!("Tenant {} database check failed: {}", tenant.code, e);
                status.error = Some(if context.detailed_errors() {
                    e.to_string()
                } else {
                    "Cannot connect to tenant database".to_string()
                });
            }
        }

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TenantResolver;
    use crate::error::UnresolvedReason;
    use hms_database::{DbContextOptions, InMemoryTenantDirectory, TenantServerSettings};
    use hms_models::Tenant;
    use std::sync::Arc;

    fn server() -> TenantServerSettings {
        TenantServerSettings {
            server: Some("db.hotels.internal".to_string()),
            port: None,
            user_id: Some("hotel_app".to_string()),
            password: Some("pw".to_string()),
            ssl_mode: None,
        }
    }

    fn tenants() -> Vec<Tenant> {
        vec![
            Tenant::new(1, "HOTEL001", "Hotel One").with_database("hotel001_db"),
            Tenant::new(2, "HOTEL002", "Hotel Two")
                .with_database("hotel002_db")
                .with_connection_string("Server=other.internal;Database=custom_db;User Id=u;Password=p"),
            Tenant::new(3, "HOTEL003", "Hotel Three"),
            Tenant::new(4, "HOTEL004", "Hotel Four").with_connection_string("Server=x;Database=custom_db;..."),
        ]
    }

    fn setup() -> (TenantResolver, TenantDbContextResolver) {
        let directory = InMemoryTenantDirectory::new(tenants());
        let resolver = TenantResolver::new(Arc::new(directory), server());
        let contexts = TenantDbContextResolver::new(DbContextFactory::new(DbContextOptions::default()));
        (resolver, contexts)
    }

    #[tokio::test]
    async fn test_context_targets_directory_entry() {
        let (resolver, contexts) = setup();

        for tenant in tenants().into_iter().filter(|t| t.code == "HOTEL001" || t.code == "HOTEL002") {
            let accessor = resolver.resolve(Some(&tenant.code)).await.unwrap();
            let expected = accessor.get_tenant_connection_string().unwrap();
            let context = contexts.get_current_db_context(&accessor).await.unwrap();

            assert_eq!(context.connection_string(), expected);
            assert_eq!(context.tenant_code(), tenant.code);
        }
    }

    #[tokio::test]
    async fn test_explicit_string_wins_over_database_name() {
        let (resolver, contexts) = setup();
        let accessor = resolver.resolve(Some("HOTEL002")).await.unwrap();
        let context = contexts.get_current_db_context(&accessor).await.unwrap();

        assert_eq!(context.database(), Some("custom_db"));
        assert_eq!(context.host(), "other.internal");
    }

    #[tokio::test]
    async fn test_two_calls_yield_independent_contexts() {
        let (resolver, contexts) = setup();
        let accessor = resolver.resolve(Some("HOTEL001")).await.unwrap();

        let first = contexts.get_current_db_context(&accessor).await.unwrap();
        let second = contexts.get_current_db_context(&accessor).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(first.database(), Some("hotel001_db"));
        assert_eq!(second.database(), Some("hotel001_db"));
    }

    #[tokio::test]
    async fn test_unresolved_request_constructs_no_context() {
        let (resolver, contexts) = setup();

        let err = contexts
            .get_current_db_context(&resolver.unresolved())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolutionError::TenantNotResolved(UnresolvedReason::NotAttached)));
        assert_eq!(contexts.factory().stats().contexts_created, 0);
    }

    #[tokio::test]
    async fn test_tenant_without_target_constructs_no_context() {
        let (resolver, contexts) = setup();
        let accessor = resolver.resolve(Some("HOTEL003")).await.unwrap();

        let err = contexts.get_current_db_context(&accessor).await.unwrap_err();
        assert!(matches!(err, ResolutionError::ConnectionResolution { .. }));
        assert_eq!(contexts.factory().stats().contexts_created, 0);
    }

    #[tokio::test]
    async fn test_malformed_string_is_context_construction_error() {
        let (resolver, contexts) = setup();
        let accessor = resolver.resolve(Some("HOTEL004")).await.unwrap();

        // The accessor returns the string verbatim; building the context rejects it
        assert_eq!(
            accessor.get_tenant_connection_string().unwrap(),
            "Server=x;Database=custom_db;..."
        );
        let err = contexts.get_current_db_context(&accessor).await.unwrap_err();
        assert!(matches!(
            err,
            ResolutionError::ContextConstruction { ref tenant_code, .. } if tenant_code == "HOTEL004"
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tenants_never_cross() {
        let (resolver, contexts) = setup();
        let mut handles = Vec::new();

        for i in 0..64 {
            let resolver = resolver.clone();
            let contexts = contexts.clone();
            let (code, database) = if i % 2 == 0 {
                ("HOTEL001", "hotel001_db")
            } else {
                ("HOTEL002", "custom_db")
            };

            handles.push(tokio::spawn(async move {
                let accessor = resolver.resolve(Some(code)).await.unwrap();
                tokio::task::yield_now().await;
                let context = contexts.get_current_db_context(&accessor).await.unwrap();
                tokio::task::yield_now().await;
                (code, database, context)
            }));
        }

        for handle in handles {
            let (code, database, context) = handle.await.unwrap();
            assert_eq!(context.tenant_code(), code);
            assert_eq!(context.database(), Some(database));
        }
        assert_eq!(contexts.factory().stats().contexts_created, 64);
    }
}
