//! Tenant Context
//!
//! [`TenantResolver`] turns a hotel code into a [`TenantAccessor`] once per
//! request. The accessor is the request-scoped answer to "which hotel is this
//! request for" and is passed explicitly down the call chain; it is never
//! stored in process-wide state.

use crate::error::{ResolutionError, Result, UnresolvedReason};
use hms_database::{parse_connection_string, TenantDirectory, TenantServerSettings};
use hms_models::Tenant;
use std::sync::Arc;

/// Resolves hotel codes against the tenant directory
#[derive(Clone)]
pub struct TenantResolver {
    directory: Arc<dyn TenantDirectory>,
    server: Arc<TenantServerSettings>,
}

impl TenantResolver {
    pub fn new(directory: Arc<dyn TenantDirectory>, server: TenantServerSettings) -> Self {
        Self {
            directory,
            server: Arc::new(server),
        }
    }

    pub fn directory(&self) -> &Arc<dyn TenantDirectory> {
        &self.directory
    }

    /// Accessor for a request that skipped resolution
    pub fn unresolved(&self) -> TenantAccessor {
        TenantAccessor::unresolved(self.server.clone())
    }

    /// Resolve the tenant for a request's hotel code
    ///
    /// A missing code and an unknown code both fail with
    /// [`ResolutionError::TenantNotResolved`]; there is no fallback tenant.
    pub async fn resolve(&self, code: Option<&str>) -> Result<TenantAccessor> {
        let code = match code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => code,
            None => {
                tracing::warn!("Request without hotel code");
                return Err(ResolutionError::not_resolved(UnresolvedReason::MissingCode));
            }
        };

        let tenant = self.directory.find_by_code(code).await.map_err(|e| {
            tracing::error!("Tenant directory lookup failed for {}: {}", code, e);
            ResolutionError::DirectoryUnavailable(e)
        })?;

        match tenant {
            Some(tenant) => {
                tracing::info!("Resolved tenant: {} ({})", tenant.code, tenant.name);
                Ok(TenantAccessor::resolved(tenant, self.server.clone()))
            }
            None => {
                tracing::warn!("Unknown hotel code: {}", code);
                Err(ResolutionError::not_resolved(UnresolvedReason::UnknownCode(
                    code.to_string(),
                )))
            }
        }
    }
}

/// The tenant resolved for one request
///
/// Immutable once built. Cloning shares the same resolved tenant, which is
/// how the middleware hands it to handlers of the same request.
#[derive(Debug, Clone)]
pub struct TenantAccessor {
    tenant: Option<Arc<Tenant>>,
    server: Arc<TenantServerSettings>,
}

impl TenantAccessor {
    pub fn unresolved(server: Arc<TenantServerSettings>) -> Self {
        Self {
            tenant: None,
            server,
        }
    }

    pub fn resolved(tenant: Tenant, server: Arc<TenantServerSettings>) -> Self {
        Self {
            tenant: Some(Arc::new(tenant)),
            server,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.tenant.is_some()
    }

    /// The tenant for the current request
    pub fn get_tenant(&self) -> Result<&Tenant> {
        self.tenant
            .as_deref()
            .ok_or(ResolutionError::TenantNotResolved(UnresolvedReason::NotAttached))
    }

    pub fn tenant_code(&self) -> Option<&str> {
        self.tenant.as_deref().map(|t| t.code.as_str())
    }

    /// Connection string for the current tenant
    ///
    /// An explicit connection string is returned verbatim and wins over
    /// `database_name`. Otherwise the string is composed from the shared
    /// server settings and the tenant's database name.
    pub fn get_tenant_connection_string(&self) -> Result<String> {
        let tenant = self.get_tenant()?;

        if let Some(explicit) = tenant.explicit_connection_string() {
            warn_on_database_mismatch(tenant, explicit);
            return Ok(explicit.to_string());
        }

        let database = tenant.usable_database_name().ok_or_else(|| {
            tracing::error!(
                "Tenant {} has neither a connection string nor a database name",
                tenant.code
            );
            ResolutionError::ConnectionResolution {
                tenant_code: tenant.code.clone(),
                reason: "no connection string or database name configured".to_string(),
            }
        })?;

        self.server.compose(database).map_err(|e| {
            tracing::error!("Cannot compose connection string for tenant {}: {}", tenant.code, e);
            ResolutionError::ConnectionResolution {
                tenant_code: tenant.code.clone(),
                reason: e.to_string(),
            }
        })
    }
}

fn warn_on_database_mismatch(tenant: &Tenant, explicit: &str) {
    let Some(expected) = tenant.usable_database_name() else {
        return;
    };
    let Ok(options) = parse_connection_string(explicit) else {
        return;
    };
    if let Some(actual) = options.get_database() {
        if !actual.eq_ignore_ascii_case(expected) {
            tracing::warn!(
                "Tenant {} connection string targets database {} but database_name is {}; using the connection string",
                tenant.code,
                actual,
                expected
            );
        }
    }
}
