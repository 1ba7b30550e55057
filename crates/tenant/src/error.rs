use hms_database::DatabaseError;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolutionError>;

/// Why no tenant is attached to the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// The request carried no (or a blank) hotel code
    MissingCode,
    /// The hotel code is not in the tenant directory
    UnknownCode(String),
    /// Resolution never ran for this request (exempt path, background work)
    NotAttached,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCode => write!(f, "hotel code is missing"),
            Self::UnknownCode(code) => write!(f, "hotel '{}' not found", code),
            Self::NotAttached => write!(f, "no tenant attached to this request"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Tenant not resolved: {0}")]
    TenantNotResolved(UnresolvedReason),

    #[error("Tenant directory unavailable: {0}")]
    DirectoryUnavailable(#[source] DatabaseError),

    #[error("Cannot resolve connection for tenant {tenant_code}: {reason}")]
    ConnectionResolution { tenant_code: String, reason: String },

    #[error("Failed to build database context for tenant {tenant_code}: {source}")]
    ContextConstruction {
        tenant_code: String,
        #[source]
        source: DatabaseError,
    },
}

impl ResolutionError {
    pub fn not_resolved(reason: UnresolvedReason) -> Self {
        Self::TenantNotResolved(reason)
    }

    pub fn is_not_resolved(&self) -> bool {
        matches!(self, Self::TenantNotResolved(_))
    }

    /// Tenant code the failure relates to, when one is known
    pub fn tenant_code(&self) -> Option<&str> {
        match self {
            Self::TenantNotResolved(UnresolvedReason::UnknownCode(code)) => Some(code),
            Self::ConnectionResolution { tenant_code, .. }
            | Self::ContextConstruction { tenant_code, .. } => Some(tenant_code),
            _ => None,
        }
    }
}
