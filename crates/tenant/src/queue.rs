// Partner queue settings
// Process-wide defaults from the environment, overridden per tenant

use hms_models::Tenant;
use serde::Serialize;

pub const MIN_WORKER_INTERVAL_SECONDS: u32 = 5;
pub const MIN_WORKER_BATCH_SIZE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueSettings {
    pub enable_queue_mode: bool,
    pub enable_background_worker: bool,
    pub worker_interval_seconds: u32,
    pub worker_batch_size: u32,
    pub use_middleware: bool,
    pub default_partner: String,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            enable_queue_mode: false,
            enable_background_worker: false,
            worker_interval_seconds: 180,
            worker_batch_size: 50,
            use_middleware: false,
            default_partner: "Zaaer".to_string(),
        }
    }
}

impl QueueSettings {
    /// Defaults from PARTNER_QUEUE_* environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let flag = |key: &str| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(false)
        };

        Self {
            enable_queue_mode: flag("PARTNER_QUEUE_ENABLE_QUEUE_MODE"),
            enable_background_worker: flag("PARTNER_QUEUE_ENABLE_BACKGROUND_WORKER"),
            worker_interval_seconds: std::env::var("PARTNER_QUEUE_WORKER_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.worker_interval_seconds)
                .max(MIN_WORKER_INTERVAL_SECONDS),
            worker_batch_size: std::env::var("PARTNER_QUEUE_WORKER_BATCH_SIZE")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.worker_batch_size)
                .max(MIN_WORKER_BATCH_SIZE),
            use_middleware: flag("PARTNER_QUEUE_USE_MIDDLEWARE"),
            default_partner: std::env::var("PARTNER_QUEUE_DEFAULT_PARTNER")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.default_partner),
        }
    }

    /// Effective settings for a tenant: its overrides over these defaults
    pub fn resolve_for_tenant(&self, tenant: Option<&Tenant>) -> QueueSettings {
        let Some(tenant) = tenant else {
            return self.clone();
        };

        let clamp = |value: Option<i32>, default: u32, min: u32| {
            value
                .map(|v| u32::try_from(v).unwrap_or(0).max(min))
                .unwrap_or(default)
        };

        QueueSettings {
            enable_queue_mode: tenant.enable_queue_mode.unwrap_or(self.enable_queue_mode),
            enable_background_worker: tenant
                .enable_queue_worker
                .unwrap_or(self.enable_background_worker),
            worker_interval_seconds: clamp(
                tenant.queue_worker_interval_seconds,
                self.worker_interval_seconds,
                MIN_WORKER_INTERVAL_SECONDS,
            ),
            worker_batch_size: clamp(
                tenant.queue_worker_batch_size,
                self.worker_batch_size,
                MIN_WORKER_BATCH_SIZE,
            ),
            use_middleware: tenant.use_queue_middleware.unwrap_or(self.use_middleware),
            default_partner: tenant
                .default_partner
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| self.default_partner.clone()),
        }
    }
}
