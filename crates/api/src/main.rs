// Hotel API Server
// Main entry point for the multi-tenant hotel management REST API

use anyhow::Context;
use dotenvy::dotenv;
use hms_api::{config::Config, routes, AppState};
use hms_database::{
    CachedTenantDirectory, Database, DbContextFactory, PgTenantDirectory,
};
use hms_tenant::{TenantDbContextResolver, TenantResolver};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,hms_api=debug,hms_tenant=debug,tower_http=debug")
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    init_tracing();

    tracing::info!("🚀 Starting Hotel API Server");
    tracing::info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    tracing::info!("🌍 Environment: {}", config.environment);
    tracing::info!("🔌 Server: {}:{}", config.server_host, config.server_port);
    tracing::info!(
        "🏨 Tenant database server: {}",
        config.tenant_server.server_name().unwrap_or("<not configured>")
    );
    if config.db_context.detailed_errors {
        tracing::warn!("Detailed database errors are enabled");
    }

    // Master database (tenant directory)
    tracing::info!("🗄️  Connecting to master database...");
    let database = Database::new(config.database.clone())
        .await
        .context("Failed to connect to master database")?;
    database.ping().await.context("Master database ping failed")?;
    tracing::info!("✅ Master database connected");

    let directory = CachedTenantDirectory::new(
        PgTenantDirectory::new(database.pool().clone()),
        config.directory_cache.clone(),
    );
    tracing::info!(
        "📇 Tenant directory cache: {} entries, ttl {:?}",
        config.directory_cache.capacity,
        config.directory_cache.ttl
    );

    let tenant_resolver = TenantResolver::new(Arc::new(directory), config.tenant_server.clone());
    let context_resolver =
        TenantDbContextResolver::new(DbContextFactory::new(config.db_context.clone()));

    let state = Arc::new(AppState {
        tenant_resolver,
        context_resolver,
        queue_defaults: config.queue.clone(),
    });

    let app = routes::create_router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    tracing::info!("📡 Routes configured:");
    tracing::info!("   GET  /health");
    tracing::info!("   GET  /api/health/tenant");
    tracing::info!("   GET  /api/tenant/hotels");
    tracing::info!("   GET  /api/hotel/current");
    tracing::info!("   *    /api/customers");
    tracing::info!("   *    /api/expenses");

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("✅ Server ready at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
