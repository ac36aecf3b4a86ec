//! Example: Issuing, inspecting and invalidating tokens stored in Redis
//!
//! Reads configuration the same way a service would (`.env`, optional
//! `config.<environment>.toml`, `TOKENKEEP_*` variables).
//!
//! Run with: cargo run --example token_lifecycle_demo -p tk_infra

use serde_json::json;

use tk_core::services::token::{TokenService, TokenServiceConfig};
use tk_infra::init_tracing;
use tk_shared::config::LoggingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(&LoggingConfig::default())?;

    println!("=== Token Lifecycle Demo ===\n");

    println!("Connecting to Redis...");
    let services = tk_infra::initialize().await?;
    let service = services.token_service();
    let token_config = TokenServiceConfig::from(&services.config().token);
    println!("✓ Redis connected\n");

    let access = token_config
        .access_parameters("demo-user")
        .with_claim("role", "admin")
        .build()?;

    println!("1. Issuing an access token");
    let first = service.create(&access).await?;
    println!("   subject: {}", service.subject(&first)?);
    println!("   type:    {}", service.token_type(&first)?);
    println!("   admin:   {}", service.has(&first, "role", &json!("admin"))?);
    println!("   expired: {}\n", service.is_expired(&first)?);

    println!("2. Issuing again returns the stored token");
    let again = service.create(&access).await?;
    println!("   same token: {}\n", first == again);

    println!("3. Invalidating");
    let removed = service.invalidate_token(&first).await?;
    println!("   removed: {}", removed);
    println!("   still active: {}\n", service.is_active(&first, &access).await?);

    println!("4. Issuing after invalidation mints a new token");
    let second = service.create(&access).await?;
    println!("   new token differs: {}", second != first);

    service.invalidate(&access).await?;
    println!("\n=== Demo Complete ===");
    Ok(())
}
