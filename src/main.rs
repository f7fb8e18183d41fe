use std::sync::Arc;

use anyhow::Context;

use property_manager_api::store::supabase::Supabase;
use property_manager_api::{app, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL and friends.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting Property Manager API in {:?} mode", config.environment);

    let supabase = Arc::new(
        Supabase::new(
            &config.supabase.url,
            &config.supabase.anon_key,
            &config.supabase.storage_bucket,
        )
        .context("invalid Supabase configuration")?,
    );
    let state = AppState::new(supabase.clone(), supabase.clone(), supabase);

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    println!("🚀 Property Manager API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
