//! edupanel web server
//!
//! Run with: cargo run -p edupanel-web

use edupanel_config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("edupanel_web=debug,edupanel_client=debug,info")),
        )
        .init();

    info!("Starting edupanel {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!(
        chat = %config.backends.chat_base_url,
        staff = %config.backends.staff_base_url,
        analysis = %config.backends.analysis_base_url,
        "Backends configured"
    );
    info!("Chat overlap policy: {:?}", config.chat.overlap_policy);

    let bind = config.server.bind.clone();
    let state = edupanel_web::state::AppState::new(config)?;
    let app = edupanel_web::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
