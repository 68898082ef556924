use anyhow::Context;
use dotenvy::dotenv;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;

use ticketserver::api_router::configure_routes;
use ticketserver::chat::SessionStore;
use ticketserver::config::AppConfig;
use ticketserver::llm::{is_server_running, OllamaClient};
use ticketserver::shared::state::AppState;
use ticketserver::shared::utils::create_conn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    let pool = create_conn(&config.database_url()).context("database pool")?;

    let llm = Arc::new(OllamaClient::new(
        config.llm.url.clone(),
        Duration::from_secs(config.llm.timeout_secs),
    )?);
    if !is_server_running(&config.llm.url).await {
        warn!(
            "language model endpoint {} is not responding; classification will fall back",
            config.llm.url
        );
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState {
        conn: pool,
        config,
        llm,
        chat_sessions: Arc::new(tokio::sync::Mutex::new(SessionStore::new())),
    });

    let app = configure_routes()
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!("ticketserver listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await.context("bind")?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server")?;

    Ok(())
}
