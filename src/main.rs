use std::sync::Arc;

use chatproxy::{llm, routes, state};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);

    let config = match llm::config::LlmConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid LLM configuration");
            std::process::exit(1);
        }
    };
    if config.api_key.is_none() {
        tracing::warn!(var = %config.api_key_var, "API key not set; every completion will fall back");
    }

    let llm = match llm::LlmClient::from_config(config) {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            client
        }
        Err(e) => {
            tracing::error!(error = %e, "LLM client build failed");
            std::process::exit(1);
        }
    };

    let state = state::AppState::new(Arc::new(llm));
    let app = routes::app(state);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%port, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(%port, "chatproxy listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
