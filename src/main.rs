//! docchat - terminal client for a document-chat service
//!
//! Maintains conversation state against a remote API with optimistic
//! updates, driven by an explicit state machine.

mod api;
mod auth;
mod config;
mod runtime;
mod store;
mod tui;

use api::ApiClient;
use auth::StaticTokenProvider;
use config::ClientConfig;
use runtime::StoreRuntime;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    init_logging(&config)?;

    let tokens = Arc::new(StaticTokenProvider::new(config.id_token.clone()));
    let client = ApiClient::new(config.api_endpoint.clone(), tokens);
    let handle = StoreRuntime::spawn(client);

    // The conversation id argument plays the role of the entry URL.
    let initial_route = std::env::args().nth(1);

    tracing::info!(endpoint = %config.api_endpoint, "Starting docchat");
    tui::run(handle, initial_route).await?;

    Ok(())
}

/// Tracing goes to a file; stdout belongs to the terminal UI.
fn init_logging(config: &ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = config.log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("DOCCHAT_LOG")
                .unwrap_or_else(|_| "docchat=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Arc::new(log_file))
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    Ok(())
}
