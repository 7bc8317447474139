//! wspool Server
//!
//! Demo chat hub on top of the connection pool.
//!
//! Run with: cargo run --bin wspool -- --config config.toml
//!
//! Clients send JSON messages:
//! - `{"type": "auth", "token": "..."}` - fill the connection's auth slot
//! - `{"type": "bye"}` - close the connection
//! - anything else is broadcast to every client as
//!   `{"type": "message", "from": "<client id>", "data": ...}`

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wspool::config::{generate_default_config, Config, LoggingConfig};
use wspool::{AppState, Client, Pool, PoolHandler};

#[derive(Parser)]
#[command(name = "wspool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "WebSocket connection pool demo server")]
struct Cli {
    /// Path to a TOML config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

/// Control messages understood by the chat hub
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Control {
    Auth { token: String },
    Bye,
}

/// Broadcasts every message to every client
struct ChatHandler;

#[async_trait]
impl PoolHandler for ChatHandler {
    async fn on_connect(&self, client: &Arc<Client>) {
        tracing::info!(client_id = %client.id(), remote = ?client.remote_addr(), "Client joined");
        let welcome = json!({"type": "welcome", "id": client.id().to_string()});
        if let Err(e) = client.send(&welcome).await {
            tracing::warn!(client_id = %client.id(), error = %e, "Failed to greet client");
        }
    }

    async fn on_disconnect(&self, client: &Arc<Client>) {
        let left = json!({"type": "left", "id": client.id().to_string()});
        if let Err(e) = client.pool().broadcast(&left).await {
            tracing::warn!(error = %e, "Failed to announce departure");
        }
    }

    async fn on_message(&self, client: &Arc<Client>, payload: &[u8]) -> bool {
        match serde_json::from_slice::<Control>(payload) {
            Ok(Control::Auth { token }) => {
                client.authenticate(token);
                let _ = client.send(&json!({"type": "authenticated"})).await;
                return false;
            }
            Ok(Control::Bye) => return true,
            Err(_) => {}
        }

        let data = serde_json::from_slice::<Value>(payload)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(payload).into_owned()));
        let message = json!({
            "type": "message",
            "from": client.id().to_string(),
            "authenticated": client.is_authenticated(),
            "data": data,
        });

        match client.pool().broadcast(&message).await {
            Ok(delivered) => tracing::debug!(client_id = %client.id(), delivered, "Relayed message"),
            Err(e) => tracing::warn!(client_id = %client.id(), error = %e, "Failed to relay message"),
        }
        false
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("wspool={},tower_http=info", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.pool.validate()?;

    init_logging(&config.logging);
    tracing::info!("Starting wspool v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        send_queue_size = config.pool.send_queue_size,
        ping_period_ms = config.pool.ping_period_ms,
        "Pool configured"
    );

    let pool = Pool::new(config.pool.clone(), Arc::new(ChatHandler));
    wspool::serve(AppState::new(pool), &config.server).await?;

    Ok(())
}
