use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use parley::server::{
    AppState, LocalCaptureStore, Relay, RelayConfig, ServerConfig, UploadConfig, build_router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parley", version, about = "Session-scoped WebRTC signaling relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay and capture upload endpoint.
    Serve(ServeArgs),
}

#[derive(clap::Args)]
struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0:5000", env = "PARLEY_BIND")]
    bind: SocketAddr,

    /// Directory uploaded captures are written to.
    #[arg(long, default_value = "uploads", env = "PARLEY_UPLOAD_DIR")]
    upload_dir: PathBuf,

    /// Base URL returned to clients for stored captures.
    #[arg(long, default_value = "http://localhost:5000", env = "PARLEY_PUBLIC_URL")]
    public_url: String,

    #[arg(long, default_value = "http://localhost:5173", env = "PARLEY_ALLOWED_ORIGIN")]
    allowed_origin: String,

    /// Accept requests from any browser origin.
    #[arg(long, conflicts_with = "allowed_origin")]
    any_origin: bool,

    #[arg(long, default_value_t = 512, env = "PARLEY_MAX_UPLOAD_MB")]
    max_upload_mb: usize,

    /// Do not send `peer-left` when a member leaves or disconnects.
    #[arg(long, env = "PARLEY_NO_PEER_LEFT")]
    no_peer_left: bool,

    /// Relay negotiation frames to connections outside the sender's session.
    #[arg(long, env = "PARLEY_ALLOW_CROSS_SESSION")]
    allow_cross_session: bool,

    /// Drop undeliverable frames without telling the sender.
    #[arg(long, env = "PARLEY_SILENT_DROPS")]
    silent_drops: bool,
}

impl ServeArgs {
    fn into_config(self) -> Result<ServerConfig> {
        let max_upload_bytes = self
            .max_upload_mb
            .checked_mul(1024 * 1024)
            .with_context(|| format!("--max-upload-mb {} is too large", self.max_upload_mb))?;

        Ok(ServerConfig {
            bind: self.bind,
            allowed_origin: (!self.any_origin).then_some(self.allowed_origin),
            relay: RelayConfig {
                notify_peer_left: !self.no_peer_left,
                enforce_same_session: !self.allow_cross_session,
                report_delivery_failures: !self.silent_drops,
            },
            upload: UploadConfig {
                upload_dir: self.upload_dir,
                public_base_url: self.public_url,
                max_upload_bytes,
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => serve(args.into_config()?).await,
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    let store = LocalCaptureStore::open(&config.upload)
        .await
        .with_context(|| {
            format!(
                "Failed to prepare upload directory {}",
                config.upload.upload_dir.display()
            )
        })?;
    let captures_dir = store.dir().to_path_buf();

    info!(relay = ?config.relay, "Relay configuration");

    let state = AppState {
        relay: Relay::new(config.relay.clone()),
        captures: Arc::new(store),
    };
    let app = build_router(state, &config, &captures_dir);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    println!("{}", "🚀 Parley relay is up".green().bold());
    println!("   🔌 Signaling: ws://{}/ws", config.bind);
    println!("   📂 Captures:  {}", captures_dir.display());
    info!("Server listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
