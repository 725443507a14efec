use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use vaultium::{config::AppConfig, state::AppState};

/// Mock crypto wallet dashboard.
#[derive(Parser)]
#[command(name = "vaultium", version)]
struct Cli {
    /// Address to listen on (overrides BIND_ADDR)
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Directory served under /static (overrides STATIC_DIR)
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = AppConfig::from_env()?;
    if let Some(bind) = cli.bind {
        cfg.bind = bind;
    }
    if let Some(dir) = cli.static_dir {
        cfg.static_dir = dir;
    }

    let bind_addr = cfg.bind;
    tracing::info!(user = %cfg.demo_user, static_dir = %cfg.static_dir.display(), "starting");
    let app = vaultium::router(AppState::demo(cfg));

    tracing::info!("listening on http://{bind_addr}");
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("bind {bind_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received, stopping");
}
