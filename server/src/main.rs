//! Tideline activity-stream server.
//!
//! Serves the activity-stream API over HTTP: entity collections, the global
//! action feed, per-user/model/object streams, and follow management.
//!
//! Usage:
//!   tideline-server --port 8080 --seed deployment.json --db tideline.db
//!
//! Without a seed file a small built-in demo deployment is used; without a
//! database path the store lives in memory.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tideline_server::{build_router, build_state, Seed};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tideline-server")]
#[command(about = "Tideline activity-stream API server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// SQLite database path (in-memory when omitted)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Deployment seed file (collections, field specs, sessions, render mode)
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Tideline server starting...");
    let seed = match &args.seed {
        Some(path) => Seed::from_file(path)?,
        None => {
            info!("no seed file given, using the built-in demo deployment");
            Seed::demo()
        }
    };

    let state = build_state(&seed, args.db.as_deref())?;
    let collections: Vec<_> = state.registry.collections().map(str::to_string).collect();
    info!(collections = ?collections, "registry built");

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port)).await?;
    info!("listening on port {}", args.port);
    axum::serve(listener, app).await?;
    Ok(())
}
