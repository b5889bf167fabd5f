//! # agenda
//!
//! Task management API server binary — opens the database, runs
//! migrations, and starts the HTTP server.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agenda_server::{Server, ServerConfig};
use agenda_tasks::{new_file, run_migrations, ConnectionConfig};

/// Task management API server.
#[derive(Parser, Debug)]
#[command(name = "agenda", about = "Task management API server")]
struct Cli {
    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind (0 for auto-assign).
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Path to the `SQLite` database.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Connection pool size.
    #[arg(long)]
    pool_size: Option<u32>,
}

impl Cli {
    fn default_db_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home).join(".agenda").join("agenda.db")
    }
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = args.db_path.unwrap_or_else(Cli::default_db_path);
    ensure_parent_dir(&db_path)?;

    let mut pool_config = ConnectionConfig::default();
    if let Some(size) = args.pool_size {
        pool_config.pool_size = size;
    }
    let pool = new_file(&db_path.to_string_lossy(), &pool_config)
        .context("Failed to open database")?;
    {
        let conn = pool.get().context("Failed to get DB connection")?;
        let _ = run_migrations(&conn).context("Failed to run migrations")?;
    }

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    let server = Server::new(config, pool);
    let (addr, handle) = server.listen().await.context("Failed to bind server")?;

    tracing::info!(db = %db_path.display(), "agenda listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    server.shutdown().shutdown();
    let _ = handle.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
