//! HTTP server command
//!
//! Opens the database and runs the holonet HTTP server until shutdown.
//! The current user is created on startup if the database lacks it.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use holonet_server::db::create_pool;
use holonet_server::{run_server, ServerConfig, UserId};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://holonet.db")]
    pub database_url: String,

    /// User that favorites are read and written for
    #[arg(long, env = "HOLONET_USER_ID", default_value_t = 1)]
    pub user_id: i64,

    /// Email for the current user when it has to be created
    /// (default: user<id>@holonet.local)
    #[arg(long, env = "HOLONET_SEED_EMAIL")]
    pub seed_email: Option<String>,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            current_user: UserId(self.user_id),
            seed_email: self.seed_email.clone(),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting holonet server on {}", args.bind);

    let pool = create_pool(&args.database_url)
        .await
        .with_context(|| format!("Failed to open database at {}", args.database_url))?;

    let config = args.server_config();

    // Seeds the current user, then blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
