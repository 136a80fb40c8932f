//! Helpdesk Server
//!
//! HTTP backend for support tickets, notifications and user accounts.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use helpdesk_core::config::{self, Config};
use helpdesk_core::tracing_init::init_tracing;
use helpdesk_server::auth::TokenService;
use helpdesk_server::notifier::Notifier;
use helpdesk_server::server::{AppState, build_router};
use helpdesk_server::storage::HelpdeskDatabase;

#[derive(Parser, Debug)]
#[command(name = "helpdesk-server")]
#[command(version, about = "Helpdesk server - support tickets and notifications")]
struct Args {
    /// Path to a JSON config file.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, env = "HELPDESK_LISTEN_ADDR")]
    addr: Option<SocketAddr>,

    /// Path to SQLite database file.
    #[arg(long, env = "HELPDESK_DATABASE_PATH")]
    db_path: Option<PathBuf>,

    /// JWT secret key.
    #[arg(long, env = "HELPDESK_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Per-request deadline in seconds.
    #[arg(long, env = "HELPDESK_REQUEST_TIMEOUT_SECS")]
    request_timeout: Option<u64>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(addr) = self.addr {
            config.server.listen_addr = addr;
        }
        if let Some(path) = self.db_path {
            config.server.database_path = Some(path);
        }
        if let Some(secret) = self.jwt_secret {
            config.auth.jwt_secret = Some(secret);
        }
        if let Some(secs) = self.request_timeout {
            config.server.request_timeout_secs = secs;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let log_json = args.log_json;

    let mut config = config::load_config(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    init_tracing(
        &format!(
            "helpdesk_server={level},helpdesk_core={level},tower_http={level}",
            level = config.server.log_level
        ),
        log_json,
    );

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.server.listen_addr,
        "Starting helpdesk-server"
    );

    let (secret, is_dev) = config.auth.secret_or_dev();
    if is_dev {
        warn!("No JWT secret configured, using the development secret");
    }
    let tokens = TokenService::new(
        secret.as_bytes(),
        config.auth.access_ttl_days,
        config.auth.refresh_ttl_days,
    );

    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);
    let db_path = match config.server.database_path.clone() {
        Some(path) => path,
        None => config::database_path()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine default database path"))?,
    };
    info!(path = %db_path.display(), "Opening helpdesk database");
    let db = HelpdeskDatabase::open(&db_path, request_timeout).await?;

    let notifier = start_notifier(&config)?;
    if let Some(notifier) = &notifier {
        notifier.notify("Server started");
    }

    let state = AppState::new(
        Arc::new(db),
        tokens,
        config.auth.min_password_len,
        request_timeout,
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.server.listen_addr).await?;
    info!(addr = %config.server.listen_addr, "Helpdesk server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Received shutdown signal");
        })
        .await?;

    if let Some(notifier) = notifier {
        notifier.notify("Server shutdown");
        notifier.shutdown().await;
    }

    info!("Helpdesk server stopped");
    Ok(())
}

#[cfg(feature = "telegram")]
fn start_notifier(config: &Config) -> anyhow::Result<Option<Notifier>> {
    use helpdesk_server::notifier::TelegramSink;

    let notifier = &config.notifier;
    match (&notifier.telegram_token, notifier.telegram_chat_id) {
        (Some(token), Some(chat_id)) => {
            let sink = TelegramSink::new(token, chat_id)?;
            info!(chat_id, "Telegram notifier enabled");
            Ok(Some(Notifier::spawn(Arc::new(sink), notifier.queue_capacity)))
        }
        _ => Ok(None),
    }
}

#[cfg(not(feature = "telegram"))]
#[allow(clippy::unnecessary_wraps)]
fn start_notifier(config: &Config) -> anyhow::Result<Option<Notifier>> {
    if config.notifier.is_enabled() {
        warn!("Telegram notifier configured but the `telegram` feature is disabled");
    }
    Ok(None)
}
