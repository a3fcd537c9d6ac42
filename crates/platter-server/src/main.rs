//! HTTP server binary for the platter ordering backend.
//!
//! Usage:
//!   platter-server          - Apply pending migrations, then serve
//!   platter-server migrate  - Apply pending migrations and exit
//!   platter-server status   - Print migration status and exit
//!   platter-server seed     - Load sample data and exit

mod auth;
mod config;
mod error;
mod routes;
mod seed;
mod state;

use platter::migrate::MigrationRunner;
use platter::pool;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_postgres::NoTls;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;
use crate::state::AppState;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let command = std::env::args().nth(1);
    let rt = tokio::runtime::Runtime::new()?;

    match command.as_deref() {
        None => rt.block_on(serve())?,
        Some("migrate") => rt.block_on(migrate())?,
        Some("status") => rt.block_on(status())?,
        Some("seed") => rt.block_on(seed::run())?,
        Some(other) => {
            eprintln!("unknown command: {other} (expected migrate, status, or seed)");
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Open a single connection and drive it in the background. Used by the
/// one-shot commands and for migrations at startup; request traffic goes
/// through the pool instead.
pub(crate) async fn connect(database_url: &str) -> platter::Result<tokio_postgres::Client> {
    let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("connection error: {e}");
        }
    });

    Ok(client)
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    // Bring the schema up to date before accepting traffic.
    let mut client = connect(&config.database_url).await?;
    let ran = MigrationRunner::new(&mut client).migrate().await?;
    if ran.is_empty() {
        info!("schema is up to date");
    } else {
        info!(count = ran.len(), "applied pending migrations");
    }
    drop(client);

    let pool = pool::build(&config.database_url, config.pool_size)?;
    let addr = config.listen_addr;
    let app = routes::router(AppState::new(pool, config));

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn migrate() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let mut client = connect(&config.database_url).await?;

    let ran = MigrationRunner::new(&mut client).migrate().await?;
    if ran.is_empty() {
        println!("nothing to do, schema is up to date");
    } else {
        for version in ran {
            println!("applied {version}");
        }
    }
    Ok(())
}

async fn status() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let mut client = connect(&config.database_url).await?;

    for migration in MigrationRunner::new(&mut client).status().await? {
        let mark = if migration.applied { "applied" } else { "pending" };
        println!("{mark:>8}  {}", migration.version);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
