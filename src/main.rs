//! Tendril - synthetic MCP traffic generator
//!
//! Usage:
//!   tendril                                  Run against localhost:3000
//!   tendril --server-url URL --sse-url URL   Point at a remote deployment
//!   tendril --base-interval-ms 10000         Faster base cadence
//!   tendril --help                           Show all options
//!
//! Calls breathe with local time: business hours and weekdays run faster,
//! nights and weekends slower. A share of calls goes over SSE instead of
//! plain HTTP.

use anyhow::Result;
use clap::Parser;

use tendril::caller::Caller;
use tendril::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tendril=info".parse()?),
        )
        .init();

    let config = cli.into_config();
    let handle = Caller::new(config).start().await?;

    shutdown_signal().await?;
    tracing::info!("shutdown signal received; cancelling pending timer");
    handle.stop();
    handle.join().await;

    Ok(())
}

/// Resolve on SIGINT or SIGTERM, whichever lands first.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}
