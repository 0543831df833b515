//! CLI interface for tendril.

use clap::Parser;
use std::time::Duration;

use crate::config::CallerConfig;

/// Tendril - synthetic MCP traffic generator
#[derive(Parser, Debug)]
#[command(name = "tendril", version, about, long_about = None)]
pub struct Cli {
    /// MCP endpoint for plain HTTP calls
    #[arg(
        long,
        env = "TENDRIL_SERVER_URL",
        default_value = "http://localhost:3000/mcp"
    )]
    pub server_url: String,

    /// SSE endpoint for streaming calls
    #[arg(
        long,
        env = "TENDRIL_SSE_URL",
        default_value = "http://localhost:3000/sse"
    )]
    pub sse_url: String,

    /// Base interval between calls, in milliseconds
    #[arg(
        long,
        env = "TENDRIL_BASE_INTERVAL_MS",
        default_value = "30000",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub base_interval_ms: u64,

    /// Jitter applied to each delay, as a percentage of the interval
    #[arg(
        long,
        env = "TENDRIL_JITTER_PERCENT",
        default_value = "30",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub jitter_percent: u8,

    /// Share of calls routed over the SSE transport, as a percentage
    #[arg(
        long,
        env = "TENDRIL_SSE_PERCENT",
        default_value = "25",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub sse_percent: u8,
}

impl Cli {
    /// Convert parsed flags into a caller configuration.
    pub fn into_config(self) -> CallerConfig {
        CallerConfig {
            base_interval: Duration::from_millis(self.base_interval_ms),
            jitter_percent: self.jitter_percent,
            sse_percent: self.sse_percent,
            server_url: self.server_url,
            sse_url: self.sse_url,
        }
    }
}
