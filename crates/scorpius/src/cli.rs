use clap::{Parser, Subcommand};

use scorpius_core::Provider;

/// Scorpius — look up Bitcoin addresses and transactions through a block
/// explorer without tripping its rate limit.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Explorer dialect: `esplora` or `blockcypher`.
    #[arg(long, default_value = "esplora", env = "SCORPIUS_PROVIDER")]
    pub provider: Provider,

    /// Explorer base URL. Defaults to the provider's public endpoint.
    #[arg(long, env = "SCORPIUS_BASE_URL")]
    pub base_url: Option<String>,

    /// Minimum milliseconds between calls. Defaults to the provider's quota.
    #[arg(long, env = "SCORPIUS_PER_CALL_MS")]
    pub per_call_ms: Option<u64>,

    /// Safety margin added to every interval, in milliseconds.
    #[arg(long, default_value = "200", env = "SCORPIUS_MARGIN_MS")]
    pub margin_ms: u64,

    /// Per-request timeout in seconds.
    #[arg(
        long,
        default_value = "30",
        env = "SCORPIUS_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// API token, for providers that accept one.
    #[arg(long, env = "SCORPIUS_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch balance summaries for one or more addresses.
    Address {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Fetch one or more transactions by txid.
    Tx {
        #[arg(required = true)]
        txids: Vec<String>,
    },
}
