mod cli;

use std::time::Duration;

use bitcoin::Txid;
use clap::Parser;
use eyre::{eyre, WrapErr};

use scorpius_core::explorer::RequestConfig;
use scorpius_core::{BtcExplorer, CoreError, ExplorerError, RateLimitAvoider, RateLimitedExplorer};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let explorer = build_explorer(&args).context("configure explorer client")?;
    tracing::info!(
        provider = %explorer.provider(),
        base_url = %explorer.request_config().base_url(),
        interval_ms = explorer.rate_limit_avoider().interval().as_millis() as u64,
        "explorer client ready"
    );

    let output = match &args.command {
        cli::Command::Address { addresses } => {
            let records = explorer
                .get_addresses(addresses)
                .await
                .map_err(|err| eyre!(format_lookup_error(&err)))
                .wrap_err("while fetching addresses")?;
            serde_json::to_string_pretty(&records)?
        }
        cli::Command::Tx { txids } => {
            let txids = parse_txids(txids)?;
            let records = explorer
                .get_transactions(&txids)
                .await
                .map_err(|err| eyre!(format_lookup_error(&err)))
                .wrap_err("while fetching transactions")?;
            serde_json::to_string_pretty(&records)?
        }
    };

    println!("{output}");
    Ok(())
}

fn build_explorer(args: &cli::Cli) -> eyre::Result<RateLimitedExplorer> {
    let provider = args.provider;
    let base_url = args
        .base_url
        .as_deref()
        .unwrap_or(provider.default_base_url());

    let mut config = RequestConfig::new(base_url, provider.transformer())?
        .with_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(token) = &args.api_token {
        match provider.token_param() {
            Some(param) => config = config.with_query(param, token.as_str()),
            None => tracing::warn!(%provider, "provider takes no API token; ignoring --api-token"),
        }
    }

    let per_call = args
        .per_call_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| provider.default_per_call());
    let avoider = RateLimitAvoider::new(per_call, Duration::from_millis(args.margin_ms))?;

    Ok(RateLimitedExplorer::with_config(provider, config, avoider)?)
}

fn parse_txids(raw: &[String]) -> eyre::Result<Vec<Txid>> {
    raw.iter()
        .map(|s| {
            s.parse::<Txid>()
                .map_err(|e| eyre!("invalid txid `{s}`: {e}"))
        })
        .collect()
}

fn format_lookup_error(err: &CoreError) -> String {
    let mut lines = vec![format!("explorer lookup failed: {err}")];

    let hint = match err {
        CoreError::Explorer(ExplorerError::RateLimited) => {
            Some("the explorer is throttling us; raise --per-call-ms or --margin-ms")
        }
        CoreError::Explorer(ExplorerError::HttpStatus {
            status: 401 | 403, ..
        }) => Some("the explorer rejected our credentials; verify --api-token"),
        CoreError::Explorer(ExplorerError::Transport(_)) => {
            Some("request could not be sent; verify --base-url and network access")
        }
        _ => None,
    };
    if let Some(hint) = hint {
        lines.push(format!("hint: {hint}"));
    }

    lines.join("\n")
}
