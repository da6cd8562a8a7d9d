//! Explorer dialects.
//!
//! A [`Provider`] bundles what differs between explorer services: endpoint
//! paths, the decoders for their JSON, default base URL, and the quota the
//! service documents. Everything else (HTTP, throttling, caching) is shared
//! by [`RateLimitedExplorer`](super::RateLimitedExplorer).

pub mod blockcypher;
pub mod esplora;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bitcoin::Txid;

use crate::error::CoreError;

use super::transform::{AddressDecoder, ResponseTransformer, TransactionDecoder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Blockstream / mempool.space style Esplora API.
    Esplora,
    BlockCypher,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Self::Esplora => "esplora",
            Self::BlockCypher => "blockcypher",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Esplora => "https://blockstream.info/api",
            Self::BlockCypher => "https://api.blockcypher.com/v1/btc/main",
        }
    }

    /// Minimum spacing between calls for the service's free tier, before the
    /// safety margin is added.
    pub fn default_per_call(self) -> Duration {
        match self {
            Self::Esplora => Duration::from_millis(500),
            // Documented as 3 req/s; the hourly cap is left to the caller.
            Self::BlockCypher => Duration::from_millis(1000),
        }
    }

    pub fn address_path(self, address: &str) -> String {
        match self {
            Self::Esplora => format!("address/{address}"),
            Self::BlockCypher => format!("addrs/{address}/balance"),
        }
    }

    pub fn transaction_path(self, txid: &Txid) -> String {
        match self {
            Self::Esplora => format!("tx/{txid}"),
            Self::BlockCypher => format!("txs/{txid}"),
        }
    }

    /// Query parameter carrying an API token, for services that accept one.
    pub fn token_param(self) -> Option<&'static str> {
        match self {
            Self::Esplora => None,
            Self::BlockCypher => Some("token"),
        }
    }

    pub fn decoders(self) -> (AddressDecoder, TransactionDecoder) {
        match self {
            Self::Esplora => (
                Arc::new(esplora::decode_address),
                Arc::new(esplora::decode_transaction),
            ),
            Self::BlockCypher => (
                Arc::new(blockcypher::decode_address),
                Arc::new(blockcypher::decode_transaction),
            ),
        }
    }

    pub fn transformer(self) -> ResponseTransformer {
        let (address, transaction) = self.decoders();
        ResponseTransformer::new(address, transaction)
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "esplora" | "blockstream" | "mempool" => Ok(Self::Esplora),
            "blockcypher" => Ok(Self::BlockCypher),
            other => Err(CoreError::Config(format!(
                "unknown explorer provider `{other}`; expected esplora or blockcypher"
            ))),
        }
    }
}
