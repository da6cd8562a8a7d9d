use std::num::NonZeroUsize;
use std::time::Duration;

use async_trait::async_trait;
use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, Txid};
use lru::LruCache;
use reqwest::{header, StatusCode};
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

use crate::error::{CoreError, ExplorerError};
use crate::rate_limit::RateLimitAvoider;
use crate::types::{BtcAddress, BtcTransaction};

use super::provider::Provider;
use super::request::RequestConfig;
use super::transform::ExplorerRecord;
use super::BtcExplorer;

/// Maximum number of confirmed transactions cached in memory.
pub const TX_CACHE_CAP: usize = 1_000;

/// Explorer REST client that never issues requests faster than its
/// [`RateLimitAvoider`] allows.
///
/// Construction wires three pieces in order: the provider's response
/// transformer, a [`RequestConfig`] carrying it, and the avoider built from
/// the per-call duration. Confirmed transactions are immutable, so they are
/// kept in an LRU cache and served without spending quota.
pub struct RateLimitedExplorer {
    provider: Provider,
    client: reqwest::Client,
    config: RequestConfig,
    avoider: RateLimitAvoider,
    tx_cache: RwLock<LruCache<Txid, BtcTransaction>>,
}

impl RateLimitedExplorer {
    /// Client for the provider's public endpoint, spacing calls `per_call`
    /// plus the default safety margin apart.
    pub fn new(provider: Provider, per_call: Duration) -> Result<Self, CoreError> {
        let config = RequestConfig::new(provider.default_base_url(), provider.transformer())?;
        let avoider = RateLimitAvoider::with_default_margin(per_call)?;
        Self::with_config(provider, config, avoider)
    }

    /// Client with a caller-built request configuration and avoider.
    ///
    /// The transformer inside `config` decides how responses decode, so a
    /// caller can point a provider's paths at a compatible service with its
    /// own decoders.
    pub fn with_config(
        provider: Provider,
        config: RequestConfig,
        avoider: RateLimitAvoider,
    ) -> Result<Self, CoreError> {
        let client = config.build_client()?;
        Ok(Self {
            provider,
            client,
            config,
            avoider,
            tx_cache: RwLock::new(LruCache::new(
                NonZeroUsize::new(TX_CACHE_CAP).expect("TX_CACHE_CAP is non-zero"),
            )),
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn rate_limit_avoider(&self) -> &RateLimitAvoider {
        &self.avoider
    }

    pub fn request_config(&self) -> &RequestConfig {
        &self.config
    }

    async fn fetch<R: ExplorerRecord>(&self, path: &str) -> Result<R, CoreError> {
        let url = self.config.endpoint(path)?;

        self.avoider.acquire().await;
        debug!(
            explorer.provider = %self.provider,
            explorer.record = R::KIND,
            explorer.path = path,
            "explorer request"
        );

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(ExplorerError::Transport)?;
        let status = response.status();

        let body = response.text().await.map_err(ExplorerError::Transport)?;
        debug!(
            explorer.provider = %self.provider,
            explorer.path = path,
            %status,
            body_len = body.len(),
            "explorer response"
        );
        trace!(explorer.path = path, body = %body, "explorer response body");

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(
                explorer.provider = %self.provider,
                interval_ms = self.avoider.interval().as_millis() as u64,
                "explorer rate limit hit despite client-side throttling"
            );
            return Err(ExplorerError::RateLimited.into());
        }
        if !status.is_success() {
            return Err(ExplorerError::HttpStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        self.config.transformer().transform::<R>(&body)
    }
}

#[async_trait]
impl BtcExplorer for RateLimitedExplorer {
    async fn get_address(&self, address: &str) -> Result<BtcAddress, CoreError> {
        validate_address(address)?;
        self.fetch(&self.provider.address_path(address))
            .await
            .map_err(|err| normalize_address_error(address, err))
    }

    async fn get_transaction(&self, txid: &Txid) -> Result<BtcTransaction, CoreError> {
        // The LRU cache requires a write lock for `get` (it updates recency).
        if let Some(tx) = self.tx_cache.write().await.get(txid).cloned() {
            trace!(%txid, "transaction cache hit");
            return Ok(tx);
        }

        let tx: BtcTransaction = self
            .fetch(&self.provider.transaction_path(txid))
            .await
            .map_err(|err| normalize_transaction_error(txid, err))?;
        if tx.is_confirmed() {
            self.tx_cache.write().await.put(tx.txid, tx.clone());
        }
        Ok(tx)
    }
}

impl std::fmt::Debug for RateLimitedExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedExplorer")
            .field("provider", &self.provider)
            .field("base_url", &self.config.base_url().as_str())
            .field("avoider", &self.avoider)
            .finish_non_exhaustive()
    }
}

/// Reject anything that is not a Bitcoin address before it is spliced into a
/// request path; `?`, `#` or `..` would otherwise rewrite the URL.
fn validate_address(address: &str) -> Result<(), CoreError> {
    address
        .parse::<Address<NetworkUnchecked>>()
        .map(|_| ())
        .map_err(|e| CoreError::InvalidAddress {
            address: address.to_owned(),
            reason: e.to_string(),
        })
}

// ==============================================================================
// Error Normalization
// ==============================================================================

/// Map HTTP 404 on an address lookup to `AddressNotFound`.
fn normalize_address_error(address: &str, err: CoreError) -> CoreError {
    match err {
        CoreError::Explorer(ExplorerError::HttpStatus { status: 404, .. }) => {
            CoreError::AddressNotFound(address.to_owned())
        }
        other => other,
    }
}

/// Map HTTP 404 on a transaction lookup to `TxNotFound`.
fn normalize_transaction_error(txid: &Txid, err: CoreError) -> CoreError {
    match err {
        CoreError::Explorer(ExplorerError::HttpStatus { status: 404, .. }) => {
            CoreError::TxNotFound(*txid)
        }
        other => other,
    }
}
