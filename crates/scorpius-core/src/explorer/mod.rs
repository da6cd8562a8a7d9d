//! Block explorer abstraction layer.
//!
//! Defines the [`BtcExplorer`] trait and provides a throttled HTTP
//! implementation ([`RateLimitedExplorer`]) plus a test mock
//! (`mock::MockExplorer`).

mod client;
#[cfg(test)]
pub mod mock;
pub mod provider;
pub mod request;
pub mod transform;

pub use client::{RateLimitedExplorer, TX_CACHE_CAP};
pub use provider::Provider;
pub use request::RequestConfig;
pub use transform::{AddressDecoder, ExplorerRecord, ResponseTransformer, TransactionDecoder};

use async_trait::async_trait;
use bitcoin::Txid;

use crate::error::CoreError;
use crate::types::{BtcAddress, BtcTransaction};

/// Lookups every explorer backend supports.
///
/// The batch methods issue one request per item, in order, and stop at the
/// first error. Explorers with a real batch endpoint may override them.
#[async_trait]
pub trait BtcExplorer: Send + Sync {
    async fn get_address(&self, address: &str) -> Result<BtcAddress, CoreError>;

    async fn get_transaction(&self, txid: &Txid) -> Result<BtcTransaction, CoreError>;

    async fn get_addresses(&self, addresses: &[String]) -> Result<Vec<BtcAddress>, CoreError> {
        let mut results = Vec::with_capacity(addresses.len());
        for address in addresses {
            results.push(self.get_address(address).await?);
        }
        Ok(results)
    }

    async fn get_transactions(&self, txids: &[Txid]) -> Result<Vec<BtcTransaction>, CoreError> {
        let mut results = Vec::with_capacity(txids.len());
        for txid in txids {
            results.push(self.get_transaction(txid).await?);
        }
        Ok(results)
    }
}
