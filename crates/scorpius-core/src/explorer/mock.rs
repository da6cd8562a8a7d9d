use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bitcoin::Txid;

use crate::error::CoreError;
use crate::types::{BtcAddress, BtcTransaction};

use super::BtcExplorer;

/// A mock explorer backend for testing. Returns canned records from maps
/// populated via the builder pattern and counts every lookup.
pub struct MockExplorer {
    addresses: HashMap<String, BtcAddress>,
    transactions: HashMap<Txid, BtcTransaction>,
    calls: AtomicUsize,
}

impl MockExplorer {
    pub fn builder() -> MockExplorerBuilder {
        MockExplorerBuilder {
            addresses: HashMap::new(),
            transactions: HashMap::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub struct MockExplorerBuilder {
    addresses: HashMap<String, BtcAddress>,
    transactions: HashMap<Txid, BtcTransaction>,
}

impl MockExplorerBuilder {
    pub fn with_address(mut self, address: BtcAddress) -> Self {
        self.addresses.insert(address.address.clone(), address);
        self
    }

    pub fn with_tx(mut self, tx: BtcTransaction) -> Self {
        self.transactions.insert(tx.txid, tx);
        self
    }

    pub fn build(self) -> MockExplorer {
        MockExplorer {
            addresses: self.addresses,
            transactions: self.transactions,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BtcExplorer for MockExplorer {
    async fn get_address(&self, address: &str) -> Result<BtcAddress, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.addresses
            .get(address)
            .cloned()
            .ok_or_else(|| CoreError::AddressNotFound(address.to_owned()))
    }

    async fn get_transaction(&self, txid: &Txid) -> Result<BtcTransaction, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transactions
            .get(txid)
            .cloned()
            .ok_or(CoreError::TxNotFound(*txid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[tokio::test]
    async fn get_transactions_preserves_request_order() {
        let explorer = MockExplorer::builder()
            .with_tx(make_tx(txid_from_byte(1), Some(10)))
            .with_tx(make_tx(txid_from_byte(2), None))
            .build();

        let txids = vec![txid_from_byte(2), txid_from_byte(1)];
        let txs = explorer.get_transactions(&txids).await.unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].txid, txid_from_byte(2));
        assert_eq!(txs[1].txid, txid_from_byte(1));
        assert_eq!(explorer.calls(), 2);
    }

    #[tokio::test]
    async fn get_transactions_stops_at_first_missing() {
        let explorer = MockExplorer::builder()
            .with_tx(make_tx(txid_from_byte(1), Some(10)))
            .build();

        let txids = vec![txid_from_byte(1), txid_from_byte(9), txid_from_byte(1)];
        let err = explorer.get_transactions(&txids).await.unwrap_err();
        assert!(matches!(err, CoreError::TxNotFound(txid) if txid == txid_from_byte(9)));
        assert_eq!(explorer.calls(), 2);
    }

    #[tokio::test]
    async fn get_addresses_issues_one_lookup_per_address() {
        let explorer = MockExplorer::builder()
            .with_address(make_address(ADDR_P2WPKH, 1_000))
            .with_address(make_address(ADDR_P2PKH, 2_000))
            .build();

        let wanted = vec![ADDR_P2PKH.to_owned(), ADDR_P2WPKH.to_owned()];
        let found = explorer.get_addresses(&wanted).await.unwrap();
        assert_eq!(found[0].address, ADDR_P2PKH);
        assert_eq!(found[1].address, ADDR_P2WPKH);
        assert_eq!(explorer.calls(), 2);
    }

    #[tokio::test]
    async fn empty_batches_issue_no_lookups() {
        let explorer = MockExplorer::builder().build();
        assert!(explorer.get_addresses(&[]).await.unwrap().is_empty());
        assert!(explorer.get_transactions(&[]).await.unwrap().is_empty());
        assert_eq!(explorer.calls(), 0);
    }
}
