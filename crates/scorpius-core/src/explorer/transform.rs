//! Turns explorer response bodies into records.
//!
//! The transformer owns one decoder per record type. Decoders are injected
//! at construction, so every explorer dialect (or a caller with its own
//! endpoint) supplies the mapping from its wire format without subclassing.

use std::sync::Arc;

use crate::error::{CoreError, ExplorerError};
use crate::types::{BtcAddress, BtcTransaction};

pub type AddressDecoder =
    Arc<dyn Fn(serde_json::Value) -> Result<BtcAddress, CoreError> + Send + Sync>;
pub type TransactionDecoder =
    Arc<dyn Fn(serde_json::Value) -> Result<BtcTransaction, CoreError> + Send + Sync>;

/// A record that can be produced by a [`ResponseTransformer`].
pub trait ExplorerRecord: Sized {
    /// Human-readable record kind, used in logs and error messages.
    const KIND: &'static str;

    fn decode_with(
        transformer: &ResponseTransformer,
        raw: serde_json::Value,
    ) -> Result<Self, CoreError>;
}

impl ExplorerRecord for BtcAddress {
    const KIND: &'static str = "address";

    fn decode_with(
        transformer: &ResponseTransformer,
        raw: serde_json::Value,
    ) -> Result<Self, CoreError> {
        (transformer.address)(raw)
    }
}

impl ExplorerRecord for BtcTransaction {
    const KIND: &'static str = "transaction";

    fn decode_with(
        transformer: &ResponseTransformer,
        raw: serde_json::Value,
    ) -> Result<Self, CoreError> {
        (transformer.transaction)(raw)
    }
}

#[derive(Clone)]
pub struct ResponseTransformer {
    address: AddressDecoder,
    transaction: TransactionDecoder,
}

impl ResponseTransformer {
    pub fn new(address: AddressDecoder, transaction: TransactionDecoder) -> Self {
        Self {
            address,
            transaction,
        }
    }

    /// Parse `body` as JSON and decode it as `R`.
    ///
    /// Malformed JSON is an [`ExplorerError::InvalidResponse`]; decoder
    /// errors are returned as the decoder produced them.
    pub fn transform<R: ExplorerRecord>(&self, body: &str) -> Result<R, CoreError> {
        let raw: serde_json::Value = serde_json::from_str(body).map_err(|e| {
            ExplorerError::InvalidResponse(format!("decode {} response: {e}; body={body}", R::KIND))
        })?;
        R::decode_with(self, raw)
    }
}

impl std::fmt::Debug for ResponseTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseTransformer").finish_non_exhaustive()
    }
}
