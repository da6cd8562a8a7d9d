//! Record types produced by explorer decoders.
//!
//! These are deliberately thin: an address summary (`BtcAddress`) and a
//! transaction with its inputs and outputs (`BtcTransaction`). Each explorer
//! dialect maps its own wire format onto them.

use bitcoin::{Amount, BlockHash, OutPoint, SignedAmount, Txid};
use serde::{Deserialize, Serialize};

// ==============================================================================
// Block Height
// ==============================================================================

/// A Bitcoin block height, wrapped for type safety.
///
/// `#[serde(transparent)]` keeps the JSON representation a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHeight(pub u32);

impl From<u32> for BlockHeight {
    fn from(h: u32) -> Self {
        Self(h)
    }
}

impl From<BlockHeight> for u32 {
    fn from(h: BlockHeight) -> Self {
        h.0
    }
}

impl std::ops::Deref for BlockHeight {
    type Target = u32;
    fn deref(&self) -> &u32 {
        &self.0
    }
}

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ==============================================================================
// Address
// ==============================================================================

/// Balance summary of a single address as reported by an explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcAddress {
    pub address: String,
    /// Confirmed balance (received minus sent, confirmed only).
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub confirmed_balance: Amount,
    /// Net effect of unconfirmed (mempool) transactions; may be negative.
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub unconfirmed_delta: SignedAmount,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub total_received: Amount,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub total_sent: Amount,
    /// Number of transactions touching the address, mempool included.
    pub tx_count: u64,
}

// ==============================================================================
// Transaction
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcTransaction {
    pub txid: Txid,
    /// `None` while the transaction is unconfirmed.
    pub block_height: Option<BlockHeight>,
    pub block_hash: Option<BlockHash>,
    #[serde(with = "bitcoin::amount::serde::as_sat::opt")]
    pub fee: Option<Amount>,
    pub size: Option<u64>,
    pub inputs: Vec<BtcTxInput>,
    pub outputs: Vec<BtcTxOutput>,
}

impl BtcTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.block_height.is_some()
    }

    /// A coinbase transaction has exactly one input with no prevout.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_none()
    }

    /// Sum of all output values, `None` on overflow.
    pub fn total_output(&self) -> Option<Amount> {
        self.outputs
            .iter()
            .try_fold(Amount::ZERO, |acc, output| acc.checked_add(output.value))
    }
}

/// A transaction input. For coinbase inputs, `prevout` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcTxInput {
    pub prevout: Option<OutPoint>,
    pub address: Option<String>,
    #[serde(with = "bitcoin::amount::serde::as_sat::opt")]
    pub value: Option<Amount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcTxOutput {
    /// `None` for outputs without a standard address (e.g. `OP_RETURN`).
    pub address: Option<String>,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub value: Amount,
}
