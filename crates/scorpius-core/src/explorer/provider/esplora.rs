//! Esplora REST dialect (blockstream.info, mempool.space, self-hosted
//! electrs).
//!
//! `GET /address/{address}` returns chain and mempool funding statistics;
//! `GET /tx/{txid}` returns the transaction with resolved prevouts.

use bitcoin::{Amount, BlockHash, OutPoint, SignedAmount, Txid};
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::{BlockHeight, BtcAddress, BtcTransaction, BtcTxInput, BtcTxOutput};

// ==============================================================================
// Wire Types
// ==============================================================================

#[derive(Deserialize)]
struct AddressResponse {
    address: String,
    chain_stats: FundingStats,
    mempool_stats: FundingStats,
}

#[derive(Deserialize)]
struct FundingStats {
    funded_txo_sum: u64,
    spent_txo_sum: u64,
    tx_count: u64,
}

#[derive(Deserialize)]
struct TxResponse {
    txid: Txid,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    fee: Option<u64>,
    status: TxStatus,
    vin: Vec<Vin>,
    vout: Vec<Vout>,
}

#[derive(Deserialize)]
struct TxStatus {
    confirmed: bool,
    #[serde(default)]
    block_height: Option<u32>,
    #[serde(default)]
    block_hash: Option<BlockHash>,
}

#[derive(Deserialize)]
struct Vin {
    txid: Txid,
    vout: u32,
    #[serde(default)]
    is_coinbase: bool,
    #[serde(default)]
    prevout: Option<Vout>,
}

#[derive(Deserialize)]
struct Vout {
    #[serde(default)]
    scriptpubkey_address: Option<String>,
    value: u64,
}

// ==============================================================================
// Decoders
// ==============================================================================

pub fn decode_address(raw: serde_json::Value) -> Result<BtcAddress, CoreError> {
    let response: AddressResponse = serde_json::from_value(raw)
        .map_err(|e| CoreError::InvalidRecord(format!("invalid esplora address: {e}")))?;

    let chain = &response.chain_stats;
    let mempool = &response.mempool_stats;

    let confirmed_balance = chain
        .funded_txo_sum
        .checked_sub(chain.spent_txo_sum)
        .ok_or_else(|| {
            CoreError::InvalidRecord(format!(
                "esplora address {} spent more than it received",
                response.address
            ))
        })?;
    let tx_count = chain
        .tx_count
        .checked_add(mempool.tx_count)
        .ok_or_else(|| CoreError::InvalidRecord("transaction count overflow".into()))?;
    let unconfirmed_delta = signed_sats(mempool.funded_txo_sum)?
        .checked_sub(signed_sats(mempool.spent_txo_sum)?)
        .ok_or_else(|| CoreError::InvalidRecord("mempool balance overflow".into()))?;

    Ok(BtcAddress {
        confirmed_balance: Amount::from_sat(confirmed_balance),
        unconfirmed_delta: SignedAmount::from_sat(unconfirmed_delta),
        total_received: Amount::from_sat(chain.funded_txo_sum),
        total_sent: Amount::from_sat(chain.spent_txo_sum),
        tx_count,
        address: response.address,
    })
}

pub fn decode_transaction(raw: serde_json::Value) -> Result<BtcTransaction, CoreError> {
    let response: TxResponse = serde_json::from_value(raw)
        .map_err(|e| CoreError::InvalidRecord(format!("invalid esplora transaction: {e}")))?;

    // Esplora keeps the last known height on reorged-out transactions; only
    // trust it while `confirmed` is set.
    let (block_height, block_hash) = if response.status.confirmed {
        (
            response.status.block_height.map(BlockHeight),
            response.status.block_hash,
        )
    } else {
        (None, None)
    };

    let inputs = response
        .vin
        .into_iter()
        .map(|vin| {
            if vin.is_coinbase {
                return BtcTxInput {
                    prevout: None,
                    address: None,
                    value: None,
                };
            }
            let (address, value) = match vin.prevout {
                Some(prevout) => (
                    prevout.scriptpubkey_address,
                    Some(Amount::from_sat(prevout.value)),
                ),
                None => (None, None),
            };
            BtcTxInput {
                prevout: Some(OutPoint::new(vin.txid, vin.vout)),
                address,
                value,
            }
        })
        .collect();

    let outputs = response
        .vout
        .into_iter()
        .map(|vout| BtcTxOutput {
            address: vout.scriptpubkey_address,
            value: Amount::from_sat(vout.value),
        })
        .collect();

    Ok(BtcTransaction {
        txid: response.txid,
        block_height,
        block_hash,
        fee: response.fee.map(Amount::from_sat),
        size: response.size,
        inputs,
        outputs,
    })
}

fn signed_sats(sats: u64) -> Result<i64, CoreError> {
    i64::try_from(sats)
        .map_err(|_| CoreError::InvalidRecord(format!("amount {sats} exceeds i64 range")))
}
