//! BlockCypher REST dialect.
//!
//! `GET /addrs/{address}/balance` returns a balance summary;
//! `GET /txs/{txid}` returns the transaction. Unconfirmed transactions carry
//! `block_height: -1` and no block hash.

use bitcoin::{Amount, BlockHash, OutPoint, SignedAmount, Txid};
use serde::Deserialize;

use crate::error::CoreError;
use crate::types::{BlockHeight, BtcAddress, BtcTransaction, BtcTxInput, BtcTxOutput};

#[derive(Deserialize)]
struct BalanceResponse {
    address: String,
    total_received: u64,
    total_sent: u64,
    balance: i64,
    unconfirmed_balance: i64,
    final_n_tx: u64,
}

#[derive(Deserialize)]
struct TxResponse {
    hash: Txid,
    #[serde(default)]
    block_height: Option<i64>,
    #[serde(default)]
    block_hash: Option<BlockHash>,
    #[serde(default)]
    fees: Option<u64>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    inputs: Vec<Input>,
    #[serde(default)]
    outputs: Vec<Output>,
}

#[derive(Deserialize)]
struct Input {
    #[serde(default)]
    prev_hash: Option<Txid>,
    #[serde(default)]
    output_index: Option<i64>,
    #[serde(default)]
    output_value: Option<u64>,
    #[serde(default)]
    addresses: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct Output {
    value: u64,
    #[serde(default)]
    addresses: Option<Vec<String>>,
}

pub fn decode_address(raw: serde_json::Value) -> Result<BtcAddress, CoreError> {
    let response: BalanceResponse = serde_json::from_value(raw)
        .map_err(|e| CoreError::InvalidRecord(format!("invalid blockcypher balance: {e}")))?;

    let confirmed_balance = u64::try_from(response.balance).map_err(|_| {
        CoreError::InvalidRecord(format!(
            "blockcypher reported negative balance {} for {}",
            response.balance, response.address
        ))
    })?;

    Ok(BtcAddress {
        confirmed_balance: Amount::from_sat(confirmed_balance),
        unconfirmed_delta: SignedAmount::from_sat(response.unconfirmed_balance),
        total_received: Amount::from_sat(response.total_received),
        total_sent: Amount::from_sat(response.total_sent),
        tx_count: response.final_n_tx,
        address: response.address,
    })
}

pub fn decode_transaction(raw: serde_json::Value) -> Result<BtcTransaction, CoreError> {
    let response: TxResponse = serde_json::from_value(raw)
        .map_err(|e| CoreError::InvalidRecord(format!("invalid blockcypher transaction: {e}")))?;

    // Negative heights mean "unconfirmed".
    let block_height = response
        .block_height
        .and_then(|h| u32::try_from(h).ok())
        .map(BlockHeight);
    let block_hash = block_height.and(response.block_hash);

    let inputs = response
        .inputs
        .into_iter()
        .map(|input| {
            let prevout = match (input.prev_hash, input.output_index) {
                (Some(txid), Some(index)) => u32::try_from(index)
                    .ok()
                    .map(|vout| OutPoint::new(txid, vout)),
                _ => None,
            };
            BtcTxInput {
                address: prevout.and(first_address(input.addresses)),
                value: prevout.and(input.output_value.map(Amount::from_sat)),
                prevout,
            }
        })
        .collect();

    let outputs = response
        .outputs
        .into_iter()
        .map(|output| BtcTxOutput {
            address: first_address(output.addresses),
            value: Amount::from_sat(output.value),
        })
        .collect();

    Ok(BtcTransaction {
        txid: response.hash,
        block_height,
        block_hash,
        fee: response.fees.map(Amount::from_sat),
        size: response.size,
        inputs,
        outputs,
    })
}

/// BlockCypher lists every address a script can pay to; standard scripts
/// have exactly one.
fn first_address(addresses: Option<Vec<String>>) -> Option<String> {
    addresses.and_then(|list| list.into_iter().next())
}
