//! Shared test helpers for `scorpius-core` unit tests.
//!
//! Record builders (`make_tx`, `make_address`) and wire-format fixtures for
//! each explorer dialect live here so decoder and client tests agree on the
//! same dummy data.

use bitcoin::hashes::Hash;
use bitcoin::{Amount, SignedAmount, Txid};

use crate::types::{BlockHeight, BtcAddress, BtcTransaction, BtcTxOutput};

pub const ADDR_P2WPKH: &str = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";
pub const ADDR_P2PKH: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
pub const BLOCK_HASH: &str = "00000000000000000002a7c4c1e48d76c5a37902165a270156b7a8d72728a054";

// ==============================================================================
// Txid Helpers
// ==============================================================================

/// Create a deterministic `Txid` from a single distinguishing byte.
pub fn txid_from_byte(b: u8) -> Txid {
    let mut bytes = [0u8; 32];
    bytes[0] = b;
    Txid::from_byte_array(bytes)
}

// ==============================================================================
// Record Builders
// ==============================================================================

pub fn make_tx(txid: Txid, height: Option<u32>) -> BtcTransaction {
    BtcTransaction {
        txid,
        block_height: height.map(BlockHeight),
        block_hash: None,
        fee: Some(Amount::from_sat(500)),
        size: Some(200),
        inputs: Vec::new(),
        outputs: vec![BtcTxOutput {
            address: Some(ADDR_P2WPKH.to_owned()),
            value: Amount::from_sat(10_000),
        }],
    }
}

pub fn make_address(address: &str, balance_sats: u64) -> BtcAddress {
    BtcAddress {
        address: address.to_owned(),
        confirmed_balance: Amount::from_sat(balance_sats),
        unconfirmed_delta: SignedAmount::ZERO,
        total_received: Amount::from_sat(balance_sats),
        total_sent: Amount::ZERO,
        tx_count: 1,
    }
}

// ==============================================================================
// Esplora Fixtures
// ==============================================================================

/// `GET /address/{addr}` body; chain tx_count is 3 and mempool tx_count 2.
pub fn esplora_address_json(
    address: &str,
    funded: u64,
    spent: u64,
    mempool_funded: u64,
    mempool_spent: u64,
) -> serde_json::Value {
    serde_json::json!({
        "address": address,
        "chain_stats": {
            "funded_txo_count": 2,
            "funded_txo_sum": funded,
            "spent_txo_count": 1,
            "spent_txo_sum": spent,
            "tx_count": 3
        },
        "mempool_stats": {
            "funded_txo_count": 1,
            "funded_txo_sum": mempool_funded,
            "spent_txo_count": 1,
            "spent_txo_sum": mempool_spent,
            "tx_count": 2
        }
    })
}

/// `GET /tx/{txid}` body spending `funding:1` (50_000 sat) into two outputs,
/// the second of which is an `OP_RETURN` without an address.
pub fn esplora_tx_json(txid: &Txid, funding: &Txid, height: Option<u32>) -> serde_json::Value {
    let status = match height {
        Some(h) => serde_json::json!({
            "confirmed": true,
            "block_height": h,
            "block_hash": BLOCK_HASH,
            "block_time": 1_700_000_000u64
        }),
        None => serde_json::json!({ "confirmed": false }),
    };
    serde_json::json!({
        "txid": txid.to_string(),
        "version": 2,
        "locktime": 0,
        "vin": [{
            "txid": funding.to_string(),
            "vout": 1,
            "prevout": {
                "scriptpubkey": "0014e8df018c7e326cc253faac7e46cdc51e68542c42",
                "scriptpubkey_type": "v0_p2wpkh",
                "scriptpubkey_address": ADDR_P2WPKH,
                "value": 50_000
            },
            "is_coinbase": false,
            "sequence": 4294967293u32
        }],
        "vout": [
            {
                "scriptpubkey": "76a91462e907b15cbf27d5425399ebf6f0fb50ebb88f1888ac",
                "scriptpubkey_type": "p2pkh",
                "scriptpubkey_address": ADDR_P2PKH,
                "value": 49_000
            },
            {
                "scriptpubkey": "6a0568656c6c6f",
                "scriptpubkey_type": "op_return",
                "value": 0
            }
        ],
        "size": 222,
        "weight": 561,
        "fee": 1_000,
        "status": status
    })
}

// ==============================================================================
// BlockCypher Fixtures
// ==============================================================================

pub fn blockcypher_balance_json(
    address: &str,
    total_received: u64,
    total_sent: u64,
    unconfirmed_balance: i64,
    final_n_tx: u64,
) -> serde_json::Value {
    let balance = total_received as i64 - total_sent as i64;
    serde_json::json!({
        "address": address,
        "total_received": total_received,
        "total_sent": total_sent,
        "balance": balance,
        "unconfirmed_balance": unconfirmed_balance,
        "final_balance": balance + unconfirmed_balance,
        "n_tx": final_n_tx,
        "unconfirmed_n_tx": 0,
        "final_n_tx": final_n_tx
    })
}

/// `GET /txs/{txid}` body; a negative `height` marks it unconfirmed.
pub fn blockcypher_tx_json(txid: &Txid, funding: &Txid, height: i64) -> serde_json::Value {
    let confirmations = if height >= 0 { 6 } else { 0 };
    serde_json::json!({
        "block_hash": BLOCK_HASH,
        "block_height": height,
        "hash": txid.to_string(),
        "fees": 10_000,
        "size": 226,
        "confirmations": confirmations,
        "inputs": [{
            "prev_hash": funding.to_string(),
            "output_index": 1,
            "output_value": 50_000,
            "addresses": [ADDR_P2PKH],
            "script_type": "pay-to-pubkey-hash"
        }],
        "outputs": [
            {
                "value": 40_000,
                "addresses": [ADDR_P2WPKH],
                "script_type": "pay-to-witness-pubkey-hash"
            },
            {
                "value": 0,
                "addresses": null,
                "script_type": "null-data",
                "data_hex": "68656c6c6f"
            }
        ]
    })
}
