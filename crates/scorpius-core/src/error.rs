use bitcoin::Txid;

/// Failures talking to an explorer over HTTP, before any record decoding.
#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("HTTP transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("explorer returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("explorer rejected the request with HTTP 429 (rate limit exceeded)")]
    RateLimited,

    #[error("invalid explorer response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("explorer communication failure: {0}")]
    Explorer(#[from] ExplorerError),

    #[error("address not found: {0}")]
    AddressNotFound(String),

    #[error("invalid bitcoin address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("transaction not found: {0}")]
    TxNotFound(Txid),

    #[error("invalid explorer record: {0}")]
    InvalidRecord(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
