pub mod error;
pub mod explorer;
pub mod rate_limit;
pub mod types;

#[cfg(test)]
mod test_util;

pub use error::{CoreError, ExplorerError};
pub use explorer::{BtcExplorer, Provider, RateLimitedExplorer};
pub use rate_limit::{RateLimitAvoider, DEFAULT_SAFETY_MARGIN};
