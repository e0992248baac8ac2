//! Miscellaneous helper utilities.

use crate::errors::{AppError, Result};
use bigdecimal::BigDecimal;
use ethers::types::{TxHash, U256};
use num_bigint::BigInt;
use num_traits::Signed;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Scale a human-readable amount into on-chain base units.
///
/// Digits beyond `decimals` are truncated, never rounded up.
pub fn to_base_units(amount: &BigDecimal, decimals: u8) -> Result<U256> {
    if amount.is_negative() {
        return Err(AppError::InvalidAmount(format!("{amount} is negative")));
    }
    let (raw, _) = amount.with_scale(decimals as i64).into_bigint_and_exponent();
    U256::from_dec_str(&raw.to_string())
        .map_err(|e| AppError::InvalidAmount(format!("{amount} does not fit in uint256: {e}")))
}

/// Convert on-chain base units back into a human-readable amount.
pub fn from_base_units(value: U256, decimals: u8) -> BigDecimal {
    // U256 displays as a plain decimal integer, which always parses.
    let raw: BigInt = value.to_string().parse().unwrap_or_default();
    BigDecimal::new(raw, decimals as i64).normalized()
}

/// Block explorer link for a transaction hash.
pub fn tx_link(explorer_url: &str, hash: TxHash) -> String {
    format!("{}/tx/{:?}", explorer_url.trim_end_matches('/'), hash)
}
