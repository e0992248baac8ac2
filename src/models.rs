//! Shared data structures used throughout the application.

use ethers::types::{Address, TxHash, U256};
use serde::Serialize;

/// A fungible token on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDescriptor {
    pub chain_id: u64,
    pub address: Address,
    /// Fixed-point scale used to convert between human and on-chain amounts.
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

impl TokenDescriptor {
    pub fn new(chain_id: u64, address: Address, decimals: u8, symbol: &str, name: &str) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }
}

/// Identity and fee tier of a liquidity pool, read from chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    pub pool_address: Address,
    pub token0: Address,
    pub token1: Address,
    /// Fee in hundredths of a basis point (3000 = 0.3%).
    pub fee: u32,
}

/// Single-hop exact-input swap request for the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    pub sqrt_price_limit_x96: U256,
}

/// Arguments of a lending pool `supply` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyRequest {
    pub asset: Address,
    pub amount: U256,
    pub on_behalf_of: Address,
    pub referral_code: u16,
    pub gas_limit: U256,
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub hash: TxHash,
    /// 1 on success, 0 on revert.
    pub status: u64,
}

impl TxReceipt {
    pub fn is_success(&self) -> bool {
        self.status == 1
    }
}

impl From<&ethers::types::TransactionReceipt> for TxReceipt {
    fn from(receipt: &ethers::types::TransactionReceipt) -> Self {
        Self {
            hash: receipt.transaction_hash,
            status: receipt.status.map(|s| s.as_u64()).unwrap_or_default(),
        }
    }
}

/// Result of a swap: the confirmed transaction and the realized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapOutcome {
    pub receipt: TxReceipt,
    /// Output-token balance delta across the swap, in base units.
    pub amount_out: U256,
}
