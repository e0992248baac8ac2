//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use crate::models::TokenDescriptor;
use bigdecimal::BigDecimal;
use ethers::types::{Address, U256};
use std::fmt;
use std::str::FromStr;

/// Sepolia test network.
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_FACTORY_ADDRESS: &str = "0x0227628f3F023bb0B980b67D528571c95c6DaC1c";
pub const DEFAULT_ROUTER_ADDRESS: &str = "0x3bFA4769FB09eefC5a80d6E87c3B9C650f7Ae48E";
pub const DEFAULT_LENDING_POOL_ADDRESS: &str = "0x6Ae43d3271ff6888e7Fc43Fd7321a503ff738951";
pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.etherscan.io";
/// 0.3% fee tier.
pub const DEFAULT_POOL_FEE: u32 = 3000;
pub const DEFAULT_DEPOSIT_GAS_LIMIT: u64 = 500_000;

const USDC_ADDRESS: &str = "0x94a9D9AC8a22534E3FaCa9F4e7F2E2cf85d5E4C8";
const AAVE_ADDRESS: &str = "0x88541670e55cc00beefd87eb59edd1b7c511ac9a";

/// Everything the workflow needs besides a chain connection.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Token sold on the exchange.
    pub token_in: TokenDescriptor,
    /// Token bought on the exchange and supplied to the lending pool.
    pub token_out: TokenDescriptor,
    pub factory: Address,
    pub router: Address,
    pub lending_pool: Address,
    pub pool_fee: u32,
    pub deposit_gas_limit: U256,
    /// Slippage floor for the swap, in human units of `token_out`.
    pub min_amount_out: BigDecimal,
    pub explorer_url: String,
}

impl WorkflowSettings {
    /// Sepolia USDC -> AAVE with the well-known exchange and lending deployments.
    pub fn sepolia() -> Self {
        Self {
            token_in: TokenDescriptor::new(
                DEFAULT_CHAIN_ID,
                parse_const(USDC_ADDRESS),
                6,
                "USDC",
                "USD//C",
            ),
            token_out: TokenDescriptor::new(
                DEFAULT_CHAIN_ID,
                parse_const(AAVE_ADDRESS),
                18,
                "AAVE",
                "AAVE",
            ),
            factory: parse_const(DEFAULT_FACTORY_ADDRESS),
            router: parse_const(DEFAULT_ROUTER_ADDRESS),
            lending_pool: parse_const(DEFAULT_LENDING_POOL_ADDRESS),
            pool_fee: DEFAULT_POOL_FEE,
            deposit_gas_limit: U256::from(DEFAULT_DEPOSIT_GAS_LIMIT),
            min_amount_out: BigDecimal::from(0),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
        }
    }
}

/// Consolidated application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// RPC endpoint for the Ethereum-compatible node.
    pub rpc_url: String,
    /// Hex-encoded signing key. Never logged.
    pub private_key: String,
    pub chain_id: u64,
    pub workflow: WorkflowSettings,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("workflow", &self.workflow)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `RPC_URL` and `PRIVATE_KEY` are required; everything else falls back to
    /// the Sepolia deployment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = required(&lookup, "RPC_URL")?;
        url::Url::parse(&rpc_url)?;
        let private_key = required(&lookup, "PRIVATE_KEY")?;

        let chain_id = optional::<u64, _>(&lookup, "CHAIN_ID")?.unwrap_or(DEFAULT_CHAIN_ID);

        let mut workflow = WorkflowSettings::sepolia();
        workflow.token_in.chain_id = chain_id;
        workflow.token_out.chain_id = chain_id;
        if let Some(factory) = optional::<Address, _>(&lookup, "FACTORY_ADDRESS")? {
            workflow.factory = factory;
        }
        if let Some(router) = optional::<Address, _>(&lookup, "ROUTER_ADDRESS")? {
            workflow.router = router;
        }
        if let Some(lending_pool) = optional::<Address, _>(&lookup, "LENDING_POOL_ADDRESS")? {
            workflow.lending_pool = lending_pool;
        }
        if let Some(fee) = optional::<u32, _>(&lookup, "POOL_FEE")? {
            workflow.pool_fee = fee;
        }
        if let Some(gas_limit) = optional::<u64, _>(&lookup, "DEPOSIT_GAS_LIMIT")? {
            workflow.deposit_gas_limit = U256::from(gas_limit);
        }
        if let Some(min_out) = optional::<BigDecimal, _>(&lookup, "MIN_AMOUNT_OUT")? {
            workflow.min_amount_out = min_out;
        }
        if let Some(explorer_url) = lookup("EXPLORER_URL") {
            url::Url::parse(&explorer_url)?;
            workflow.explorer_url = explorer_url;
        }

        Ok(Self {
            rpc_url,
            private_key,
            chain_id,
            workflow,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{key} must be set")))
}

fn optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{key}={raw} is invalid: {e}"))),
        _ => Ok(None),
    }
}

// Only called on the literals above.
fn parse_const(addr: &str) -> Address {
    addr.parse().unwrap_or_default()
}
