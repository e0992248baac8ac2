//! Chain connector: node reads and signed transactions.
//!
//! Workflow components only see the [`Chain`] trait; [`EthersChain`] is the
//! live implementation backed by an HTTP provider and a local signing key.

use crate::errors::Result;
use crate::models::{SupplyRequest, SwapParams, TxReceipt};
use async_trait::async_trait;
use ethers::types::{Address, U256};

pub mod client;

pub use client::{EthersChain, SignerClient};

/// On-chain calls the swap-and-supply workflow depends on.
///
/// Mutating calls resolve only once the transaction has been mined; the
/// returned receipt carries the execution status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Chain: Send + Sync {
    /// Address of the signing identity.
    fn signer_address(&self) -> Address;

    /// ERC-20 `approve(spender, amount)` on `token`.
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxReceipt>;

    /// Factory `getPool`; returns the zero address when no pool exists.
    async fn get_pool(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> Result<Address>;

    async fn pool_token0(&self, pool: Address) -> Result<Address>;

    async fn pool_token1(&self, pool: Address) -> Result<Address>;

    async fn pool_fee(&self, pool: Address) -> Result<u32>;

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256>;

    /// Router `exactInputSingle`.
    async fn exact_input_single(&self, router: Address, params: SwapParams) -> Result<TxReceipt>;

    /// Lending pool `supply`, sent with `request.gas_limit` as the gas override.
    async fn supply(&self, lending_pool: Address, request: SupplyRequest) -> Result<TxReceipt>;
}
