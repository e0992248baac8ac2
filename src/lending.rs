//! Deposits into the lending pool.

use crate::approval::approve_token;
use crate::chain::Chain;
use crate::errors::{AppError, Result};
use crate::models::{SupplyRequest, TokenDescriptor, TxReceipt};
use crate::utils::to_base_units;
use bigdecimal::BigDecimal;
use ethers::types::{Address, U256};
use tracing::info;

/// Referral code passed to `supply`; no referral program is used.
pub const NO_REFERRAL: u16 = 0;

/// Let the lending pool pull `amount` (human units) of `token` from the signer.
pub async fn authorize_lending_pool<C: Chain + ?Sized>(
    chain: &C,
    token: &TokenDescriptor,
    lending_pool: Address,
    amount: &BigDecimal,
) -> Result<TxReceipt> {
    info!(token = %token.symbol, amount = %amount, "[LEND] granting lending pool permission");
    approve_token(chain, token, lending_pool, amount).await
}

/// Supply `amount` (human units) of `token` to the lending pool, crediting
/// `beneficiary`. Sent with a fixed gas limit.
pub async fn supply_to_pool<C: Chain + ?Sized>(
    chain: &C,
    lending_pool: Address,
    token: &TokenDescriptor,
    amount: &BigDecimal,
    beneficiary: Address,
    gas_limit: U256,
) -> Result<TxReceipt> {
    let request = SupplyRequest {
        asset: token.address,
        amount: to_base_units(amount, token.decimals)?,
        on_behalf_of: beneficiary,
        referral_code: NO_REFERRAL,
        gas_limit,
    };
    info!(
        token = %token.symbol,
        amount = %request.amount,
        gas_limit = %gas_limit,
        "[LEND] depositing to lending pool"
    );

    let receipt = chain
        .supply(lending_pool, request)
        .await
        .map_err(|e| AppError::DepositFailed(e.to_string()))?;
    if !receipt.is_success() {
        return Err(AppError::DepositFailed(format!(
            "transaction {:?} reverted",
            receipt.hash
        )));
    }

    info!(tx = ?receipt.hash, "[LEND] deposit confirmed");
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockChain;
    use ethers::types::TxHash;
    use std::str::FromStr;

    fn aave() -> TokenDescriptor {
        TokenDescriptor::new(1, Address::from_low_u64_be(0xaa), 18, "AAVE", "AAVE")
    }

    #[tokio::test]
    async fn supply_uses_gas_override_and_no_referral() {
        let pool = Address::from_low_u64_be(0x1e);
        let me = Address::from_low_u64_be(0xfeed);
        let mut chain = MockChain::new();
        chain
            .expect_supply()
            .withf(move |p, req| {
                *p == pool
                    && req.asset == Address::from_low_u64_be(0xaa)
                    && req.amount == U256::from(2_500_000_000_000_000_000u128)
                    && req.on_behalf_of == me
                    && req.referral_code == 0
                    && req.gas_limit == U256::from(500_000u64)
            })
            .times(1)
            .returning(|_, _| {
                Ok(TxReceipt {
                    hash: TxHash::repeat_byte(4),
                    status: 1,
                })
            });

        let amount = BigDecimal::from_str("2.5").unwrap();
        let receipt = supply_to_pool(&chain, pool, &aave(), &amount, me, U256::from(500_000u64))
            .await
            .unwrap();
        assert!(receipt.is_success());
    }

    #[tokio::test]
    async fn reverted_supply_is_a_deposit_failure() {
        let mut chain = MockChain::new();
        chain.expect_supply().returning(|_, _| {
            Ok(TxReceipt {
                hash: TxHash::repeat_byte(5),
                status: 0,
            })
        });

        let err = supply_to_pool(
            &chain,
            Address::zero(),
            &aave(),
            &BigDecimal::from(1),
            Address::zero(),
            U256::from(500_000u64),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::DepositFailed(_)));
    }

    #[tokio::test]
    async fn authorization_targets_lending_pool() {
        let pool = Address::from_low_u64_be(0x1e);
        let mut chain = MockChain::new();
        chain
            .expect_approve()
            .withf(move |token, spender, amount| {
                *token == Address::from_low_u64_be(0xaa)
                    && *spender == pool
                    && *amount == U256::from(10u64).pow(U256::from(18u64))
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(TxReceipt {
                    hash: TxHash::repeat_byte(6),
                    status: 1,
                })
            });

        authorize_lending_pool(&chain, &aave(), pool, &BigDecimal::from(1))
            .await
            .unwrap();
    }
}
