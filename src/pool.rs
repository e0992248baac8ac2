//! Liquidity pool lookup through the exchange factory.

use crate::chain::Chain;
use crate::errors::{AppError, Result};
use crate::models::{PoolInfo, TokenDescriptor};
use ethers::types::Address;
use tracing::info;

/// Resolve the pool for `token_in`/`token_out` at `fee` and read its
/// immutable parameters.
pub async fn locate_pool<C: Chain + ?Sized>(
    chain: &C,
    factory: Address,
    token_in: &TokenDescriptor,
    token_out: &TokenDescriptor,
    fee: u32,
) -> Result<PoolInfo> {
    let pool_address = chain
        .get_pool(factory, token_in.address, token_out.address, fee)
        .await?;
    if pool_address.is_zero() {
        return Err(AppError::PoolNotFound {
            token_in: token_in.address,
            token_out: token_out.address,
            fee,
        });
    }

    // Independent view calls.
    let (token0, token1, pool_fee) = futures::try_join!(
        chain.pool_token0(pool_address),
        chain.pool_token1(pool_address),
        chain.pool_fee(pool_address),
    )?;

    info!(
        pool = ?pool_address,
        pair = %format!("{}/{}", token_in.symbol, token_out.symbol),
        fee = pool_fee,
        "[POOL] pool resolved"
    );
    Ok(PoolInfo {
        pool_address,
        token0,
        token1,
        fee: pool_fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockChain;

    fn token(byte: u64, symbol: &str, decimals: u8) -> TokenDescriptor {
        TokenDescriptor::new(1, Address::from_low_u64_be(byte), decimals, symbol, symbol)
    }

    #[tokio::test]
    async fn reads_pool_parameters() {
        let pool = Address::from_low_u64_be(0x9001);
        let usdc = token(0xa, "USDC", 6);
        let aave = token(0xb, "AAVE", 18);

        let mut chain = MockChain::new();
        chain
            .expect_get_pool()
            .withf(|_, a, b, fee| {
                *a == Address::from_low_u64_be(0xa)
                    && *b == Address::from_low_u64_be(0xb)
                    && *fee == 3000
            })
            .times(1)
            .returning(move |_, _, _, _| Ok(pool));
        chain
            .expect_pool_token0()
            .returning(|_| Ok(Address::from_low_u64_be(0xa)));
        chain
            .expect_pool_token1()
            .returning(|_| Ok(Address::from_low_u64_be(0xb)));
        chain.expect_pool_fee().returning(|_| Ok(3000));

        let info = locate_pool(&chain, Address::zero(), &usdc, &aave, 3000)
            .await
            .unwrap();
        assert_eq!(
            info,
            PoolInfo {
                pool_address: pool,
                token0: usdc.address,
                token1: aave.address,
                fee: 3000,
            }
        );
    }

    #[tokio::test]
    async fn zero_address_means_no_pool() {
        for (a, b) in [(0x1u64, 0x2u64), (0x2, 0x1), (0xdead, 0xbeef)] {
            let mut chain = MockChain::new();
            chain
                .expect_get_pool()
                .returning(|_, _, _, _| Ok(Address::zero()));
            chain.expect_pool_token0().never();
            chain.expect_pool_token1().never();
            chain.expect_pool_fee().never();

            let err = locate_pool(&chain, Address::zero(), &token(a, "A", 18), &token(b, "B", 6), 3000)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::PoolNotFound { fee: 3000, .. }));
        }
    }
}
