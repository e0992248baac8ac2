//! Single-hop exact-input swaps through the exchange router.

use crate::chain::Chain;
use crate::errors::{AppError, Result};
use crate::models::{PoolInfo, SwapOutcome, SwapParams, TokenDescriptor};
use ethers::types::{Address, U256};
use tracing::{info, warn};

/// Build router parameters for selling `amount_in` of `token_in` through `pool`.
///
/// The fee comes from the pool itself. No price limit is applied.
pub fn prepare_swap_params(
    pool: &PoolInfo,
    token_in: &TokenDescriptor,
    token_out: &TokenDescriptor,
    recipient: Address,
    amount_in: U256,
    amount_out_minimum: U256,
) -> SwapParams {
    if amount_out_minimum.is_zero() {
        warn!(
            token_out = %token_out.symbol,
            "[SWAP] amountOutMinimum is 0, the swap accepts any slippage"
        );
    }
    SwapParams {
        token_in: token_in.address,
        token_out: token_out.address,
        fee: pool.fee,
        recipient,
        amount_in,
        amount_out_minimum,
        sqrt_price_limit_x96: U256::zero(),
    }
}

/// Submit the swap and measure the realized output as the recipient's
/// `token_out` balance delta across the confirmed transaction.
pub async fn execute_swap<C: Chain + ?Sized>(
    chain: &C,
    router: Address,
    params: SwapParams,
) -> Result<SwapOutcome> {
    let token_out = params.token_out;
    let recipient = params.recipient;

    let balance_before = chain.balance_of(token_out, recipient).await?;

    let receipt = chain
        .exact_input_single(router, params)
        .await
        .map_err(|e| AppError::SwapFailed(e.to_string()))?;
    if !receipt.is_success() {
        return Err(AppError::SwapFailed(format!(
            "transaction {:?} reverted",
            receipt.hash
        )));
    }

    let balance_after = chain.balance_of(token_out, recipient).await?;
    let amount_out = balance_after.checked_sub(balance_before).ok_or_else(|| {
        AppError::SwapFailed(format!(
            "output balance decreased from {balance_before} to {balance_after}"
        ))
    })?;

    info!(tx = ?receipt.hash, amount_out = %amount_out, "[SWAP] swap confirmed");
    Ok(SwapOutcome {
        receipt,
        amount_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockChain;
    use crate::models::TxReceipt;
    use ethers::types::TxHash;
    use mockall::Sequence;

    fn params() -> SwapParams {
        SwapParams {
            token_in: Address::from_low_u64_be(0xa),
            token_out: Address::from_low_u64_be(0xb),
            fee: 3000,
            recipient: Address::from_low_u64_be(0xfeed),
            amount_in: U256::from(1_000_000u64),
            amount_out_minimum: U256::zero(),
            sqrt_price_limit_x96: U256::zero(),
        }
    }

    #[test]
    fn params_take_fee_from_pool() {
        let pool = PoolInfo {
            pool_address: Address::from_low_u64_be(0x9001),
            token0: Address::from_low_u64_be(0xa),
            token1: Address::from_low_u64_be(0xb),
            fee: 500,
        };
        let a = TokenDescriptor::new(1, Address::from_low_u64_be(0xa), 6, "A", "A");
        let b = TokenDescriptor::new(1, Address::from_low_u64_be(0xb), 18, "B", "B");

        let p = prepare_swap_params(&pool, &a, &b, Address::from_low_u64_be(0xfeed), U256::from(7u64), U256::zero());
        assert_eq!(p.fee, 500);
        assert_eq!(p.token_in, a.address);
        assert_eq!(p.token_out, b.address);
        assert_eq!(p.amount_in, U256::from(7u64));
        assert!(p.amount_out_minimum.is_zero());
        assert!(p.sqrt_price_limit_x96.is_zero());
    }

    #[tokio::test]
    async fn output_is_balance_delta() {
        let mut seq = Sequence::new();
        let mut chain = MockChain::new();
        chain
            .expect_balance_of()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(U256::from(10_000u64)));
        chain
            .expect_exact_input_single()
            .withf(|_, p| p.amount_in == U256::from(1_000_000u64))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(TxReceipt {
                    hash: TxHash::repeat_byte(7),
                    status: 1,
                })
            });
        chain
            .expect_balance_of()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(U256::from(12_345u64)));

        let outcome = execute_swap(&chain, Address::zero(), params()).await.unwrap();
        assert_eq!(outcome.amount_out, U256::from(2_345u64));
        assert_eq!(outcome.receipt.hash, TxHash::repeat_byte(7));
    }

    #[tokio::test]
    async fn reverted_swap_skips_post_balance() {
        let mut chain = MockChain::new();
        chain
            .expect_balance_of()
            .times(1)
            .returning(|_, _| Ok(U256::zero()));
        chain.expect_exact_input_single().returning(|_, _| {
            Ok(TxReceipt {
                hash: TxHash::repeat_byte(8),
                status: 0,
            })
        });

        let err = execute_swap(&chain, Address::zero(), params()).await.unwrap_err();
        assert!(matches!(err, AppError::SwapFailed(_)));
    }

    #[tokio::test]
    async fn shrinking_balance_is_an_error() {
        let mut seq = Sequence::new();
        let mut chain = MockChain::new();
        chain
            .expect_balance_of()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(U256::from(100u64)));
        chain
            .expect_exact_input_single()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(TxReceipt {
                    hash: TxHash::repeat_byte(9),
                    status: 1,
                })
            });
        chain
            .expect_balance_of()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(U256::from(50u64)));

        let err = execute_swap(&chain, Address::zero(), params()).await.unwrap_err();
        assert!(matches!(err, AppError::SwapFailed(_)));
    }
}
