//! ERC-20 allowance grants.

use crate::chain::Chain;
use crate::errors::{AppError, Result};
use crate::models::{TokenDescriptor, TxReceipt};
use crate::utils::to_base_units;
use bigdecimal::BigDecimal;
use ethers::types::Address;
use tracing::info;

/// Allow `spender` to move `amount` (human units) of `token` on behalf of the
/// signer, waiting for the approval to be mined.
pub async fn approve_token<C: Chain + ?Sized>(
    chain: &C,
    token: &TokenDescriptor,
    spender: Address,
    amount: &BigDecimal,
) -> Result<TxReceipt> {
    let raw_amount = to_base_units(amount, token.decimals)?;
    info!(
        token = %token.symbol,
        spender = ?spender,
        amount = %raw_amount,
        "[APPROVE] sending approval transaction"
    );

    let receipt = chain
        .approve(token.address, spender, raw_amount)
        .await
        .map_err(|e| AppError::ApprovalFailed(e.to_string()))?;
    if !receipt.is_success() {
        return Err(AppError::ApprovalFailed(format!(
            "transaction {:?} reverted",
            receipt.hash
        )));
    }

    info!(tx = ?receipt.hash, token = %token.symbol, "[APPROVE] approval confirmed");
    Ok(receipt)
}
