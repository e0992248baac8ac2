use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use std::str::FromStr;
use std::sync::Arc;
use swap_and_supply::{chain::EthersChain, config::AppConfig, utils, workflow::Workflow};

/// Amount of the input token swapped when no argument is given.
const DEFAULT_SWAP_AMOUNT: &str = "1";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let raw_amount = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SWAP_AMOUNT.into());
    let amount = BigDecimal::from_str(&raw_amount)
        .with_context(|| format!("swap amount {raw_amount:?} is not a number"))?;

    let config = AppConfig::from_env()?;
    tracing::info!(
        chain_id = config.chain_id,
        token_in = %config.workflow.token_in.symbol,
        token_out = %config.workflow.token_out.symbol,
        amount = %amount,
        "[INIT] swap-and-supply starting"
    );

    let chain = EthersChain::connect(&config.rpc_url, &config.private_key, config.chain_id).await?;
    let mut workflow = Workflow::new(Arc::new(chain), config.workflow);

    // Workflow failures are logged, not reflected in the exit status.
    let state = workflow.run_and_log(&amount).await;
    tracing::debug!(?state, "[WORKFLOW] finished");

    Ok(())
}
