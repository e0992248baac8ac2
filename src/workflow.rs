//! Swap-then-supply orchestration.
//!
//! Steps run strictly one after another; each waits for its transaction to be
//! mined before the next one is submitted. The first failure halts the run.

use crate::approval::approve_token;
use crate::chain::Chain;
use crate::config::WorkflowSettings;
use crate::errors::{AppError, Result};
use crate::lending::{authorize_lending_pool, supply_to_pool};
use crate::models::{PoolInfo, SwapOutcome, TxReceipt};
use crate::pool::locate_pool;
use crate::swap::{execute_swap, prepare_swap_params};
use crate::utils::{from_base_units, to_base_units, tx_link};
use bigdecimal::BigDecimal;
use ethers::types::U256;
use num_traits::Zero;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Progress of one workflow run. `Failed` is reachable from every other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowState {
    Idle,
    Approving,
    PoolResolved,
    Swapped,
    LendingApproved,
    Deposited,
    Failed,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub amount_in: U256,
    pub swap_approval: TxReceipt,
    pub pool: PoolInfo,
    pub swap: SwapOutcome,
    /// Realized swap output in human units of the output token.
    pub amount_out: String,
    pub lending_approval: TxReceipt,
    pub deposit: TxReceipt,
}

pub struct Workflow<C: Chain> {
    chain: Arc<C>,
    settings: WorkflowSettings,
    state: WorkflowState,
}

impl<C: Chain> Workflow<C> {
    pub fn new(chain: Arc<C>, settings: WorkflowSettings) -> Self {
        Self {
            chain,
            settings,
            state: WorkflowState::Idle,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Run the workflow and log the outcome instead of returning an error.
    pub async fn run_and_log(&mut self, amount: &BigDecimal) -> WorkflowState {
        match self.run(amount).await {
            Ok(report) => {
                info!(
                    amount_out = %report.amount_out,
                    token = %self.settings.token_out.symbol,
                    deposit_tx = ?report.deposit.hash,
                    "[WORKFLOW] swap and deposit complete"
                );
                match serde_json::to_string(&report) {
                    Ok(json) => debug!(report = %json, "[WORKFLOW] run summary"),
                    Err(e) => debug!(error = %e, "[WORKFLOW] could not serialize run summary"),
                }
            }
            Err(e) => error!("[WORKFLOW] An error occurred: {e}"),
        }
        self.state
    }

    /// Swap `amount` (human units) of the input token and supply the proceeds.
    pub async fn run(&mut self, amount: &BigDecimal) -> Result<WorkflowReport> {
        let result = self.drive(amount).await;
        if result.is_err() {
            debug!(halted_in = ?self.state, "[WORKFLOW] run halted");
            self.state = WorkflowState::Failed;
        }
        result
    }

    async fn drive(&mut self, amount: &BigDecimal) -> Result<WorkflowReport> {
        if amount <= &BigDecimal::zero() {
            return Err(AppError::InvalidAmount(format!(
                "swap amount must be positive, got {amount}"
            )));
        }

        let chain = Arc::clone(&self.chain);
        let chain = chain.as_ref();
        let settings = &self.settings;
        let state = &mut self.state;
        let (token_in, token_out) = (&settings.token_in, &settings.token_out);
        let amount_in = to_base_units(amount, token_in.decimals)?;
        let amount_out_minimum = to_base_units(&settings.min_amount_out, token_out.decimals)?;

        advance(state, WorkflowState::Approving);
        let swap_approval = approve_token(chain, token_in, settings.router, amount).await?;
        info!(
            "[WORKFLOW] Approval Transaction Confirmed! {}",
            tx_link(&settings.explorer_url, swap_approval.hash)
        );

        let pool = locate_pool(
            chain,
            settings.factory,
            token_in,
            token_out,
            settings.pool_fee,
        )
        .await?;
        advance(state, WorkflowState::PoolResolved);

        let params = prepare_swap_params(
            &pool,
            token_in,
            token_out,
            chain.signer_address(),
            amount_in,
            amount_out_minimum,
        );
        let swap = execute_swap(chain, settings.router, params).await?;
        if swap.amount_out.is_zero() {
            return Err(AppError::SwapFailed(format!(
                "transaction {:?} produced no {}",
                swap.receipt.hash, token_out.symbol
            )));
        }
        advance(state, WorkflowState::Swapped);
        let amount_out = from_base_units(swap.amount_out, token_out.decimals);
        info!(
            "[WORKFLOW] Swap Transaction Confirmed: {}",
            tx_link(&settings.explorer_url, swap.receipt.hash)
        );
        info!("[WORKFLOW] Swapped {} Amount: {amount_out}", token_out.symbol);

        let lending_approval =
            authorize_lending_pool(chain, token_out, settings.lending_pool, &amount_out).await?;
        advance(state, WorkflowState::LendingApproved);

        let deposit = supply_to_pool(
            chain,
            settings.lending_pool,
            token_out,
            &amount_out,
            chain.signer_address(),
            settings.deposit_gas_limit,
        )
        .await?;
        advance(state, WorkflowState::Deposited);
        info!(
            "[WORKFLOW] Deposit successful. Transaction: {}",
            tx_link(&settings.explorer_url, deposit.hash)
        );

        Ok(WorkflowReport {
            amount_in,
            swap_approval,
            pool,
            swap,
            amount_out: amount_out.to_string(),
            lending_approval,
            deposit,
        })
    }
}

fn advance(state: &mut WorkflowState, next: WorkflowState) {
    debug!(from = ?state, to = ?next, "[WORKFLOW] state change");
    *state = next;
}
