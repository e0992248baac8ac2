use crate::chain::SignerClient;
use ethers::types::TxHash;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Token approval failed: {0}")]
    ApprovalFailed(String),

    #[error("No pool found for {token_in:?}/{token_out:?} at fee tier {fee}")]
    PoolNotFound {
        token_in: ethers::types::Address,
        token_out: ethers::types::Address,
        fee: u32,
    },

    #[error("Swap failed: {0}")]
    SwapFailed(String),

    #[error("Deposit failed: {0}")]
    DepositFailed(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Transaction {0:?} was dropped before confirmation")]
    TransactionDropped(TxHash),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("Contract error: {0}")]
    Contract(#[from] ethers::contract::ContractError<SignerClient>),

    #[error("Other: {0}")]
    Other(String),
}
