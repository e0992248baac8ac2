use crate::chain::Chain;
use crate::errors::{AppError, Result};
use crate::models::{SupplyRequest, SwapParams, TxReceipt};
use async_trait::async_trait;
use ethers::{
    abi::Detokenize,
    contract::{ContractCall, abigen},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, U256},
};
use std::sync::Arc;
use tracing::{debug, info};

abigen!(
    UniswapV3Factory,
    r"[
        function getPool(address tokenA, address tokenB, uint24 fee) view returns (address pool)
    ]",
);

abigen!(
    UniswapV3Pool,
    r"[
        function token0() view returns (address)
        function token1() view returns (address)
        function fee() view returns (uint24)
    ]",
);

abigen!(
    Erc20,
    r"[
        function approve(address spender, uint256 amount) returns (bool)
        function balanceOf(address account) view returns (uint256)
    ]",
);

abigen!(
    SwapRouter,
    r"[
        struct ExactInputSingleParams { address tokenIn; address tokenOut; uint24 fee; address recipient; uint256 amountIn; uint256 amountOutMinimum; uint160 sqrtPriceLimitX96; }
        function exactInputSingle(ExactInputSingleParams params) payable returns (uint256 amountOut)
    ]",
);

abigen!(
    LendingPool,
    r"[
        function supply(address asset, uint256 amount, address onBehalfOf, uint16 referralCode)
    ]",
);

/// Provider with a local signing key attached.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Live [`Chain`] backed by one JSON-RPC endpoint and one private key.
#[derive(Clone)]
pub struct EthersChain {
    client: Arc<SignerClient>,
    confirmations: usize,
}

impl EthersChain {
    /// Connect to `rpc_url` and bind `private_key` to `chain_id`.
    ///
    /// Fails if the node reports a different chain id, so transactions are
    /// never signed for the wrong network.
    pub async fn connect(rpc_url: &str, private_key: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        let wallet = private_key
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| AppError::Wallet(e.to_string()))?
            .with_chain_id(chain_id);

        let node_chain_id = provider.get_chainid().await?;
        if node_chain_id != U256::from(chain_id) {
            return Err(AppError::Config(format!(
                "node reports chain id {node_chain_id}, expected {chain_id}"
            )));
        }

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        info!(signer = ?client.address(), chain_id, "[INIT] chain connector ready");
        Ok(Self {
            client,
            confirmations: 1,
        })
    }

    /// Send a state-changing call and wait for it to be mined.
    async fn send_and_confirm<D: Detokenize>(
        &self,
        label: &str,
        call: ContractCall<SignerClient, D>,
    ) -> Result<TxReceipt> {
        let pending = call.send().await?;
        let hash = pending.tx_hash();
        info!(tx = ?hash, "[CHAIN] {label} transaction sent");

        let receipt = pending
            .confirmations(self.confirmations)
            .await?
            .ok_or(AppError::TransactionDropped(hash))?;
        debug!(tx = ?hash, block = ?receipt.block_number, status = ?receipt.status, "[CHAIN] {label} mined");
        Ok(TxReceipt::from(&receipt))
    }
}

#[async_trait]
impl Chain for EthersChain {
    fn signer_address(&self) -> Address {
        self.client.address()
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxReceipt> {
        let call = Erc20::new(token, self.client.clone()).approve(spender, amount);
        self.send_and_confirm("approve", call).await
    }

    async fn get_pool(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> Result<Address> {
        let factory = UniswapV3Factory::new(factory, self.client.clone());
        Ok(factory.get_pool(token_a, token_b, fee).call().await?)
    }

    async fn pool_token0(&self, pool: Address) -> Result<Address> {
        let pool = UniswapV3Pool::new(pool, self.client.clone());
        Ok(pool.token_0().call().await?)
    }

    async fn pool_token1(&self, pool: Address) -> Result<Address> {
        let pool = UniswapV3Pool::new(pool, self.client.clone());
        Ok(pool.token_1().call().await?)
    }

    async fn pool_fee(&self, pool: Address) -> Result<u32> {
        let pool = UniswapV3Pool::new(pool, self.client.clone());
        Ok(pool.fee().call().await?)
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let token = Erc20::new(token, self.client.clone());
        Ok(token.balance_of(owner).call().await?)
    }

    async fn exact_input_single(&self, router: Address, params: SwapParams) -> Result<TxReceipt> {
        let router = SwapRouter::new(router, self.client.clone());
        let call = router.exact_input_single(ExactInputSingleParams {
            token_in: params.token_in,
            token_out: params.token_out,
            fee: params.fee,
            recipient: params.recipient,
            amount_in: params.amount_in,
            amount_out_minimum: params.amount_out_minimum,
            sqrt_price_limit_x96: params.sqrt_price_limit_x96,
        });
        self.send_and_confirm("exactInputSingle", call).await
    }

    async fn supply(&self, lending_pool: Address, request: SupplyRequest) -> Result<TxReceipt> {
        let pool = LendingPool::new(lending_pool, self.client.clone());
        let call = pool
            .supply(
                request.asset,
                request.amount,
                request.on_behalf_of,
                request.referral_code,
            )
            .gas(request.gas_limit);
        self.send_and_confirm("supply", call).await
    }
}
