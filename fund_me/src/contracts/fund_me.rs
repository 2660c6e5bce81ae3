use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use ethers::{
    contract::abigen,
    providers::{Http, Middleware, Provider},
    types::{Address, Bytes, TransactionReceipt, TransactionRequest, U256},
};
use tracing::debug;

use crate::{client::get_read_only_client, config::ContractNetworkConfig};

// Only the surface the harness drives; the deployed contract's full ABI
// lives in its artifact.
abigen!(
    FundMe,
    r#"[
        function fund() external payable
        function withdraw() external
        function cheaperWithdraw() external
        function getOwner() external view returns (address)
        function getPriceFeed() external view returns (address)
        function getFunder(uint256 index) external view returns (address)
        function getAddressToAmountFunded(address funder) external view returns (uint256)
        function MINIMUM_USD() external view returns (uint256)
    ]"#
);

/// Client for one deployed FundMe instance.
pub struct FundMeContract {
    contract_address: Address,
    rpc_url: String,
    block_confirmations: usize,
}

impl FundMeContract {
    pub fn new(config: ContractNetworkConfig) -> Result<Self> {
        let contract_address = config.contract_address.parse().with_context(|| {
            format!("invalid FundMe contract address: {}", config.contract_address)
        })?;
        Ok(Self {
            contract_address,
            rpc_url: config.rpc_url,
            block_confirmations: config.block_confirmations,
        })
    }

    /// Wrap an already-resolved address, as read from a deployment record.
    pub fn at(address: Address, rpc_url: impl Into<String>, block_confirmations: usize) -> Self {
        Self {
            contract_address: address,
            rpc_url: rpc_url.into(),
            block_confirmations,
        }
    }

    pub fn address(&self) -> Address {
        self.contract_address
    }

    fn contract_with_client<M: Middleware>(&self, client: Arc<M>) -> FundMe<M> {
        FundMe::new(self.contract_address, client)
    }

    fn get_read_only_ethers_client(&self) -> Result<Arc<Provider<Http>>> {
        get_read_only_client(&self.rpc_url)
    }

    /// Contribute `value` wei through `fund()`. Reverts below the contract's
    /// USD-denominated minimum.
    pub async fn fund(
        &self,
        signer: Arc<impl Middleware>,
        value: U256,
    ) -> Result<TransactionReceipt> {
        let contract = self.contract_with_client(signer);
        let receipt = contract
            .fund()
            .value(value)
            .send()
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .confirmations(self.block_confirmations)
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .ok_or_else(|| anyhow!("fund transaction dropped from the mempool"))?;
        debug!(tx = ?receipt.transaction_hash, "fund confirmed");
        Ok(receipt)
    }

    /// Owner-only: drain the full balance and reset funder bookkeeping.
    pub async fn withdraw(&self, signer: Arc<impl Middleware>) -> Result<TransactionReceipt> {
        let contract = self.contract_with_client(signer);
        let receipt = contract
            .withdraw()
            .send()
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .confirmations(self.block_confirmations)
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .ok_or_else(|| anyhow!("withdraw transaction dropped from the mempool"))?;
        debug!(tx = ?receipt.transaction_hash, "withdraw confirmed");
        Ok(receipt)
    }

    /// Gas-optimized withdrawal variant.
    pub async fn cheaper_withdraw(
        &self,
        signer: Arc<impl Middleware>,
    ) -> Result<TransactionReceipt> {
        let contract = self.contract_with_client(signer);
        let receipt = contract
            .cheaper_withdraw()
            .send()
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .confirmations(self.block_confirmations)
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .ok_or_else(|| anyhow!("withdraw transaction dropped from the mempool"))?;
        debug!(tx = ?receipt.transaction_hash, "cheaperWithdraw confirmed");
        Ok(receipt)
    }

    /// Raw value transfer with arbitrary calldata. Empty calldata lands in
    /// the contract's receive entry point, anything else in fallback; both
    /// forward to `fund()`.
    pub async fn send_value(
        &self,
        signer: Arc<impl Middleware>,
        value: U256,
        data: Bytes,
    ) -> Result<TransactionReceipt> {
        let tx = TransactionRequest::new()
            .to(self.contract_address)
            .value(value)
            .data(data);
        let receipt = signer
            .send_transaction(tx, None)
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .confirmations(self.block_confirmations)
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .ok_or_else(|| anyhow!("transaction dropped from the mempool"))?;
        Ok(receipt)
    }

    pub async fn balance(&self) -> Result<U256> {
        let client = self.get_read_only_ethers_client()?;
        let balance = client
            .get_balance(self.contract_address, None)
            .await
            .map_err(|e| anyhow!(e.to_string()))?;
        Ok(balance)
    }

    pub async fn owner(&self) -> Result<Address> {
        let contract = self.contract_with_client(self.get_read_only_ethers_client()?);
        Ok(contract.get_owner().call().await?)
    }

    pub async fn price_feed(&self) -> Result<Address> {
        let contract = self.contract_with_client(self.get_read_only_ethers_client()?);
        Ok(contract.get_price_feed().call().await?)
    }

    /// Funder recorded at `index`. Reverts once bookkeeping has been reset.
    pub async fn funder(&self, index: u64) -> Result<Address> {
        let contract = self.contract_with_client(self.get_read_only_ethers_client()?);
        Ok(contract.get_funder(U256::from(index)).call().await?)
    }

    pub async fn amount_funded(&self, funder: Address) -> Result<U256> {
        let contract = self.contract_with_client(self.get_read_only_ethers_client()?);
        Ok(contract.get_address_to_amount_funded(funder).call().await?)
    }

    pub async fn minimum_usd(&self) -> Result<U256> {
        let contract = self.contract_with_client(self.get_read_only_ethers_client()?);
        Ok(contract.minimum_usd().call().await?)
    }
}
