use std::sync::Arc;

use anyhow::{anyhow, Result};
use ethers::{
    contract::abigen,
    providers::{Http, Middleware, Provider},
    types::{Address, TransactionReceipt, I256},
};

use crate::client::get_read_only_client;

// Fixed-answer oracle stand-in, deployed on development networks only.
abigen!(
    MockV3Aggregator,
    r#"[
        function decimals() external view returns (uint8)
        function latestAnswer() external view returns (int256)
        function updateAnswer(int256 _answer) external
    ]"#
);

pub struct MockV3AggregatorContract {
    contract_address: Address,
    rpc_url: String,
    block_confirmations: usize,
}

impl MockV3AggregatorContract {
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

    fn contract_with_client<M: Middleware>(&self, client: Arc<M>) -> MockV3Aggregator<M> {
        MockV3Aggregator::new(self.contract_address, client)
    }

    fn get_read_only_ethers_client(&self) -> Result<Arc<Provider<Http>>> {
        get_read_only_client(&self.rpc_url)
    }

    pub async fn decimals(&self) -> Result<u8> {
        let contract = self.contract_with_client(self.get_read_only_ethers_client()?);
        Ok(contract.decimals().call().await?)
    }

    pub async fn latest_answer(&self) -> Result<I256> {
        let contract = self.contract_with_client(self.get_read_only_ethers_client()?);
        Ok(contract.latest_answer().call().await?)
    }

    /// Move the mocked price, e.g. to exercise minimum-contribution edges.
    pub async fn update_answer(
        &self,
        signer: Arc<impl Middleware>,
        answer: I256,
    ) -> Result<TransactionReceipt> {
        let contract = self.contract_with_client(signer);
        let receipt = contract
            .update_answer(answer)
            .send()
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .confirmations(self.block_confirmations)
            .await
            .map_err(|e| anyhow!(e.to_string()))?
            .ok_or_else(|| anyhow!("updateAnswer transaction dropped from the mempool"))?;
        Ok(receipt)
    }
}
