use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use ethers::{
    abi::Token,
    etherscan::{verify::VerifyContract, Client},
    types::{Address, Chain},
};
use tracing::info;

use crate::config::NetworkConfig;

/// solc release the sources under `contracts/` are pinned to.
const SOLC_VERSION: &str = "v0.8.8+commit.dddeac79";

/// Submit the flattened FundMe source to the chain's block explorer so the
/// deployed bytecode is publicly matched to source. Callers treat failures
/// as non-fatal.
pub async fn verify_fund_me(
    network: &NetworkConfig,
    api_key: &str,
    address: Address,
    price_feed: Address,
    source_path: &Path,
) -> Result<()> {
    let source = fs::read_to_string(source_path)
        .with_context(|| format!("could not read {}", source_path.display()))?;

    let chain = Chain::try_from(network.chain_id)
        .map_err(|_| anyhow!("no block explorer known for chain id {}", network.chain_id))?;
    let client = Client::new(chain, api_key)?;

    let contract = VerifyContract::new(
        address,
        "contracts/FundMe.sol:FundMe".to_owned(),
        source,
        SOLC_VERSION.to_owned(),
    )
    .constructor_arguments(Some(encode_constructor_args(price_feed)))
    .optimization(false);

    let resp = client.submit_contract_verification(&contract).await?;
    info!(guid = %resp.result, "explorer accepted the verification request");
    Ok(())
}

/// ABI-encode the single constructor argument the way the explorer expects
/// it: hex, no 0x prefix.
pub fn encode_constructor_args(price_feed: Address) -> String {
    hex::encode(ethers::abi::encode(&[Token::Address(price_feed)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_args_are_one_padded_word() {
        let feed: Address = "0x694AA1769357215DE4FAC081bf1f309aDC325306"
            .parse()
            .unwrap();
        let encoded = encode_constructor_args(feed);

        assert_eq!(encoded.len(), 64);
        assert!(encoded.starts_with("000000000000000000000000"));
        assert!(encoded.ends_with("694aa1769357215de4fac081bf1f309adc325306"));
    }
}
