use std::{env, path::PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use url::Url;

pub const RPC_URL_ENV_VAR: &str = "RPC_URL";
pub const SEPOLIA_RPC_URL_ENV_VAR: &str = "SEPOLIA_RPC_URL";
pub const MNEMONIC_ENV_VAR: &str = "MNEMONIC";
pub const ETHERSCAN_API_KEY_ENV_VAR: &str = "ETHERSCAN_API_KEY";
pub const DEPLOYMENTS_DIR_ENV_VAR: &str = "DEPLOYMENTS_DIR";

const DEFAULT_LOCAL_RPC_URL: &str = "http://localhost:8545";
const DEFAULT_LOCAL_CHAIN_ID: u64 = 31337;
const DEFAULT_DEPLOYMENTS_DIR: &str = "deployments";

/// Standard developer mnemonic that local nodes (hardhat, anvil) fund out of
/// the box. Only ever used as a fallback on development networks.
const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// Networks backed by a local throwaway node. No live oracle watches these,
/// so they get a mocked price feed instead.
pub const DEVELOPMENT_NETWORKS: &[&str] = &["localhost", "hardhat", "anvil"];

/// ETH/USD feed on Sepolia.
/// https://docs.chain.link/data-feeds/price-feeds/addresses
const SEPOLIA_ETH_USD_PRICE_FEED: &str = "0x694AA1769357215DE4FAC081bf1f309aDC325306";

/// Decimal precision of the mocked aggregator.
pub const MOCK_DECIMALS: u8 = 8;
/// 2000 USD at 8 decimals, the mocked aggregator's initial answer.
pub const MOCK_INITIAL_ANSWER: i64 = 200_000_000_000;

#[derive(Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    /// Address of the live ETH/USD aggregator, where one exists.
    pub eth_usd_price_feed: Option<String>,
    pub block_confirmations: usize,
}

impl NetworkConfig {
    pub fn is_development(&self) -> bool {
        DEVELOPMENT_NETWORKS.contains(&self.name.as_str())
    }
}

/// Address + endpoint pair a contract wrapper needs to talk to one deployed
/// instance.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractNetworkConfig {
    pub contract_address: String,
    pub rpc_url: String,
    pub block_confirmations: usize,
}

/// Static table of the networks this harness knows how to target. The RPC
/// endpoint for live networks is resolved from the environment at load time.
pub fn lookup_network(name: &str) -> Result<NetworkConfig> {
    match name {
        "localhost" | "hardhat" | "anvil" => Ok(NetworkConfig {
            name: name.to_owned(),
            chain_id: DEFAULT_LOCAL_CHAIN_ID,
            rpc_url: DEFAULT_LOCAL_RPC_URL.to_owned(),
            eth_usd_price_feed: None,
            block_confirmations: 1,
        }),
        "sepolia" => Ok(NetworkConfig {
            name: name.to_owned(),
            chain_id: 11155111,
            rpc_url: String::new(),
            eth_usd_price_feed: Some(SEPOLIA_ETH_USD_PRICE_FEED.to_owned()),
            block_confirmations: 6,
        }),
        other => Err(anyhow!("unknown network: {other}")),
    }
}

#[derive(Clone)]
pub struct HarnessConfig {
    pub network: NetworkConfig,
    pub mnemonic: String,
    pub etherscan_api_key: Option<String>,
    pub deployments_dir: PathBuf,
}

impl HarnessConfig {
    /// Resolve the network table entry for `network_name` and apply the
    /// environment on top of it (`.env` is honored).
    pub fn load(network_name: &str) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut network = lookup_network(network_name)?;

        if network.is_development() {
            if let Ok(rpc_url) = env::var(RPC_URL_ENV_VAR) {
                network.rpc_url = rpc_url;
            }
        } else {
            network.rpc_url = env::var(SEPOLIA_RPC_URL_ENV_VAR).with_context(|| {
                format!(
                    "{SEPOLIA_RPC_URL_ENV_VAR} must be set to target {}",
                    network.name
                )
            })?;
        }

        Url::parse(&network.rpc_url).with_context(|| {
            format!(
                "invalid RPC URL for network {}: {}",
                network.name, network.rpc_url
            )
        })?;

        let mnemonic = match env::var(MNEMONIC_ENV_VAR) {
            Ok(mnemonic) => mnemonic,
            Err(_) if network.is_development() => DEV_MNEMONIC.to_owned(),
            Err(_) => bail!(
                "{MNEMONIC_ENV_VAR} must be set to sign transactions on {}",
                network.name
            ),
        };

        let etherscan_api_key = env::var(ETHERSCAN_API_KEY_ENV_VAR).ok();

        let deployments_dir = env::var(DEPLOYMENTS_DIR_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DEPLOYMENTS_DIR));

        Ok(Self {
            network,
            mnemonic,
            etherscan_api_key,
            deployments_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_networks_run_against_the_local_node() {
        for name in DEVELOPMENT_NETWORKS {
            let network = lookup_network(name).unwrap();
            assert!(network.is_development());
            assert_eq!(network.chain_id, 31337);
            assert_eq!(network.block_confirmations, 1);
            assert!(network.eth_usd_price_feed.is_none());
        }
    }

    #[test]
    fn sepolia_uses_the_live_feed() {
        let network = lookup_network("sepolia").unwrap();
        assert!(!network.is_development());
        assert_eq!(network.chain_id, 11155111);
        assert_eq!(
            network.eth_usd_price_feed.as_deref(),
            Some("0x694AA1769357215DE4FAC081bf1f309aDC325306")
        );
        assert_eq!(network.block_confirmations, 6);
    }

    #[test]
    fn unknown_networks_are_rejected() {
        assert!(lookup_network("goerli").is_err());
        assert!(lookup_network("").is_err());
    }
}
