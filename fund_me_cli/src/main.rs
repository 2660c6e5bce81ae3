use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ethers::utils::{format_ether, parse_ether};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fund_me::{
    client::get_signer_client,
    config::{ContractNetworkConfig, HarnessConfig},
    contracts::FundMeContract,
    deploy::{self, DeployContext, DEFAULT_TAG, FUND_ME},
    deployments::DeploymentsStore,
};

/// Directory holding the Solidity sources and their compiled artifacts,
/// relative to where the harness is run from.
const CONTRACTS_DIR: &str = "contracts";

#[derive(Parser)]
#[command(name = "fund-me", about = "Deploy and operate the FundMe contract", version)]
struct Cli {
    /// Target network (localhost, hardhat, anvil, sepolia)
    #[arg(long, global = true, default_value = "localhost")]
    network: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the ordered deployment steps
    Deploy {
        /// Only run steps matching these tags (all, mocks, fundme)
        #[arg(long, value_delimiter = ',', default_value = DEFAULT_TAG)]
        tags: Vec<String>,
    },
    /// Fund the recorded FundMe deployment
    Fund {
        /// Amount in ETH
        #[arg(long, default_value = "0.1")]
        amount: String,
    },
    /// Print the recorded FundMe deployment's balance
    Balance,
    /// Withdraw the full balance as the owner
    Withdraw {
        /// Use the gas-optimized variant
        #[arg(long)]
        cheaper: bool,
        /// Explicit contract address, bypassing the deployments record
        #[arg(long)]
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fund_me=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("{err:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = HarnessConfig::load(&cli.network)?;
    let signer = get_signer_client(&config, 0)?;

    match cli.command {
        Command::Deploy { tags } => {
            let ctx = DeployContext::new(config, signer, CONTRACTS_DIR);
            deploy::run(&ctx, &tags).await?;
        }
        Command::Fund { amount } => {
            let fund_me = recorded_fund_me(&config)?;
            let value = parse_ether(amount.as_str())
                .with_context(|| format!("invalid --amount: {amount}"))?;
            let receipt = fund_me.fund(signer, value).await?;
            info!(tx = ?receipt.transaction_hash, "funding successful");
        }
        Command::Balance => {
            let fund_me = recorded_fund_me(&config)?;
            let balance = fund_me.balance().await?;
            info!(
                address = ?fund_me.address(),
                wei = %balance,
                eth = %format_ether(balance),
                "balance"
            );
        }
        Command::Withdraw { cheaper, address } => {
            let fund_me = resolve_fund_me(&config, address)?;
            let receipt = if cheaper {
                fund_me.cheaper_withdraw(signer).await?
            } else {
                fund_me.withdraw(signer).await?
            };
            info!(tx = ?receipt.transaction_hash, "withdrawal successful");
        }
    }
    Ok(())
}

/// Locate the FundMe instance recorded for the configured network.
fn recorded_fund_me(config: &HarnessConfig) -> Result<FundMeContract> {
    let store = DeploymentsStore::new(config.deployments_dir.clone(), &config.network.name);
    let record = store.get(FUND_ME)?;
    Ok(FundMeContract::at(
        record.address,
        config.network.rpc_url.clone(),
        config.network.block_confirmations,
    ))
}

/// Use the explicitly given address when there is one, else the record.
fn resolve_fund_me(config: &HarnessConfig, address: Option<String>) -> Result<FundMeContract> {
    match address {
        Some(contract_address) => FundMeContract::new(ContractNetworkConfig {
            contract_address,
            rpc_url: config.network.rpc_url.clone(),
            block_confirmations: config.network.block_confirmations,
        }),
        None => recorded_fund_me(config),
    }
}
