use anyhow::{anyhow, Result};
use ethers::types::Address;
use tracing::{info, warn};

use crate::{deployments::DeploymentRecord, verify};

use super::{deploy_contract, DeployContext, FUND_ME, MOCK_V3_AGGREGATOR};

/// Step 01: deploy FundMe wired to the network's ETH/USD feed. Development
/// networks use the mock recorded by step 00; live networks use the feed
/// address from the network table.
pub async fn deploy_fund_me(ctx: &DeployContext) -> Result<DeploymentRecord> {
    let network = &ctx.config.network;

    let price_feed: Address = if network.is_development() {
        ctx.store.get(MOCK_V3_AGGREGATOR)?.address
    } else {
        let configured = network.eth_usd_price_feed.as_deref().ok_or_else(|| {
            anyhow!(
                "no ETH/USD price feed configured for network {}",
                network.name
            )
        })?;
        configured
            .parse()
            .map_err(|e| anyhow!("invalid price feed address {configured}: {e}"))?
    };

    info!(price_feed = ?price_feed, "deploying FundMe");
    let record = deploy_contract(ctx, FUND_ME, (price_feed,)).await?;

    if !network.is_development() {
        match ctx.config.etherscan_api_key.as_deref() {
            Some(api_key) => {
                // best effort: log and continue, never retry
                let source_path = ctx.contracts_dir.join("FundMe.sol");
                if let Err(err) =
                    verify::verify_fund_me(network, api_key, record.address, price_feed, &source_path)
                        .await
                {
                    warn!("contract verification failed: {err:#}");
                } else {
                    info!(address = ?record.address, "verification submitted");
                }
            }
            None => info!("no explorer API key configured, skipping verification"),
        }
    }

    Ok(record)
}
