use anyhow::Result;
use ethers::types::{I256, U256};
use tracing::info;

use crate::{
    config::{MOCK_DECIMALS, MOCK_INITIAL_ANSWER},
    deployments::DeploymentRecord,
};

use super::{deploy_contract, DeployContext, MOCK_V3_AGGREGATOR};

/// Step 00: on development networks, stand in for the live ETH/USD oracle
/// with a fixed-answer aggregator. A no-op everywhere else.
pub async fn deploy_mocks(ctx: &DeployContext) -> Result<Option<DeploymentRecord>> {
    if !ctx.config.network.is_development() {
        return Ok(None);
    }

    info!(network = %ctx.config.network.name, "local network detected, deploying mocks");
    let record = deploy_contract(
        ctx,
        MOCK_V3_AGGREGATOR,
        (U256::from(MOCK_DECIMALS), I256::from(MOCK_INITIAL_ANSWER)),
    )
    .await?;
    info!(address = ?record.address, "mocks deployed");
    Ok(Some(record))
}
