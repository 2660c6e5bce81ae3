pub mod fund_me;
pub mod mocks;

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use ethers::{abi::Tokenize, contract::ContractFactory};
use tracing::info;

use crate::{
    artifacts::ContractArtifact,
    client::EtherSigner,
    config::HarnessConfig,
    deployments::{DeploymentRecord, DeploymentsStore},
};

/// Contract names as compiled and recorded.
pub const MOCK_V3_AGGREGATOR: &str = "MockV3Aggregator";
pub const FUND_ME: &str = "FundMe";

pub const DEFAULT_TAG: &str = "all";

/// One ordered deployment step. Steps run in declaration order; a step is
/// selected when any requested tag matches one of its tags.
pub struct DeployStep {
    pub name: &'static str,
    pub tags: &'static [&'static str],
}

pub const STEPS: &[DeployStep] = &[
    DeployStep {
        name: "00-deploy-mocks",
        tags: &["all", "mocks"],
    },
    DeployStep {
        name: "01-deploy-fund-me",
        tags: &["all", "fundme"],
    },
];

pub fn selected_steps(requested: &[String]) -> Vec<&'static DeployStep> {
    STEPS
        .iter()
        .filter(|step| {
            requested
                .iter()
                .any(|tag| step.tags.contains(&tag.as_str()))
        })
        .collect()
}

/// Everything the deployment steps need: resolved config, a signing client,
/// the record store and the contracts directory.
pub struct DeployContext {
    pub config: HarnessConfig,
    pub client: Arc<EtherSigner>,
    pub store: DeploymentsStore,
    pub contracts_dir: PathBuf,
}

impl DeployContext {
    pub fn new(
        config: HarnessConfig,
        client: Arc<EtherSigner>,
        contracts_dir: impl Into<PathBuf>,
    ) -> Self {
        let store = DeploymentsStore::new(config.deployments_dir.clone(), &config.network.name);
        Self {
            config,
            client,
            store,
            contracts_dir: contracts_dir.into(),
        }
    }

    pub fn artifacts_dir(&self) -> PathBuf {
        self.contracts_dir.join("artifacts")
    }
}

/// Run the selected deployment steps in order.
pub async fn run(ctx: &DeployContext, requested_tags: &[String]) -> Result<()> {
    let steps = selected_steps(requested_tags);
    if steps.is_empty() {
        return Err(anyhow!("no deploy steps match tags {requested_tags:?}"));
    }

    for step in steps {
        info!(step = step.name, network = %ctx.config.network.name, "running deploy step");
        match step.name {
            "00-deploy-mocks" => {
                mocks::deploy_mocks(ctx).await?;
            }
            "01-deploy-fund-me" => {
                fund_me::deploy_fund_me(ctx).await?;
            }
            other => return Err(anyhow!("unknown deploy step: {other}")),
        }
    }
    Ok(())
}

/// Deploy `contract_name` with the given constructor arguments, wait for the
/// network's confirmation count and persist the deployment record.
pub async fn deploy_contract<T: Tokenize>(
    ctx: &DeployContext,
    contract_name: &str,
    constructor_args: T,
) -> Result<DeploymentRecord> {
    let artifact = ContractArtifact::load(&ctx.artifacts_dir(), contract_name)?;
    let factory = ContractFactory::new(artifact.abi()?, artifact.bytecode()?, ctx.client.clone());

    let deployer = factory
        .deploy(constructor_args)
        .with_context(|| format!("could not encode constructor arguments for {contract_name}"))?
        .confirmations(ctx.config.network.block_confirmations);
    let (contract, receipt) = deployer
        .send_with_receipt()
        .await
        .with_context(|| format!("deployment of {contract_name} failed"))?;

    let record = DeploymentRecord {
        contract_name: contract_name.to_owned(),
        address: contract.address(),
        transaction_hash: Some(receipt.transaction_hash),
        deployer: ctx.client.address(),
        block_number: receipt.block_number,
        abi: artifact.abi.clone(),
        deployed_at: Utc::now(),
    };
    ctx.store.save(&record)?;

    info!(
        contract = contract_name,
        address = ?record.address,
        tx = ?receipt.transaction_hash,
        "deployed"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(requested: &[&str]) -> Vec<String> {
        requested.iter().map(|tag| tag.to_string()).collect()
    }

    fn names(steps: Vec<&'static DeployStep>) -> Vec<&'static str> {
        steps.into_iter().map(|step| step.name).collect()
    }

    #[test]
    fn the_default_tag_selects_every_step_in_order() {
        assert_eq!(
            names(selected_steps(&tags(&[DEFAULT_TAG]))),
            vec!["00-deploy-mocks", "01-deploy-fund-me"]
        );
    }

    #[test]
    fn tags_select_individual_steps() {
        assert_eq!(
            names(selected_steps(&tags(&["mocks"]))),
            vec!["00-deploy-mocks"]
        );
        assert_eq!(
            names(selected_steps(&tags(&["fundme"]))),
            vec!["01-deploy-fund-me"]
        );
        assert_eq!(
            names(selected_steps(&tags(&["mocks", "fundme"]))),
            vec!["00-deploy-mocks", "01-deploy-fund-me"]
        );
    }

    #[test]
    fn unmatched_tags_select_nothing() {
        assert!(selected_steps(&tags(&["verify"])).is_empty());
        assert!(selected_steps(&[]).is_empty());
    }
}
