use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use ethers::types::{Address, H256, U64};
use serde::{Deserialize, Serialize};

/// Receipt of one contract deployment, persisted per network so later steps
/// and commands can locate the instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: Option<H256>,
    pub deployer: Address,
    pub block_number: Option<U64>,
    pub abi: serde_json::Value,
    pub deployed_at: DateTime<Utc>,
}

/// Flat directory of deployment records, one JSON file per contract under a
/// per-network subdirectory.
pub struct DeploymentsStore {
    root: PathBuf,
    network: String,
}

impl DeploymentsStore {
    pub fn new(root: impl Into<PathBuf>, network: &str) -> Self {
        Self {
            root: root.into(),
            network: network.to_owned(),
        }
    }

    pub fn record_path(&self, contract_name: &str) -> PathBuf {
        self.root
            .join(&self.network)
            .join(format!("{contract_name}.json"))
    }

    pub fn save(&self, record: &DeploymentRecord) -> Result<()> {
        let path = self.record_path(&record.contract_name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("could not create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)
            .with_context(|| format!("could not write {}", path.display()))?;
        Ok(())
    }

    pub fn try_get(&self, contract_name: &str) -> Result<Option<DeploymentRecord>> {
        let path = self.record_path(contract_name);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let record = serde_json::from_str(&raw)
            .with_context(|| format!("malformed deployment record at {}", path.display()))?;
        Ok(Some(record))
    }

    /// Like [`try_get`](Self::try_get), but a missing record is an error.
    pub fn get(&self, contract_name: &str) -> Result<DeploymentRecord> {
        self.try_get(contract_name)?.ok_or_else(|| {
            anyhow!(
                "no {contract_name} deployment recorded for network {} (run deploy first)",
                self.network
            )
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> DeploymentsStore {
        let root = std::env::temp_dir().join(format!("fund-me-records-{}", uuid::Uuid::new_v4()));
        DeploymentsStore::new(root, "localhost")
    }

    fn sample_record() -> DeploymentRecord {
        DeploymentRecord {
            contract_name: "FundMe".to_owned(),
            address: Address::repeat_byte(0x11),
            transaction_hash: Some(H256::repeat_byte(0x22)),
            deployer: Address::repeat_byte(0x33),
            block_number: Some(7u64.into()),
            abi: serde_json::json!([]),
            deployed_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_records() {
        let store = temp_store();
        let record = sample_record();
        store.save(&record).unwrap();

        let loaded = store.get("FundMe").unwrap();
        assert_eq!(loaded.contract_name, record.contract_name);
        assert_eq!(loaded.address, record.address);
        assert_eq!(loaded.transaction_hash, record.transaction_hash);
        assert_eq!(loaded.deployer, record.deployer);
        assert_eq!(loaded.block_number, record.block_number);
    }

    #[test]
    fn records_are_scoped_by_network() {
        let root = std::env::temp_dir().join(format!("fund-me-records-{}", uuid::Uuid::new_v4()));
        let localhost = DeploymentsStore::new(root.clone(), "localhost");
        let sepolia = DeploymentsStore::new(root, "sepolia");

        localhost.save(&sample_record()).unwrap();

        assert!(localhost.try_get("FundMe").unwrap().is_some());
        assert!(sepolia.try_get("FundMe").unwrap().is_none());
    }

    #[test]
    fn missing_records_name_the_deploy_step() {
        let store = temp_store();
        assert!(store.try_get("FundMe").unwrap().is_none());

        let err = store.get("FundMe").unwrap_err();
        assert!(err.to_string().contains("deploy"));
    }
}
