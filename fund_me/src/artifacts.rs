use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use ethers::{abi::Abi, types::Bytes};
use serde::{Deserialize, Serialize};

/// Compiled-contract artifact in the hardhat layout: the ABI plus creation
/// bytecode. Artifacts are produced out-of-band by solc and consumed here at
/// deploy time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractArtifact {
    #[serde(rename = "contractName")]
    pub contract_name: String,
    pub abi: serde_json::Value,
    pub bytecode: String,
}

pub fn artifact_path(artifacts_dir: &Path, contract_name: &str) -> PathBuf {
    artifacts_dir.join(format!("{contract_name}.json"))
}

impl ContractArtifact {
    pub fn load(artifacts_dir: &Path, contract_name: &str) -> Result<Self> {
        let path = artifact_path(artifacts_dir, contract_name);
        let raw = fs::read_to_string(&path).with_context(|| {
            format!(
                "missing artifact for {contract_name} at {} (compile the sources under contracts/ to produce it)",
                path.display()
            )
        })?;
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed artifact at {}", path.display()))
    }

    pub fn abi(&self) -> Result<Abi> {
        serde_json::from_value(self.abi.clone())
            .with_context(|| format!("artifact for {} has an invalid ABI", self.contract_name))
    }

    /// Creation bytecode, `0x`-prefix tolerant.
    pub fn bytecode(&self) -> Result<Bytes> {
        let stripped = self.bytecode.trim_start_matches("0x");
        let bytes = hex::decode(stripped).with_context(|| {
            format!("artifact for {} has invalid bytecode hex", self.contract_name)
        })?;
        if bytes.is_empty() {
            return Err(anyhow!(
                "artifact for {} carries no creation bytecode",
                self.contract_name
            ));
        }
        Ok(bytes.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "contractName": "MockV3Aggregator",
        "abi": [
            {
                "inputs": [],
                "name": "latestAnswer",
                "outputs": [{ "internalType": "int256", "name": "", "type": "int256" }],
                "stateMutability": "view",
                "type": "function"
            }
        ],
        "bytecode": "0x60806040"
    }"#;

    #[test]
    fn parses_hardhat_artifacts() {
        let artifact: ContractArtifact = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(artifact.contract_name, "MockV3Aggregator");

        let abi = artifact.abi().unwrap();
        assert!(abi.function("latestAnswer").is_ok());

        assert_eq!(artifact.bytecode().unwrap().to_vec(), vec![0x60, 0x80, 0x60, 0x40]);
    }

    #[test]
    fn bytecode_works_without_prefix() {
        let mut artifact: ContractArtifact = serde_json::from_str(SAMPLE).unwrap();
        artifact.bytecode = "60806040".to_owned();
        assert_eq!(artifact.bytecode().unwrap().to_vec(), vec![0x60, 0x80, 0x60, 0x40]);
    }

    #[test]
    fn empty_bytecode_is_an_error() {
        let mut artifact: ContractArtifact = serde_json::from_str(SAMPLE).unwrap();
        artifact.bytecode = "0x".to_owned();
        assert!(artifact.bytecode().is_err());

        artifact.bytecode = "not-hex".to_owned();
        assert!(artifact.bytecode().is_err());
    }
}
