use std::{fs, path::Path, sync::Arc};

use ethers::{abi::Abi, contract::ContractFactory, types::Bytes};
use serde::Deserialize;

use crate::{deploy::Client, error::DeployError};

/// Compiled asset contract as emitted by the contract toolchain: the ABI and
/// the creation bytecode. Everything else in the artifact file is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractArtifact {
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        let artifact = |reason: String| DeployError::Artifact {
            path: path.to_path_buf(),
            reason,
        };

        let raw = fs::read_to_string(path).map_err(|e| artifact(e.to_string()))?;
        let parsed: Self = serde_json::from_str(&raw).map_err(|e| artifact(e.to_string()))?;
        if parsed.bytecode.is_empty() {
            return Err(artifact("empty creation bytecode".into()));
        }
        Ok(parsed)
    }

    pub fn factory(&self, client: Arc<Client>) -> ContractFactory<Client> {
        ContractFactory::new(self.abi.clone(), self.bytecode.clone(), client)
    }
}
