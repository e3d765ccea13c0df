use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::DeployError;

/// The sole output artifact of a successful run. Field order is the file's
/// field order; all numbers are decimal strings so downstream tooling never
/// loses precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub token: String,
    pub owner: String,
    pub supply: String,
    #[serde(rename = "chainId")]
    pub chain_id: String,
}

impl DeploymentRecord {
    /// Fully replaces any previous record. The JSON is staged in a temp file
    /// next to the destination and renamed into place, so a killed process
    /// cannot leave a truncated record behind.
    pub fn write(&self, path: &Path) -> Result<(), DeployError> {
        let output = |source: std::io::Error| DeployError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_string_pretty(self).map_err(|e| output(e.into()))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => PathBuf::from(parent),
            _ => PathBuf::from("."),
        };
        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(output)?;
        staged.write_all(json.as_bytes()).map_err(output)?;
        staged.as_file().sync_all().map_err(output)?;
        staged.persist(path).map_err(|e| output(e.error))?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}
