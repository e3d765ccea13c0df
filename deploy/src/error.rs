use std::{io, path::PathBuf};

use ethers::types::H256;
use thiserror::Error;

/// Every way a deployment run can fail. All variants are terminal; nothing
/// is retried.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("missing configuration: {}", .0.join(", "))]
    MissingConfiguration(Vec<&'static str>),

    #[error("invalid initial supply {0:?}, expected an unsigned decimal integer")]
    InvalidSupply(String),

    #[error("cannot reach rpc endpoint {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    // The message must describe the problem without echoing key material.
    #[error("invalid deployer key: {0}")]
    InvalidCredential(String),

    #[error("unusable contract artifact {}: {reason}", .path.display())]
    Artifact { path: PathBuf, reason: String },

    #[error("deployment transaction rejected: {0}")]
    Submission(String),

    #[error("transaction {tx:?} not confirmed within {secs}s")]
    ConfirmationTimeout { tx: H256, secs: u64 },

    #[error("deployment not confirmed: {0}")]
    Confirmation(String),

    #[error("cannot write deployment record to {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_lists_every_field() {
        let err = DeployError::MissingConfiguration(vec!["RPC_URL", "OWNER_ADDRESS"]);
        assert_eq!(
            err.to_string(),
            "missing configuration: RPC_URL, OWNER_ADDRESS"
        );
    }

    #[test]
    fn invalid_credential_message_carries_no_key_material() {
        let err = DeployError::InvalidCredential("deployer key is not valid hex".into());
        assert!(!err.to_string().contains("0x"));
    }
}
