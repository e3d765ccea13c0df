use std::{path::Path, sync::Arc, time::Duration};

use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{H160, U256},
    utils::hex,
};

use crate::{
    contracts::ContractArtifact,
    error::DeployError,
    utils::{ensure_code_at, wait_for_receipt},
};

pub type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

/// An authenticated session against the target network: a JSON-RPC provider
/// with a signing wallet bound to the network's chain id.
#[derive(Debug)]
pub struct Deploy {
    client: Arc<Client>,
    chain_id: U256,
    confirm_timeout: Duration,
}

impl Deploy {
    pub async fn connect(
        rpc: &str,
        deployer_key: &str,
        confirm_timeout: Duration,
    ) -> Result<Self, DeployError> {
        let connection = |reason: String| DeployError::Connection {
            endpoint: rpc.to_string(),
            reason,
        };

        let provider =
            Provider::<Http>::try_from(rpc).map_err(|e| connection(e.to_string()))?;

        // Parse the key before touching the network so a bad credential never
        // opens a session.
        let key = hex::decode(deployer_key.strip_prefix("0x").unwrap_or(deployer_key))
            .map_err(|_| DeployError::InvalidCredential("not valid hex".into()))?;
        let wallet = LocalWallet::from_bytes(&key)
            .map_err(|_| DeployError::InvalidCredential("not a valid signing key".into()))?;

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| connection(e.to_string()))?;
        let wallet = wallet.with_chain_id(chain_id.as_u64());

        log::info!("deploying with wallet: {:?}", wallet.address());

        Ok(Self {
            client: Arc::new(SignerMiddleware::new(provider, wallet)),
            chain_id,
            confirm_timeout,
        })
    }

    pub fn chain_id(&self) -> U256 {
        self.chain_id
    }

    /// Submits the token creation transaction and blocks until the network
    /// confirms code at the new address. Not idempotent: every call creates a
    /// fresh contract instance.
    pub async fn deploy_token(
        &self,
        artifact_path: &Path,
        owner: &str,
        initial_supply: U256,
    ) -> Result<H160, DeployError> {
        let factory = ContractArtifact::load(artifact_path)?.factory(self.client.clone());

        let owner: H160 = owner.parse().map_err(|_| {
            DeployError::Submission(format!("owner address {owner:?} is malformed"))
        })?;

        let deployer = factory
            .deploy((owner, initial_supply))
            .map_err(|e| DeployError::Submission(e.to_string()))?;

        let transaction_hash = self
            .client
            .send_transaction(deployer.tx, None)
            .await
            .map_err(|e| DeployError::Submission(e.to_string()))?
            .tx_hash();
        log::info!("transaction hash: {transaction_hash:?}");

        let receipt =
            wait_for_receipt(self.client.clone(), transaction_hash, self.confirm_timeout).await?;
        if receipt.status != Some(1.into()) {
            return Err(DeployError::Confirmation(format!(
                "transaction {transaction_hash:?} reverted"
            )));
        }
        let address = receipt.contract_address.ok_or_else(|| {
            DeployError::Confirmation(format!(
                "receipt for {transaction_hash:?} carries no contract address"
            ))
        })?;
        ensure_code_at(self.client.clone(), address).await?;

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_endpoint_is_a_connection_error() {
        let err = Deploy::connect("not an endpoint", "00", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Connection { .. }));
    }

    #[tokio::test]
    async fn non_hex_key_is_rejected_before_any_network_call() {
        // Port 0 is never reachable; the key check must fire first.
        let err = Deploy::connect("http://127.0.0.1:0", "zz", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::InvalidCredential(_)));
    }

    #[tokio::test]
    async fn wrong_length_key_is_rejected() {
        let err = Deploy::connect("http://127.0.0.1:0", "0xdeadbeef", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::InvalidCredential(_)));
    }
}
