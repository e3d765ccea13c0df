use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use ethers::{
    providers::Middleware,
    types::{TransactionReceipt, H160, H256},
};

use crate::error::DeployError;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls for the transaction receipt until the network has included the
/// transaction or the timeout elapses.
pub async fn wait_for_receipt<M: Middleware>(
    client: Arc<M>,
    transaction_hash: H256,
    timeout: Duration,
) -> Result<TransactionReceipt, DeployError> {
    let started = Instant::now();
    loop {
        let receipt = client
            .get_transaction_receipt(transaction_hash)
            .await
            .map_err(|e| DeployError::Confirmation(e.to_string()))?;
        if let Some(receipt) = receipt {
            return Ok(receipt);
        }
        if started.elapsed() >= timeout {
            return Err(DeployError::ConfirmationTimeout {
                tx: transaction_hash,
                secs: timeout.as_secs(),
            });
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// A confirmed creation must leave observable code behind.
pub async fn ensure_code_at<M: Middleware>(client: Arc<M>, address: H160) -> Result<(), DeployError> {
    let code = client
        .get_code(address, None)
        .await
        .map_err(|e| DeployError::Confirmation(e.to_string()))?;
    if code.is_empty() {
        return Err(DeployError::Confirmation(format!(
            "no code at {address:?} after deployment"
        )));
    }
    Ok(())
}
