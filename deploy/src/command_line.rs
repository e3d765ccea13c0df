use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;

use crate::{config::DeployConfig, deploy::Deploy, record::DeploymentRecord};

#[derive(Debug, Parser)]
pub struct CommandLine {
    /// Compiled token artifact (ABI and creation bytecode).
    #[clap(long, default_value = "artifacts/AssetToken.json")]
    artifact: PathBuf,

    /// Where the deployment record is written.
    #[clap(short, long, default_value = "deployments.json")]
    out: PathBuf,

    /// Give up waiting for confirmation after this many seconds.
    #[clap(long, default_value_t = 300)]
    confirm_timeout: u64,
}

impl CommandLine {
    pub async fn execute(self) -> Result<()> {
        let config = DeployConfig::from_env()?;

        log::info!("connecting to {}", config.rpc_url);
        let deploy = Deploy::connect(
            &config.rpc_url,
            &config.deployer_key,
            Duration::from_secs(self.confirm_timeout),
        )
        .await?;

        let token = deploy
            .deploy_token(&self.artifact, &config.owner, config.initial_supply)
            .await?;
        println!("token deployed: {token:?}");

        let record = DeploymentRecord {
            token: format!("{token:?}"),
            owner: config.owner.clone(),
            supply: config.initial_supply.to_string(),
            chain_id: deploy.chain_id().to_string(),
        };
        record.write(&self.out)?;
        println!("deployment record saved to {}", self.out.display());

        Ok(())
    }
}
