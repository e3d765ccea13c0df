use std::fmt;

use ethers::types::U256;

use crate::error::DeployError;

pub const ENV_RPC_URL: &str = "RPC_URL";
pub const ENV_DEPLOYER_KEY: &str = "DEPLOYER_KEY";
pub const ENV_OWNER_ADDRESS: &str = "OWNER_ADDRESS";
pub const ENV_INITIAL_SUPPLY: &str = "INITIAL_SUPPLY";

/// 1,000,000 whole tokens at 18 decimals.
pub fn default_initial_supply() -> U256 {
    U256::exp10(24)
}

/// Everything a run needs, resolved from the environment before any network
/// call is made.
#[derive(Clone)]
pub struct DeployConfig {
    pub rpc_url: String,
    pub deployer_key: String,
    pub owner: String,
    pub initial_supply: U256,
}

impl DeployConfig {
    pub fn from_env() -> Result<Self, DeployError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DeployError> {
        // An empty variable counts as unset.
        let present = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let (rpc_url, deployer_key, owner) = match (
            present(ENV_RPC_URL),
            present(ENV_DEPLOYER_KEY),
            present(ENV_OWNER_ADDRESS),
        ) {
            (Some(rpc_url), Some(deployer_key), Some(owner)) => (rpc_url, deployer_key, owner),
            (rpc_url, deployer_key, owner) => {
                let missing = [
                    (ENV_RPC_URL, rpc_url.is_none()),
                    (ENV_DEPLOYER_KEY, deployer_key.is_none()),
                    (ENV_OWNER_ADDRESS, owner.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(DeployError::MissingConfiguration(missing));
            }
        };

        let initial_supply = match present(ENV_INITIAL_SUPPLY) {
            Some(raw) => {
                U256::from_dec_str(&raw).map_err(|_| DeployError::InvalidSupply(raw))?
            }
            None => default_initial_supply(),
        };

        Ok(Self {
            rpc_url,
            deployer_key,
            owner,
            initial_supply,
        })
    }
}

// The deployer key is secret and must never reach the logs.
impl fmt::Debug for DeployConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployConfig")
            .field("rpc_url", &self.rpc_url)
            .field("deployer_key", &"<redacted>")
            .field("owner", &self.owner)
            .field("initial_supply", &self.initial_supply)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&str, &str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    const VALID: &[(&str, &str)] = &[
        ("RPC_URL", "https://node.example"),
        (
            "DEPLOYER_KEY",
            "0x4c0883a69102937d6231471b5dbb6204fe51296170827936ea5cce4b76994b0f",
        ),
        ("OWNER_ADDRESS", "0xABCDEF0123456789abcdef0123456789ABCDEF01"),
    ];

    #[test]
    fn loads_complete_configuration() {
        let config = DeployConfig::from_lookup(lookup(VALID)).unwrap();
        assert_eq!(config.rpc_url, "https://node.example");
        assert_eq!(config.owner, "0xABCDEF0123456789abcdef0123456789ABCDEF01");
        assert_eq!(config.initial_supply, default_initial_supply());
    }

    #[test]
    fn reports_all_missing_fields_at_once() {
        let err = DeployConfig::from_lookup(lookup(&[])).unwrap_err();
        match err {
            DeployError::MissingConfiguration(missing) => {
                assert_eq!(missing, vec!["RPC_URL", "DEPLOYER_KEY", "OWNER_ADDRESS"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_owner_counts_as_missing() {
        let vars = [VALID[0], VALID[1], ("OWNER_ADDRESS", "")];
        let err = DeployConfig::from_lookup(lookup(&vars)).unwrap_err();
        match err {
            DeployError::MissingConfiguration(missing) => {
                assert_eq!(missing, vec!["OWNER_ADDRESS"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_supply_is_one_million_tokens() {
        let config = DeployConfig::from_lookup(lookup(VALID)).unwrap();
        assert_eq!(
            config.initial_supply.to_string(),
            "1000000000000000000000000"
        );
    }

    #[test]
    fn supply_override_is_parsed_as_decimal() {
        let vars = [VALID[0], VALID[1], VALID[2], ("INITIAL_SUPPLY", "42")];
        let config = DeployConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.initial_supply, U256::from(42u64));
    }

    #[test]
    fn empty_supply_override_falls_back_to_default() {
        let vars = [VALID[0], VALID[1], VALID[2], ("INITIAL_SUPPLY", "")];
        let config = DeployConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.initial_supply, default_initial_supply());
    }

    #[test]
    fn rejects_unparseable_supply_overrides() {
        for bad in ["abc", "-5", "1.5", "1e24", "10 000"] {
            let vars = [VALID[0], VALID[1], VALID[2], ("INITIAL_SUPPLY", bad)];
            let err = DeployConfig::from_lookup(lookup(&vars)).unwrap_err();
            assert!(
                matches!(err, DeployError::InvalidSupply(ref raw) if raw == bad),
                "expected InvalidSupply for {bad:?}, got {err}"
            );
        }
    }

    #[test]
    fn debug_output_redacts_the_deployer_key() {
        let config = DeployConfig::from_lookup(lookup(VALID)).unwrap();
        let rendered = format!("{config:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("4c0883a6"));
    }
}
