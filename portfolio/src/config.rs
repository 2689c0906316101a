//! Portfolio configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use hexwatch_types::params::{EARLY_PENALTY_MIN_DAYS, GRACE_PERIOD};
use hexwatch_types::{AccountAddress, Chain, Day, ProtocolConstants};

use crate::account::Account;
use crate::store::PortfolioStore;
use crate::PortfolioError;

/// Configuration for a hexwatch portfolio.
///
/// Can be loaded from a TOML file via [`PortfolioConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Days after the served day before a stake starts bleeding.
    #[serde(default = "default_grace_period_days")]
    pub grace_period_days: Day,

    /// Floor for the early-end penalty.
    #[serde(default = "default_early_penalty_min_days")]
    pub early_penalty_min_days: Day,

    /// Chains to refresh.
    #[serde(default = "default_chains")]
    pub chains: Vec<Chain>,

    /// Accounts to track.
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// One `[[accounts]]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub address: AccountAddress,
    pub chain: Chain,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub favorite: bool,
}

impl From<&AccountConfig> for Account {
    fn from(config: &AccountConfig) -> Self {
        Account {
            address: config.address.clone(),
            chain: config.chain,
            name: config.name.clone(),
            is_favorite: config.favorite,
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_grace_period_days() -> Day {
    GRACE_PERIOD
}

fn default_early_penalty_min_days() -> Day {
    EARLY_PENALTY_MIN_DAYS
}

fn default_chains() -> Vec<Chain> {
    Chain::ALL.to_vec()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PortfolioConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PortfolioError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PortfolioError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, PortfolioError> {
        toml::from_str(s).map_err(|e| PortfolioError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, PortfolioError> {
        toml::to_string_pretty(self).map_err(|e| PortfolioError::Config(e.to_string()))
    }

    /// Contract constants for `chain` with this config's overrides applied.
    pub fn constants(&self, chain: Chain) -> ProtocolConstants {
        ProtocolConstants {
            grace_period_days: self.grace_period_days,
            early_penalty_min_days: self.early_penalty_min_days,
            ..ProtocolConstants::for_chain(chain)
        }
    }

    /// A store with every configured chain's constants and account registered.
    pub fn build_store(&self) -> PortfolioStore {
        let mut store = PortfolioStore::new();
        for chain in Chain::ALL {
            store.set_constants(chain, self.constants(chain));
        }
        for account in &self.accounts {
            store.register_account(account.into());
        }
        store
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            grace_period_days: default_grace_period_days(),
            early_penalty_min_days: default_early_penalty_min_days(),
            chains: default_chains(),
            accounts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_ACCOUNTS: &str = r#"
        grace_period_days = 7
        chains = ["pulsechain"]

        [[accounts]]
        address = "0x00000000000000000000000000000000000000AA"
        chain = "pulsechain"
        name = "cold"
        favorite = true

        [[accounts]]
        address = "0x00000000000000000000000000000000000000bb"
        chain = "ethereum"
    "#;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = PortfolioConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = PortfolioConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = PortfolioConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.grace_period_days, 14);
        assert_eq!(config.early_penalty_min_days, 90);
        assert_eq!(config.chains, vec![Chain::Ethereum, Chain::Pulsechain]);
        assert_eq!(config.log_format, "human");
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = PortfolioConfig::from_toml_str(TWO_ACCOUNTS).expect("should parse");
        assert_eq!(config.grace_period_days, 7);
        assert_eq!(config.chains, vec![Chain::Pulsechain]);
        assert_eq!(config.log_level, "info"); // default
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0].address.as_str(), "0x00000000000000000000000000000000000000aa");
        assert!(!config.accounts[1].favorite);
        assert_eq!(config.constants(Chain::Pulsechain).grace_period_days, 7);
    }

    #[test]
    fn bad_address_is_config_error() {
        let toml = r#"
            [[accounts]]
            address = "0x1234"
            chain = "ethereum"
        "#;
        assert!(matches!(PortfolioConfig::from_toml_str(toml), Err(PortfolioError::Config(_))));
    }

    #[test]
    fn build_store_registers_accounts() {
        let config = PortfolioConfig::from_toml_str(TWO_ACCOUNTS).unwrap();
        let store = config.build_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.favorites().len(), 1);
        assert_eq!(store.engine(Chain::Ethereum).constants().grace_period_days, 7);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_ACCOUNTS.as_bytes()).unwrap();
        let config = PortfolioConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.accounts.len(), 2);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = PortfolioConfig::from_toml_file("/nonexistent/hexwatch.toml");
        assert!(matches!(result, Err(PortfolioError::Config(_))));
    }
}
