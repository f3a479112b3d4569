//! Client configuration.
//!
//! Stored as pretty-printed JSON in `config.json` inside the
//! [`DataStorage`] directory. A missing file yields the defaults, so the
//! client runs without any setup against a local development node once a
//! contract address is known.
//!
//! ## Environment overrides
//!
//! [`Config::load`] reads a `.env` file if present and then applies, in
//! order:
//!
//! | Variable | Effect |
//! |---|---|
//! | `TODOLEDGER_NETWORK` | select a named network preset |
//! | `TODOLEDGER_RPC_URL` | override the RPC endpoint |
//! | `TODOLEDGER_CHAIN_ID` | override the expected chain id |
//! | `TODOLEDGER_CONTRACT_ADDRESS` | ledger contract address |
//! | `TODOLEDGER_GAS_LIMIT` | gas limit for mutations |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoledger::libs::config::Config;
//!
//! let config = Config::load()?;
//! let wallet = config.rpc_wallet()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::api::rpc::{RpcWallet, DEFAULT_GAS_LIMIT, DEFAULT_POLL_INTERVAL};
use crate::api::Address;
use crate::libs::chain::LOCAL_CHAIN_ID;
use crate::libs::messages::Message;
use crate::libs::sync::{SyncOptions, DEFAULT_CONFIRMATION_TIMEOUT};
use crate::{msg_bail_anyhow, msg_debug, msg_error_anyhow};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_NETWORK: &str = "TODOLEDGER_NETWORK";
pub const ENV_RPC_URL: &str = "TODOLEDGER_RPC_URL";
pub const ENV_CHAIN_ID: &str = "TODOLEDGER_CHAIN_ID";
pub const ENV_CONTRACT_ADDRESS: &str = "TODOLEDGER_CONTRACT_ADDRESS";
pub const ENV_GAS_LIMIT: &str = "TODOLEDGER_GAS_LIMIT";

/// Networks the ledger contract is commonly deployed to.
const NETWORK_PRESETS: [(&str, u64, &str); 5] = [
    ("localhost", LOCAL_CHAIN_ID, "http://127.0.0.1:8545"),
    ("amoy", 80002, "https://polygon-amoy.blockpi.network/v1/rpc/public"),
    ("sepolia", 11155111, "https://eth-sepolia.public.blastapi.io"),
    ("arbitrum_sepolia", 421614, "https://sepolia-rollup.arbitrum.io/rpc"),
    ("core_testnet", 1115, "https://rpc.test.btcs.network"),
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    pub chain_id: u64,
}

impl NetworkConfig {
    /// Looks up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        NETWORK_PRESETS
            .iter()
            .find(|(preset, _, _)| *preset == name)
            .map(|(name, chain_id, rpc_url)| NetworkConfig {
                name: name.to_string(),
                rpc_url: rpc_url.to_string(),
                chain_id: *chain_id,
            })
    }

    pub fn preset_names() -> Vec<&'static str> {
        NETWORK_PRESETS.iter().map(|(name, _, _)| *name).collect()
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            name: "localhost".to_string(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: LOCAL_CHAIN_ID,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TransactionConfig {
    pub gas_limit: u64,
    /// Seconds a submission may take from send to confirmation.
    pub confirmation_timeout_secs: u64,
    /// Milliseconds between receipt polls.
    pub poll_interval_ms: u64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        TransactionConfig {
            gas_limit: DEFAULT_GAS_LIMIT,
            confirmation_timeout_secs: DEFAULT_CONFIRMATION_TIMEOUT.as_secs(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub transactions: TransactionConfig,
}

impl Config {
    /// Reads `config.json`, falling back to defaults when it does not exist.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            msg_debug!(Message::ConfigFileNotFound);
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str).map_err(|e| msg_error_anyhow!(format!("{}: {}", Message::ConfigParseError, e)))?;
        msg_debug!(Message::ConfigLoaded);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        msg_debug!(Message::ConfigSaved);
        Ok(())
    }

    /// [`read`](Self::read) plus `.env` and environment overrides.
    pub fn load() -> Result<Config> {
        dotenv::dotenv().ok();
        let mut config = Self::read()?;
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps variable names to values.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(name) = lookup(ENV_NETWORK) {
            match NetworkConfig::preset(&name) {
                Some(network) => self.network = Some(network),
                None => msg_bail_anyhow!(Message::UnknownNetwork(name)),
            }
        }
        if let Some(rpc_url) = lookup(ENV_RPC_URL) {
            self.network.get_or_insert_with(NetworkConfig::default).rpc_url = rpc_url;
        }
        if let Some(chain_id) = lookup(ENV_CHAIN_ID) {
            self.network.get_or_insert_with(NetworkConfig::default).chain_id = parse_value(ENV_CHAIN_ID, &chain_id)?;
        }
        if let Some(address) = lookup(ENV_CONTRACT_ADDRESS) {
            self.contract_address = Some(address);
        }
        if let Some(gas_limit) = lookup(ENV_GAS_LIMIT) {
            self.transactions.gas_limit = parse_value(ENV_GAS_LIMIT, &gas_limit)?;
        }
        Ok(())
    }

    pub fn contract(&self) -> Result<Address> {
        let address = self.contract_address.as_deref().ok_or_else(|| msg_error_anyhow!(Message::ContractAddressNotSet))?;
        Address::parse(address).map_err(|e| msg_error_anyhow!(format!("{}: {}", Message::ConfigInvalidValue("contract_address".into(), address.into()), e)))
    }

    /// Builds the JSON-RPC wallet for the configured network and contract.
    pub fn rpc_wallet(&self) -> Result<RpcWallet> {
        let network = self.network.as_ref().ok_or_else(|| msg_error_anyhow!(Message::NetworkNotSet))?;
        Ok(RpcWallet::new(&network.rpc_url, self.contract()?)
            .with_gas_limit(self.transactions.gas_limit)
            .with_poll_interval(Duration::from_millis(self.transactions.poll_interval_ms))
            .with_expected_chain_id(network.chain_id))
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            confirmation_timeout: Duration::from_secs(self.transactions.confirmation_timeout_secs),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| msg_error_anyhow!(Message::ConfigInvalidValue(key.to_string(), value.to_string())))
}
