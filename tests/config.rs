#[cfg(test)]
mod tests {
    use parking_lot::{Mutex, MutexGuard};
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todoledger::libs::config::{Config, NetworkConfig, TransactionConfig, CONFIG_FILE_NAME, ENV_CHAIN_ID, ENV_CONTRACT_ADDRESS, ENV_GAS_LIMIT, ENV_NETWORK, ENV_RPC_URL};
    use todoledger::libs::data_storage::DataStorage;

    // Tests in this file repoint HOME, so they run one at a time.
    static HOME_LOCK: Mutex<()> = Mutex::new(());

    struct ConfigTestContext {
        _temp_dir: TempDir,
        _guard: MutexGuard<'static, ()>,
        contract: String,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let guard = HOME_LOCK.lock();
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext {
                _temp_dir: temp_dir,
                _guard: guard,
                contract: "0x5fbdb2315678afecb367f032d93f642f64180aa3".to_string(),
            }
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_default_config(_ctx: &mut ConfigTestContext) {
        let config = Config::default();
        assert!(config.network.is_none());
        assert!(config.contract_address.is_none());
        assert_eq!(config.transactions.gas_limit, 300_000);
        assert_eq!(config.sync_options().confirmation_timeout, Duration::from_secs(120));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(_ctx: &mut ConfigTestContext) {
        assert_eq!(Config::read().unwrap(), Config::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(ctx: &mut ConfigTestContext) {
        let config = Config {
            network: NetworkConfig::preset("sepolia"),
            contract_address: Some(ctx.contract.clone()),
            transactions: TransactionConfig {
                gas_limit: 500_000,
                confirmation_timeout_secs: 30,
                poll_interval_ms: 250,
            },
        };
        config.save().unwrap();

        assert_eq!(Config::read().unwrap(), config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file_uses_transaction_defaults(ctx: &mut ConfigTestContext) {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(&path, format!(r#"{{ "contract_address": "{}" }}"#, ctx.contract)).unwrap();

        let config = Config::read().unwrap();
        assert_eq!(config.contract_address.as_deref(), Some(ctx.contract.as_str()));
        assert_eq!(config.transactions, TransactionConfig::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_malformed_file_is_an_error(_ctx: &mut ConfigTestContext) {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Config::read().is_err());
    }

    #[test]
    fn test_network_presets() {
        let amoy = NetworkConfig::preset("amoy").unwrap();
        assert_eq!(amoy.chain_id, 80002);
        assert_eq!(NetworkConfig::preset("localhost").unwrap(), NetworkConfig::default());
        assert!(NetworkConfig::preset("mainnet").is_none());
        assert_eq!(NetworkConfig::preset_names().len(), 5);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup(&[
                (ENV_NETWORK, "arbitrum_sepolia"),
                (ENV_RPC_URL, "http://node.internal:8545"),
                (ENV_CONTRACT_ADDRESS, "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
                (ENV_GAS_LIMIT, "450000"),
            ]))
            .unwrap();

        let network = config.network.clone().unwrap();
        assert_eq!(network.name, "arbitrum_sepolia");
        assert_eq!(network.chain_id, 421614);
        assert_eq!(network.rpc_url, "http://node.internal:8545");
        assert_eq!(config.transactions.gas_limit, 450_000);
        assert_eq!(config.contract().unwrap().as_str(), "0x5fbdb2315678afecb367f032d93f642f64180aa3");
        assert!(config.rpc_wallet().is_ok());
    }

    #[test]
    fn test_chain_id_override_without_network() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[(ENV_CHAIN_ID, "1337")])).unwrap();

        let network = config.network.unwrap();
        assert_eq!(network.chain_id, 1337);
        assert_eq!(network.rpc_url, NetworkConfig::default().rpc_url);
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = Config::default();
        assert!(config.apply_overrides(lookup(&[(ENV_NETWORK, "mainnet")])).is_err());
        assert!(config.apply_overrides(lookup(&[(ENV_GAS_LIMIT, "lots")])).is_err());
        assert!(config.apply_overrides(lookup(&[(ENV_CHAIN_ID, "-1")])).is_err());
    }

    #[test]
    fn test_rpc_wallet_requires_network_and_contract() {
        let mut config = Config::default();
        assert!(config.rpc_wallet().is_err());

        config.network = Some(NetworkConfig::default());
        assert!(config.rpc_wallet().is_err());

        config.contract_address = Some("0x1234".to_string());
        assert!(config.contract().is_err());
    }
}
