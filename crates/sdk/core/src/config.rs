//! Configuration resolver.
//!
//! Connection and program addressing parameters are validated up front, all at
//! once, so a misconfigured process fails before it builds or submits anything.
//!
//! Environment variables:
//! - `SUI_NETWORK` - Network name (mainnet, testnet, devnet, localnet)
//! - `SUI_RPC_URL` - Fullnode JSON-RPC endpoint
//! - `DROPS_PACKAGE_ID` - Deployed drops package ID
//! - `DROPS_PACKAGE_NAME` - Package name (informational)
//! - `COLLECTION_MODULE_NAME` - Module hosting `create` / `mint`
//! - `DROP_MODULE_NAME` - Module defining the drop object
//! - `COLLECTIONS_REGISTRY_ID` - Shared collections registry object
//! - `ADDRESS_DROPS_REGISTRY_ID` - Shared address → drops registry object
//! - `USER_PRIVATE_KEY` - Signer secret
//! - `SUI_GAS_BUDGET` - Gas budget in MIST (default: 100000000)
//! - `DROPS_FINALITY_TIMEOUT_MS` - Finality wait (default: 5000)
//! - `DROPS_POLL_INTERVAL_MS` - Finality poll interval (default: 200)

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use crate::error::{ConfigurationError, FieldIssue};
use crate::types::ObjectId;

pub const DEFAULT_GAS_BUDGET: u64 = 100_000_000; // 0.1 SUI
pub const DEFAULT_FINALITY_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

static GLOBAL: OnceLock<DropsConfig> = OnceLock::new();

/// Sui network types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiNetwork {
    Mainnet,
    Testnet,
    Devnet,
    Localnet,
}

impl SuiNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuiNetwork::Mainnet => "mainnet",
            SuiNetwork::Testnet => "testnet",
            SuiNetwork::Devnet => "devnet",
            SuiNetwork::Localnet => "localnet",
        }
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            SuiNetwork::Mainnet => "https://fullnode.mainnet.sui.io:443",
            SuiNetwork::Testnet => "https://fullnode.testnet.sui.io:443",
            SuiNetwork::Devnet => "https://fullnode.devnet.sui.io:443",
            SuiNetwork::Localnet => "http://127.0.0.1:9000",
        }
    }
}

impl FromStr for SuiNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(SuiNetwork::Mainnet),
            "testnet" => Ok(SuiNetwork::Testnet),
            "devnet" => Ok(SuiNetwork::Devnet),
            "localnet" | "local" => Ok(SuiNetwork::Localnet),
            other => Err(format!(
                "'{}' is not a network; must be mainnet, testnet, devnet, or localnet",
                other
            )),
        }
    }
}

impl fmt::Display for SuiNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signer secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Validated, immutable SDK configuration.
///
/// Construct it once and pass it by reference to the components that need it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropsConfig {
    pub network: SuiNetwork,
    pub rpc_url: String,
    pub package_id: ObjectId,
    pub package_name: String,
    pub collection_module: String,
    pub drop_module: String,
    pub collections_registry_id: ObjectId,
    pub address_drops_registry_id: ObjectId,
    user_private_key: SecretKey,
    /// Gas budget for transactions (in MIST)
    pub gas_budget: u64,
    pub finality_timeout: Duration,
    pub poll_interval: Duration,
}

impl DropsConfig {
    /// Validate the process environment once and cache the result.
    ///
    /// Subsequent calls return the cached record without re-reading the
    /// environment. A failed validation is not cached.
    pub fn init_from_env() -> Result<&'static DropsConfig, ConfigurationError> {
        if let Some(config) = GLOBAL.get() {
            return Ok(config);
        }

        let config = Self::from_env()?;
        tracing::info!(
            "Configuration loaded: network={}, package={}",
            config.network,
            config.package_id
        );
        Ok(GLOBAL.get_or_init(|| config))
    }

    /// Validate the current process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_vars(std::env::vars())
    }

    /// Validate an arbitrary source of key/value pairs.
    ///
    /// Every key is checked; the error lists all offending keys, not just the
    /// first one found.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut resolver = Resolver::new(vars);

        let network = resolver.network("SUI_NETWORK");
        let rpc_url = resolver.url("SUI_RPC_URL", network);
        let package_id = resolver.object_id("DROPS_PACKAGE_ID");
        let package_name = resolver.required("DROPS_PACKAGE_NAME");
        let collection_module = resolver.identifier("COLLECTION_MODULE_NAME");
        let drop_module = resolver.identifier("DROP_MODULE_NAME");
        let collections_registry_id = resolver.object_id("COLLECTIONS_REGISTRY_ID");
        let address_drops_registry_id = resolver.object_id("ADDRESS_DROPS_REGISTRY_ID");
        let user_private_key = SecretKey::new(resolver.required("USER_PRIVATE_KEY"));
        let gas_budget = resolver.positive_u64("SUI_GAS_BUDGET", DEFAULT_GAS_BUDGET);
        let finality_timeout_ms =
            resolver.positive_u64("DROPS_FINALITY_TIMEOUT_MS", DEFAULT_FINALITY_TIMEOUT_MS);
        let poll_interval_ms =
            resolver.positive_u64("DROPS_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);

        resolver.finish()?;

        Ok(Self {
            network,
            rpc_url,
            package_id,
            package_name,
            collection_module,
            drop_module,
            collections_registry_id,
            address_drops_registry_id,
            user_private_key,
            gas_budget,
            finality_timeout: Duration::from_millis(finality_timeout_ms),
            poll_interval: Duration::from_millis(poll_interval_ms),
        })
    }

    pub fn user_private_key(&self) -> &SecretKey {
        &self.user_private_key
    }

    /// Fully qualified type of the collection object (`<pkg>::<module>::Collection`).
    pub fn collection_type(&self) -> String {
        format!("{}::{}::Collection", self.package_id, self.collection_module)
    }

    /// Fully qualified type of the drop object (`<pkg>::<module>::Drop`).
    pub fn drop_type(&self) -> String {
        format!("{}::{}::Drop", self.package_id, self.drop_module)
    }
}

/// Collects values and issues in one pass over the declared keys.
///
/// Failed lookups return a placeholder so resolution can continue; `finish`
/// turns any recorded issue into an error before placeholders escape.
struct Resolver {
    vars: HashMap<String, String>,
    issues: Vec<FieldIssue>,
}

impl Resolver {
    fn new<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            issues: Vec::new(),
        }
    }

    fn fail(&mut self, key: &'static str, problem: impl Into<String>) {
        self.issues.push(FieldIssue {
            key,
            problem: problem.into(),
        });
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, key: &'static str) -> String {
        match self.lookup(key) {
            Some(value) => value.to_string(),
            None => {
                self.fail(key, "missing or empty");
                String::new()
            }
        }
    }

    fn network(&mut self, key: &'static str) -> SuiNetwork {
        let Some(raw) = self.lookup(key).map(str::to_string) else {
            self.fail(key, "missing or empty");
            return SuiNetwork::Testnet;
        };
        raw.parse().unwrap_or_else(|problem: String| {
            self.fail(key, problem);
            SuiNetwork::Testnet
        })
    }

    fn url(&mut self, key: &'static str, network: SuiNetwork) -> String {
        let Some(value) = self.lookup(key).map(str::to_string) else {
            self.fail(
                key,
                format!(
                    "missing or empty (the public {} fullnode is {})",
                    network,
                    network.default_rpc_url()
                ),
            );
            return String::new();
        };
        if !value.starts_with("http://") && !value.starts_with("https://") {
            self.fail(key, format!("'{}' must start with http:// or https://", value));
        }
        value
    }

    fn object_id(&mut self, key: &'static str) -> ObjectId {
        let Some(raw) = self.lookup(key).map(str::to_string) else {
            self.fail(key, "missing or empty");
            return ObjectId::new("");
        };
        ObjectId::parse(&raw).unwrap_or_else(|problem| {
            self.fail(key, problem);
            ObjectId::new("")
        })
    }

    fn identifier(&mut self, key: &'static str) -> String {
        let value = self.required(key);
        if !value.is_empty() && !is_move_identifier(&value) {
            self.fail(key, format!("'{}' is not a valid Move identifier", value));
        }
        value
    }

    fn positive_u64(&mut self, key: &'static str, default: u64) -> u64 {
        let Some(raw) = self.lookup(key).map(str::to_string) else {
            return default;
        };
        match raw.parse::<u64>() {
            Ok(0) => {
                self.fail(key, "must be greater than 0");
                default
            }
            Ok(value) => value,
            Err(_) => {
                self.fail(key, format!("'{}' is not an unsigned integer", raw));
                default
            }
        }
    }

    fn finish(self) -> Result<(), ConfigurationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigurationError {
                issues: self.issues,
            })
        }
    }
}

fn is_move_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let valid_start = match chars.next() {
        Some(c) => c.is_ascii_alphabetic() || (c == '_' && value.len() > 1),
        None => false,
    };
    valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::sample_vars;

    fn without(key: &str) -> Vec<(String, String)> {
        sample_vars()
            .into_iter()
            .filter(|(k, _)| k != key)
            .collect()
    }

    fn with(key: &str, value: &str) -> Vec<(String, String)> {
        let mut vars = without(key);
        vars.push((key.to_string(), value.to_string()));
        vars
    }

    #[test]
    fn resolves_complete_source() {
        let config = DropsConfig::from_vars(sample_vars()).unwrap();

        assert_eq!(config.network, SuiNetwork::Testnet);
        assert_eq!(config.collection_module, "collection");
        assert_eq!(config.gas_budget, DEFAULT_GAS_BUDGET);
        assert_eq!(config.finality_timeout, Duration::from_millis(5_000));
        assert_eq!(config.poll_interval, Duration::from_millis(200));
        assert!(config.collection_type().ends_with("::collection::Collection"));
    }

    #[test]
    fn missing_package_id_is_named() {
        let err = DropsConfig::from_vars(without("DROPS_PACKAGE_ID")).unwrap_err();

        assert!(err.mentions("DROPS_PACKAGE_ID"));
        assert!(err.to_string().contains("DROPS_PACKAGE_ID"));
        assert_eq!(err.issues.len(), 1);
    }

    #[test]
    fn missing_rpc_url_suggests_the_public_fullnode() {
        let err = DropsConfig::from_vars(without("SUI_RPC_URL")).unwrap_err();
        assert!(err.mentions("SUI_RPC_URL"));
        assert!(err.to_string().contains("https://fullnode.testnet.sui.io:443"));
    }

    #[test]
    fn every_offending_key_is_reported() {
        let mut vars = without("USER_PRIVATE_KEY");
        vars.retain(|(k, _)| k != "SUI_RPC_URL" && k != "COLLECTIONS_REGISTRY_ID");
        vars.push(("SUI_RPC_URL".to_string(), "fullnode:9000".to_string()));
        vars.push(("COLLECTIONS_REGISTRY_ID".to_string(), "registry".to_string()));

        let err = DropsConfig::from_vars(vars).unwrap_err();
        let keys: Vec<_> = err.keys().collect();

        assert_eq!(
            keys,
            vec!["SUI_RPC_URL", "COLLECTIONS_REGISTRY_ID", "USER_PRIVATE_KEY"]
        );
    }

    #[test]
    fn empty_source_reports_all_required_keys() {
        let err = DropsConfig::from_vars(Vec::<(String, String)>::new()).unwrap_err();
        assert_eq!(err.issues.len(), 9);
    }

    #[test]
    fn rejects_unknown_network() {
        let err = DropsConfig::from_vars(with("SUI_NETWORK", "moonnet")).unwrap_err();
        assert!(err.mentions("SUI_NETWORK"));
    }

    #[test]
    fn rejects_invalid_module_identifier() {
        let err = DropsConfig::from_vars(with("COLLECTION_MODULE_NAME", "9lives")).unwrap_err();
        assert!(err.mentions("COLLECTION_MODULE_NAME"));

        let err = DropsConfig::from_vars(with("DROP_MODULE_NAME", "drop-module")).unwrap_err();
        assert!(err.mentions("DROP_MODULE_NAME"));
    }

    #[test]
    fn rejects_zero_and_non_numeric_optionals() {
        let err = DropsConfig::from_vars(with("SUI_GAS_BUDGET", "0")).unwrap_err();
        assert!(err.mentions("SUI_GAS_BUDGET"));

        let err = DropsConfig::from_vars(with("DROPS_FINALITY_TIMEOUT_MS", "soon")).unwrap_err();
        assert!(err.mentions("DROPS_FINALITY_TIMEOUT_MS"));
    }

    #[test]
    fn optional_overrides_are_applied() {
        let config = DropsConfig::from_vars(with("DROPS_FINALITY_TIMEOUT_MS", "750")).unwrap();
        assert_eq!(config.finality_timeout, Duration::from_millis(750));
    }

    #[test]
    fn revalidation_is_idempotent() {
        let first = DropsConfig::from_vars(sample_vars()).unwrap();
        let second = DropsConfig::from_vars(sample_vars()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let config = DropsConfig::from_vars(sample_vars()).unwrap();
        let rendered = format!("{:?}", config);

        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(config.user_private_key().expose()));
    }

    #[test]
    fn move_identifier_rules() {
        assert!(is_move_identifier("collection"));
        assert!(is_move_identifier("_drop2"));
        assert!(!is_move_identifier("_"));
        assert!(!is_move_identifier("2drop"));
        assert!(!is_move_identifier("drop::x"));
    }
}
