//! Command implementations.
//!
//! Each command is a separate module that implements its own CLI args and
//! execution logic. Shared wiring (configuration, signer, transport) and
//! outcome reporting live here.

mod collection;
mod config;
mod drop;

pub use collection::{CreateCollection, ShowCollection, ShowCollections};
pub use config::{Address, CheckConfig};
pub use drop::{MintDrop, ShowDrop};

use anyhow::{Context, Result, anyhow};
use drops_sdk_core::{
    DropsConfig, ExecutionError, ExecutionGateway, ExecutionResponse, ObjectId, TimeoutError,
    TransactionRequest, TypeFilter,
};
use drops_sdk_sui::{SuiSigner, SuiTransport, get_signer};

/// Everything a network command needs.
pub(crate) struct Session {
    pub config: &'static DropsConfig,
    pub signer: SuiSigner,
    pub gateway: ExecutionGateway<SuiTransport>,
}

impl Session {
    pub async fn open() -> Result<Self> {
        let config = load_config()?;
        let signer = get_signer(config.user_private_key()).context("USER_PRIVATE_KEY")?;
        let transport = SuiTransport::connect(config)
            .await
            .context("Failed to connect to Sui fullnode")?;

        Ok(Self {
            config,
            signer,
            gateway: ExecutionGateway::from_config(transport, config),
        })
    }

    /// Execute `request` and return the created IDs matching `filter`.
    ///
    /// Rejections and timeouts become errors with distinct messages.
    pub async fn run(
        &self,
        request: &TransactionRequest,
        filter: &TypeFilter,
    ) -> Result<Vec<ObjectId>> {
        let response = self.gateway.execute(request, &self.signer).await;
        settle(response, filter)
    }
}

pub(crate) fn load_config() -> Result<&'static DropsConfig> {
    DropsConfig::init_from_env().context("Configuration is incomplete; check your .env")
}

fn settle(
    result: Result<ExecutionResponse, ExecutionError>,
    filter: &TypeFilter,
) -> Result<Vec<ObjectId>> {
    let response = match result {
        Ok(response) => response,
        Err(ExecutionError::Timeout(timeout)) => return Err(anyhow!(describe_timeout(&timeout))),
        Err(ExecutionError::Transport(e)) => {
            return Err(e).context("Transaction could not be submitted");
        }
    };

    println!("Transaction: {}", response.digest);
    if let Some(effects) = &response.effects {
        println!("Gas (net):   {} MIST", effects.gas_used.net());
    }

    if let Some(error) = response.rejection() {
        return Err(anyhow!("rejected by the chain: {}", error));
    }

    Ok(response.created_ids(Some(filter)))
}

fn describe_timeout(timeout: &TimeoutError) -> String {
    let digest = timeout
        .digest
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none (nothing was sent)".to_string());
    format!(
        "outcome unknown: timed out after {}ms; digest {}",
        timeout.waited.as_millis(),
        digest
    )
}

/// `KEY=v1,v2` → `(KEY, [v1, v2])`. `KEY=` means no values.
pub(crate) fn parse_attribute(raw: &str) -> Result<(String, Vec<String>), String> {
    let (key, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("'{}' must look like KEY=v1,v2", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("'{}' has an empty key", raw));
    }

    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    Ok((key.to_string(), values))
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
