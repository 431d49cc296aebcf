//! `check-config` and `address`.

use anyhow::{Context, Result};
use clap::Parser;
use drops_sdk_core::SigningIdentity;
use drops_sdk_sui::get_signer;

use super::load_config;

/// Validate configuration and signing key
#[derive(Parser)]
pub struct CheckConfig;

impl CheckConfig {
    pub fn execute(self) -> Result<()> {
        let config = load_config()?;
        let signer = get_signer(config.user_private_key()).context("USER_PRIVATE_KEY")?;

        println!("Network:              {}", config.network);
        println!("RPC URL:              {}", config.rpc_url);
        println!(
            "Package:              {} ({})",
            config.package_id, config.package_name
        );
        println!("Collection module:    {}", config.collection_module);
        println!("Drop module:          {}", config.drop_module);
        println!("Collections registry: {}", config.collections_registry_id);
        println!("Drops registry:       {}", config.address_drops_registry_id);
        println!("Gas budget:           {} MIST", config.gas_budget);
        println!(
            "Finality timeout:     {}ms (poll every {}ms)",
            config.finality_timeout.as_millis(),
            config.poll_interval.as_millis()
        );
        println!("Signer:               {}", signer.address());
        println!();
        println!("Configuration OK");

        Ok(())
    }
}

/// Print the signer's address
#[derive(Parser)]
pub struct Address;

impl Address {
    pub fn execute(self) -> Result<()> {
        let config = load_config()?;
        let signer = get_signer(config.user_private_key()).context("USER_PRIVATE_KEY")?;
        println!("{}", signer.address());
        Ok(())
    }
}
