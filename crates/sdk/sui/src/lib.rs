//! Sui backend for the drops SDK.
//!
//! Implements the `drops-sdk-core` transport traits on top of `sui-sdk`:
//! - [`get_signer`]: decode a Sui secret key into a [`SuiSigner`]
//! - [`SuiTransport`]: programmable transaction construction, signing with
//!   intent, execution, and object reads over JSON-RPC
//!
//! # Usage
//!
//! ```ignore
//! use drops_sdk_core::{DropsConfig, ExecutionGateway};
//! use drops_sdk_sui::{SuiTransport, get_signer};
//!
//! let config = DropsConfig::init_from_env()?;
//! let signer = get_signer(config.user_private_key())?;
//! let gateway = ExecutionGateway::from_config(SuiTransport::connect(config).await?, config);
//! ```

pub mod signer;
pub mod transport;

pub use signer::{SuiSigner, get_signer};
pub use transport::SuiTransport;
