//! Chain-agnostic core of the drops SDK.
//!
//! Turns typed application parameters into a single Move call, executes it
//! under a finality deadline, and recovers the identities of the objects the
//! chain created.
//!
//! # Architecture
//!
//! ```text
//! DropsConfig ──► builders ──► TransactionRequest
//!                                   │
//!                 ExecutionGateway ◄┘ (ChainTransport + SigningIdentity)
//!                        │
//!                ExecutionResponse ──► resolve_created ──► Vec<ObjectId>
//!
//! registry::fetch_* ◄── ObjectReader
//! ```
//!
//! The Sui implementation of the transport traits lives in `drops-sdk-sui`.
//!
//! # Usage
//!
//! ```ignore
//! use drops_sdk_core::{CreateCollectionParams, DropsConfig, ExecutionGateway, TypeFilter, create_collection};
//!
//! let config = DropsConfig::init_from_env()?;
//! let gateway = ExecutionGateway::from_config(transport, config);
//!
//! let request = create_collection(config, &CreateCollectionParams::new("Harbor", "Tide pools"))?;
//! let response = gateway.execute(&request, &signer).await?;
//! let ids = response.created_ids(Some(&TypeFilter::new(config.collection_type())));
//! ```

pub mod builders;
pub mod config;
pub mod error;
pub mod gateway;
pub mod object_change;
pub mod registry;
pub mod response;
pub mod traits;
pub mod transaction;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use builders::{CreateCollectionParams, MintDropParams, create_collection, mint_drop};
pub use config::{DropsConfig, SecretKey, SuiNetwork};
pub use error::{
    ConfigurationError, DropsError, ExecutionError, FieldIssue, InvalidKeyError, RegistryError,
    Result, TimeoutError, TransportError, ValidationError,
};
pub use gateway::ExecutionGateway;
pub use object_change::{
    ChangeKind, ObjectChange, ObjectRecord, TypeFilter, parse_object_changes, resolve_created,
};
pub use registry::{CollectionsRegistry, fetch_collection, fetch_collections_registry, fetch_drop};
pub use response::{ExecutionResponse, ExecutionStatus, GasSummary, TransactionEffects};
pub use traits::{ChainTransport, ObjectReader, ObjectSnapshot, SigningIdentity};
pub use transaction::{CallArg, MoveTarget, PureArg, TransactionRequest};
pub use types::{Address, Attributes, Collection, Drop, ObjectId, TxDigest};

#[cfg(any(test, feature = "mock"))]
pub use mock::{Finality, MockSigner, MockTransport};
