//! Backend seams.
//!
//! - [`SigningIdentity`]: who signs submissions
//! - [`ChainTransport`]: sign and submit a built request, look up its outcome
//! - [`ObjectReader`]: read on-chain objects for registry lookups
//!
//! The execution gateway and registry readers are written against these
//! traits only; `drops-sdk-sui` provides the network implementation and
//! [`MockTransport`](crate::mock::MockTransport) an in-memory one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::response::ExecutionResponse;
use crate::transaction::TransactionRequest;
use crate::types::{ObjectId, TxDigest};

/// Key material able to authorize transactions.
///
/// Implementations must never expose the secret through this trait or `Debug`.
pub trait SigningIdentity {
    /// Account address derived from the public key.
    fn address(&self) -> String;
}

/// Pure chain plumbing, no drops knowledge.
///
/// Signing and sending are separate steps so the digest of a transaction is
/// known before it can reach the chain.
#[async_trait]
pub trait ChainTransport: Send + Sync {
    type Signer: SigningIdentity + Send + Sync;

    /// A transaction signed and ready to send.
    type Signed: Send + Sync;

    /// Build and sign `request`. Nothing is sent.
    async fn sign(
        &self,
        request: &TransactionRequest,
        signer: &Self::Signer,
    ) -> Result<Self::Signed, TransportError>;

    /// Digest the chain will report for `signed`.
    fn digest(&self, signed: &Self::Signed) -> TxDigest;

    /// Hand `signed` to the node, asking for effects and object changes.
    /// Returns once the node has acknowledged the submission.
    async fn submit(&self, signed: &Self::Signed) -> Result<(), TransportError>;

    /// Outcome of a submitted transaction, `None` while not yet final.
    async fn fetch_result(
        &self,
        digest: &TxDigest,
    ) -> Result<Option<ExecutionResponse>, TransportError>;
}

/// Decoded view of one on-chain Move object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSnapshot {
    pub object_id: ObjectId,
    pub object_type: String,
    /// Move struct fields as JSON.
    pub fields: serde_json::Value,
}

#[async_trait]
pub trait ObjectReader: Send + Sync {
    /// Fails with [`TransportError::ObjectNotFound`] for unknown IDs.
    async fn read_object(&self, object_id: &ObjectId) -> Result<ObjectSnapshot, TransportError>;
}
