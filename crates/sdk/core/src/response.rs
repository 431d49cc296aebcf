//! Execution response returned by the gateway.

use serde::{Deserialize, Serialize};

use crate::object_change::{self, ObjectChange, TypeFilter, resolve_created};
use crate::types::{ObjectId, TxDigest};

/// Terminal execution status reported in the transaction effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

/// Gas charged for the transaction, in MIST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasSummary {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
}

impl GasSummary {
    /// Net cost; rebates can exceed charges.
    pub fn net(&self) -> i128 {
        i128::from(self.computation_cost) + i128::from(self.storage_cost)
            - i128::from(self.storage_rebate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
    #[serde(default)]
    pub gas_used: GasSummary,
}

/// Outcome of one submission, read-only once produced.
///
/// A chain-side rejection is a normal response with a failure status; see
/// [`ExecutionResponse::rejection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResponse {
    pub digest: TxDigest,

    #[serde(default)]
    pub effects: Option<TransactionEffects>,

    #[serde(default, deserialize_with = "object_change::deserialize_lenient")]
    pub object_changes: Vec<ObjectChange>,
}

impl ExecutionResponse {
    pub fn status(&self) -> Option<&ExecutionStatus> {
        self.effects.as_ref().map(|effects| &effects.status)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status(), Some(ExecutionStatus::Success))
    }

    /// Error text when the chain rejected the transaction.
    pub fn rejection(&self) -> Option<&str> {
        match self.status() {
            Some(ExecutionStatus::Failure { error }) => Some(error),
            Some(ExecutionStatus::Success) | None => None,
        }
    }

    /// Created object IDs, optionally restricted to a declared type.
    pub fn created_ids(&self, filter: Option<&TypeFilter>) -> Vec<ObjectId> {
        resolve_created(&self.object_changes, filter)
    }
}
