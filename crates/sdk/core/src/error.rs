//! Error taxonomy for the drops SDK.
//!
//! Each stage of the build → sign → submit → wait → resolve flow has its own
//! error type so callers can react precisely:
//!
//! | Error | Raised by | Caller policy |
//! |---|---|---|
//! | [`ConfigurationError`] | configuration resolver | fatal at startup |
//! | [`InvalidKeyError`] | signer provider | fatal for that operation |
//! | [`ValidationError`] | transaction builders | fix input, nothing was sent |
//! | [`TransportError`] | execution gateway | retry is the caller's decision |
//! | [`TimeoutError`] | execution gateway | outcome unknown, query later |
//!
//! A chain-side rejection is *not* an error: it comes back as an
//! [`ExecutionResponse`](crate::ExecutionResponse) whose status is a failure.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::types::{ObjectId, TxDigest};

pub type Result<T> = std::result::Result<T, DropsError>;

/// Umbrella error for callers that drive the whole pipeline.
#[derive(Debug, Error)]
pub enum DropsError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    InvalidKey(#[from] InvalidKeyError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<ExecutionError> for DropsError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::Transport(e) => DropsError::Transport(e),
            ExecutionError::Timeout(e) => DropsError::Timeout(e),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// One offending configuration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub key: &'static str,
    pub problem: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.problem)
    }
}

/// Every missing or malformed configuration key, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration ({} problem(s)): {}", .issues.len(), join_issues(.issues))]
pub struct ConfigurationError {
    pub issues: Vec<FieldIssue>,
}

impl ConfigurationError {
    /// Keys that failed validation.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.issues.iter().map(|issue| issue.key)
    }

    pub fn mentions(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// Signer
// ============================================================================

/// The secret is not a well-formed key for the chain's signature schemes.
///
/// The offending secret is never included in the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid signing key: {reason}")]
pub struct InvalidKeyError {
    pub reason: String,
}

impl InvalidKeyError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Builder input that cannot be expressed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {call} parameters: {}", .violations.join("; "))]
pub struct ValidationError {
    /// Builder that rejected the input (e.g. `create_collection`).
    pub call: &'static str,
    pub violations: Vec<String>,
}

impl ValidationError {
    pub fn has_violation_for(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.starts_with(field))
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Failures talking to the chain node. The request may or may not have been
/// received; the gateway never retries on its own.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("failed to prepare transaction: {0}")]
    Preparation(String),

    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("unexpected response from node: {0}")]
    InvalidResponse(String),
}

/// The finality deadline passed before the chain reported an outcome.
///
/// The transaction may still land; this is an unresolved state, not a
/// failed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", timeout_message(.digest.as_ref(), .waited))]
pub struct TimeoutError {
    /// Known once the transaction was signed; `None` means nothing was sent.
    pub digest: Option<TxDigest>,
    pub waited: Duration,
}

fn timeout_message(digest: Option<&TxDigest>, waited: &Duration) -> String {
    match digest {
        Some(digest) => format!(
            "no finality for transaction {} after {}ms; outcome unknown",
            digest,
            waited.as_millis()
        ),
        None => format!(
            "transaction not signed after {}ms; nothing was sent",
            waited.as_millis()
        ),
    }
}

/// Everything [`ExecutionGateway::execute`](crate::ExecutionGateway::execute)
/// can fail with.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),
}

impl ExecutionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutionError::Timeout(_))
    }
}

// ============================================================================
// Registry reads
// ============================================================================

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("object {object_id} has unexpected type {found}, expected {expected}")]
    UnexpectedType {
        object_id: ObjectId,
        expected: String,
        found: String,
    },

    #[error("missing or invalid '{field}' field on {object_id}")]
    InvalidField { object_id: ObjectId, field: String },
}
