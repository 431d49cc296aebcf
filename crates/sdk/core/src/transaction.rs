//! Chain-agnostic description of a single Move call.
//!
//! A [`TransactionRequest`] is built by exactly one builder, handed to the
//! execution gateway once, and never persisted. Backends translate it into
//! their native transaction format.

use std::fmt;

use serde::Serialize;

use crate::types::{Address, ObjectId};

/// `<package>::<module>::<function>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTarget {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
}

impl MoveTarget {
    pub fn new(package: ObjectId, module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            package,
            module: module.into(),
            function: function.into(),
        }
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

/// A pure (non-object) argument with its Move wire type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PureArg {
    String(String),
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Address(Address),
}

impl PureArg {
    /// Move type name of the argument.
    pub fn wire_type(&self) -> &'static str {
        match self {
            PureArg::String(_) => "0x1::string::String",
            PureArg::Bool(_) => "bool",
            PureArg::U8(_) => "u8",
            PureArg::U16(_) => "u16",
            PureArg::U32(_) => "u32",
            PureArg::U64(_) => "u64",
            PureArg::Address(_) => "address",
        }
    }

    /// BCS encoding as the Move VM expects it.
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>, bcs::Error> {
        match self {
            PureArg::String(value) => bcs::to_bytes(value),
            PureArg::Bool(value) => bcs::to_bytes(value),
            PureArg::U8(value) => bcs::to_bytes(value),
            PureArg::U16(value) => bcs::to_bytes(value),
            PureArg::U32(value) => bcs::to_bytes(value),
            PureArg::U64(value) => bcs::to_bytes(value),
            PureArg::Address(address) => {
                let bytes = address.to_bytes().map_err(bcs::Error::Custom)?;
                bcs::to_bytes(&FixedAddress(bytes))
            }
        }
    }
}

/// Addresses are a fixed 32-byte sequence on the wire, without a length prefix.
#[derive(Serialize)]
struct FixedAddress([u8; 32]);

/// One argument of a Move call, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// On-chain object input; the backend decides shared vs. owned.
    Object(ObjectId),
    Pure(PureArg),
}

impl CallArg {
    pub fn as_object(&self) -> Option<&ObjectId> {
        match self {
            CallArg::Object(id) => Some(id),
            CallArg::Pure(_) => None,
        }
    }

    pub fn as_pure(&self) -> Option<&PureArg> {
        match self {
            CallArg::Pure(arg) => Some(arg),
            CallArg::Object(_) => None,
        }
    }
}

impl From<PureArg> for CallArg {
    fn from(arg: PureArg) -> Self {
        CallArg::Pure(arg)
    }
}

/// Unsubmitted single-call transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub target: MoveTarget,
    pub arguments: Vec<CallArg>,
    pub type_arguments: Vec<String>,
}

impl TransactionRequest {
    pub fn new(target: MoveTarget) -> Self {
        Self {
            target,
            arguments: Vec::new(),
            type_arguments: Vec::new(),
        }
    }

    pub fn object(mut self, id: ObjectId) -> Self {
        self.arguments.push(CallArg::Object(id));
        self
    }

    pub fn pure(mut self, arg: PureArg) -> Self {
        self.arguments.push(CallArg::Pure(arg));
        self
    }

    pub fn type_argument(mut self, type_tag: impl Into<String>) -> Self {
        self.type_arguments.push(type_tag.into());
        self
    }

    /// Wire types of every argument, `object` for object inputs.
    pub fn signature(&self) -> Vec<&'static str> {
        self.arguments
            .iter()
            .map(|arg| match arg {
                CallArg::Object(_) => "object",
                CallArg::Pure(pure) => pure.wire_type(),
            })
            .collect()
    }
}
