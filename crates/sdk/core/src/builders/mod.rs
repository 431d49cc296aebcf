//! Transaction builders.
//!
//! Each builder maps typed parameters onto exactly one Move call and returns
//! an unsubmitted [`TransactionRequest`](crate::TransactionRequest). Input is
//! validated against the wire widths of the target function before anything
//! is constructed; submission is left to the execution gateway.
//!
//! Optional coordinates default to `0` when omitted.

pub mod collection;
pub mod drop;

pub use collection::{CreateCollectionParams, create_collection};
pub use drop::{MintDropParams, mint_drop};

use crate::error::ValidationError;

/// Accumulates violations for one builder call.
pub(crate) struct Checks {
    call: &'static str,
    violations: Vec<String>,
}

impl Checks {
    pub(crate) fn new(call: &'static str) -> Self {
        Self {
            call,
            violations: Vec::new(),
        }
    }

    pub(crate) fn require(&mut self, ok: bool, violation: impl FnOnce() -> String) {
        if !ok {
            self.violations.push(violation());
        }
    }

    /// Narrow `value` to the wire type `T`, recording a violation on overflow.
    pub(crate) fn fits<T>(&mut self, field: &str, value: u64) -> T
    where
        T: TryFrom<u64> + Default,
    {
        T::try_from(value).unwrap_or_else(|_| {
            self.violations.push(format!(
                "{} = {} does not fit in {} bits",
                field,
                value,
                std::mem::size_of::<T>() * 8
            ));
            T::default()
        })
    }

    /// Keep a parsed value, or record the parse problem and use `placeholder`.
    ///
    /// Placeholders never escape: `finish` fails whenever one was produced.
    pub(crate) fn parsed<T>(
        &mut self,
        field: &str,
        result: Result<T, String>,
        placeholder: impl FnOnce() -> T,
    ) -> T {
        result.unwrap_or_else(|problem| {
            self.violations.push(format!("{} is malformed: {}", field, problem));
            placeholder()
        })
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                call: self.call,
                violations: self.violations,
            })
        }
    }
}
