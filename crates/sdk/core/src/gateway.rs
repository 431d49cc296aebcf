//! Execution gateway: submit once, wait for finality under one deadline.
//!
//! ```text
//! execute(request, signer)
//!   ├── sign ───────────────► TxDigest          (TimeoutError { digest: None }: nothing was sent)
//!   ├── submit ─────────────► acknowledged      (TimeoutError { digest: Some } if the node never acks)
//!   └── fetch_result loop ──► ExecutionResponse (TimeoutError { digest: Some } past the deadline)
//! ```
//!
//! The deadline covers all phases. The gateway never resubmits: a failed
//! sign or submit is returned as-is and the caller decides what to do with
//! it. Once the node has acknowledged a transaction, a failed read does not
//! end the wait; the gateway keeps polling until the deadline, so an
//! accepted transaction always surfaces as a response or as a timeout that
//! names its digest.
//!
//! One gateway serves one signer, so executions through it are serialized: a
//! call is not submitted while the previous one is still waiting for
//! finality. Independent gateways run concurrently.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until, timeout_at};

use crate::config::DropsConfig;
use crate::error::{ExecutionError, TimeoutError};
use crate::response::ExecutionResponse;
use crate::traits::{ChainTransport, SigningIdentity};
use crate::transaction::TransactionRequest;
use crate::types::TxDigest;

pub struct ExecutionGateway<T> {
    transport: T,
    finality_timeout: Duration,
    poll_interval: Duration,
    in_flight: Mutex<()>,
}

impl<T: ChainTransport> ExecutionGateway<T> {
    pub fn new(transport: T, finality_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            transport,
            finality_timeout,
            poll_interval,
            in_flight: Mutex::new(()),
        }
    }

    /// Use the timeouts declared in `config`.
    pub fn from_config(transport: T, config: &DropsConfig) -> Self {
        Self::new(transport, config.finality_timeout, config.poll_interval)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn finality_timeout(&self) -> Duration {
        self.finality_timeout
    }

    /// Sign, submit, and wait until the chain reports an outcome.
    ///
    /// A rejected transaction is a successful call: inspect
    /// [`ExecutionResponse::rejection`].
    pub async fn execute(
        &self,
        request: &TransactionRequest,
        signer: &T::Signer,
    ) -> Result<ExecutionResponse, ExecutionError> {
        let _turn = self.in_flight.lock().await;

        let started = Instant::now();
        let deadline = started + self.finality_timeout;

        tracing::info!(
            "Submitting {} ({} args) from {}",
            request.target,
            request.arguments.len(),
            signer.address()
        );

        let signed = match timeout_at(deadline, self.transport.sign(request, signer)).await {
            Ok(result) => result?,
            Err(_) => return Err(self.timed_out(None, started)),
        };
        let digest = self.transport.digest(&signed);

        match timeout_at(deadline, self.transport.submit(&signed)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!("Submitting {} failed: {}", digest, e);
                return Err(e.into());
            }
            Err(_) => return Err(self.timed_out(Some(digest), started)),
        }

        tracing::debug!("Transaction {} accepted, waiting for finality", digest);

        loop {
            match timeout_at(deadline, self.transport.fetch_result(&digest)).await {
                Ok(Ok(Some(response))) => {
                    log_outcome(&response, started.elapsed());
                    return Ok(response);
                }
                Ok(Ok(None)) => tracing::debug!("Transaction {} not final yet", digest),
                Ok(Err(e)) => tracing::warn!("Reading outcome of {} failed: {}", digest, e),
                Err(_) => return Err(self.timed_out(Some(digest), started)),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(self.timed_out(Some(digest), started));
            }

            sleep_until((now + self.poll_interval).min(deadline)).await;
        }
    }

    fn timed_out(&self, digest: Option<TxDigest>, started: Instant) -> ExecutionError {
        let err = TimeoutError {
            digest,
            waited: started.elapsed(),
        };
        tracing::warn!("{}", err);
        err.into()
    }
}

fn log_outcome(response: &ExecutionResponse, elapsed: Duration) {
    match response.rejection() {
        Some(error) => tracing::warn!(
            "Transaction {} rejected by the chain: {}",
            response.digest,
            error
        ),
        None => tracing::info!(
            "Transaction {} final in {}ms ({} object changes)",
            response.digest,
            elapsed.as_millis(),
            response.object_changes.len()
        ),
    }
}
