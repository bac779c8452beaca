//! Polling a submitted transaction until the ledger resolves it.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use ballot_rpc::{LedgerClient, PendingTransaction, Receipt, TxTarget};
use ballot_types::TxHash;
use ballot_utils::format_duration;

use crate::error::FlowError;

/// How long to wait for inclusion and how often to ask.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitPolicy {
    pub timeout_secs: u64,
    pub initial_poll_ms: u64,
    pub max_poll_ms: u64,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            initial_poll_ms: 1_000,
            max_poll_ms: 8_000,
        }
    }
}

impl WaitPolicy {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.initial_poll_ms.max(1)),
            Duration::from_millis(self.max_poll_ms.max(self.initial_poll_ms).max(1)),
        )
    }
}

/// Doubling delay, capped at `max`.
#[derive(Clone, Debug)]
pub struct Backoff {
    next: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { next: initial, max }
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(self.max);
        delay
    }
}

/// Result of [`poll_until`].
#[derive(Debug)]
pub enum Polled<T, E> {
    Ready(T),
    Expired {
        elapsed: Duration,
        last_error: Option<E>,
    },
}

/// Call `attempt` until it yields a value or `timeout` elapses.
///
/// `Ok(None)` means "not yet". Errors are treated as transient: they are
/// logged, remembered, and the attempt is retried after the next delay.
pub async fn poll_until<T, E, F, Fut>(timeout: Duration, mut backoff: Backoff, mut attempt: F) -> Polled<T, E>
where
    E: fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let started = Instant::now();
    let deadline = started + timeout;
    let mut last_error = None;
    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        match attempt().await {
            Ok(Some(value)) => return Polled::Ready(value),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(attempt = attempts, error = %e, "poll failed, retrying");
                last_error = Some(e);
            }
        }
        let now = Instant::now();
        if now >= deadline {
            return Polled::Expired {
                elapsed: now - started,
                last_error,
            };
        }
        let delay = backoff.next_delay().min(deadline - now);
        tokio::time::sleep(delay).await;
    }
}

/// How a pending transaction resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionOutcome {
    Confirmed(Receipt),
    Reverted {
        receipt: Receipt,
        target: TxTarget,
        reason: String,
    },
    TimedOut {
        hash: TxHash,
        waited: Duration,
        last_error: Option<String>,
    },
}

impl TransactionOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    /// The successful receipt, or the failure as a [`FlowError`].
    pub fn into_receipt(self) -> Result<Receipt, FlowError> {
        match self {
            Self::Confirmed(receipt) => Ok(receipt),
            Self::Reverted {
                receipt,
                target,
                reason,
            } => Err(FlowError::Reverted {
                hash: receipt.transaction_hash,
                target,
                block: receipt.block_number,
                reason,
            }),
            Self::TimedOut {
                hash,
                waited,
                last_error,
            } => Err(FlowError::TimedOut {
                hash,
                waited,
                last_error,
            }),
        }
    }
}

/// Resolves a [`PendingTransaction`] against the ledger.
pub struct ConfirmationWaiter<'a, L> {
    ledger: &'a L,
    policy: WaitPolicy,
}

impl<'a, L: LedgerClient> ConfirmationWaiter<'a, L> {
    pub fn new(ledger: &'a L, policy: WaitPolicy) -> Self {
        Self { ledger, policy }
    }

    /// Wait for `pending` to be included.
    ///
    /// A deployment whose successful receipt carries no contract address is
    /// an error rather than an outcome: nothing downstream can use it.
    pub async fn wait(&self, pending: PendingTransaction) -> Result<TransactionOutcome, FlowError> {
        let hash = pending.hash;
        let ledger = self.ledger;
        tracing::info!(%hash, nonce = pending.nonce, "waiting for confirmation");

        let polled = poll_until(self.policy.timeout(), self.policy.backoff(), || {
            ledger.transaction_receipt(&hash)
        })
        .await;

        let receipt = match polled {
            Polled::Ready(receipt) => receipt,
            Polled::Expired {
                elapsed,
                last_error,
            } => {
                tracing::warn!(%hash, waited = ?elapsed, "no receipt before deadline");
                return Ok(TransactionOutcome::TimedOut {
                    hash,
                    waited: elapsed,
                    last_error: last_error.map(|e| e.to_string()),
                });
            }
        };

        if !receipt.succeeded() {
            tracing::warn!(%hash, block = receipt.block_number, "transaction reverted");
            let reason = format!(
                "execution failed in block {} after {} gas",
                receipt.block_number, receipt.gas_used
            );
            return Ok(TransactionOutcome::Reverted {
                receipt,
                target: pending.target,
                reason,
            });
        }

        if pending.target.is_deployment() && receipt.contract_address.is_none() {
            return Err(FlowError::DeploymentAddressMissing {
                hash,
                block: receipt.block_number,
            });
        }

        tracing::info!(
            %hash,
            block = receipt.block_number,
            gas_used = receipt.gas_used,
            after = %format_duration(pending.submitted_at.age()),
            "transaction confirmed"
        );
        Ok(TransactionOutcome::Confirmed(receipt))
    }
}
