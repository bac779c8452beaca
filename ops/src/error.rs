//! Orchestration error taxonomy.

use std::time::Duration;
use thiserror::Error;

use ballot_abi::AbiError;
use ballot_rpc::{LedgerError, TxTarget};
use ballot_types::{InputError, TxHash};

/// Process exit code for an operator cancellation.
pub const EXIT_CANCELLED: u8 = 3;
/// Process exit code when the outcome of a submitted transaction is unknown.
pub const EXIT_INDETERMINATE: u8 = 4;
/// Process exit code for every other failure.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("{call} rejected before inclusion: {reason}")]
    SubmissionRejected { call: String, reason: String },

    #[error("transaction {hash} ({target}) reverted in block {block}: {reason}")]
    Reverted {
        hash: TxHash,
        target: TxTarget,
        block: u64,
        reason: String,
    },

    #[error("stopped waiting for {hash} after {waited:?}; it may still be included later")]
    TimedOut {
        hash: TxHash,
        waited: Duration,
        last_error: Option<String>,
    },

    #[error("deployment {hash} confirmed in block {block} without a contract address")]
    DeploymentAddressMissing { hash: TxHash, block: u64 },

    #[error("operation cancelled by operator")]
    OperatorCancelled,

    #[error("contract interface mismatch: {0}")]
    Interface(#[from] AbiError),

    #[error("operator prompt failed: {0}")]
    Prompt(#[from] std::io::Error),

    #[error("illegal flow transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },
}

impl FlowError {
    /// Map a failed read (context or verification) onto the taxonomy.
    pub fn from_read(err: LedgerError) -> Self {
        match err {
            LedgerError::Interface(e) => Self::Interface(e),
            other => Self::LedgerUnavailable(other.to_string()),
        }
    }

    /// Map a failed submission of `call` (see `WriteRequest::invocation`)
    /// onto the taxonomy.
    pub fn from_submit(err: LedgerError, call: &str) -> Self {
        match err {
            LedgerError::Interface(e) => Self::Interface(e),
            LedgerError::Unavailable(_) | LedgerError::InvalidResponse(_) => {
                Self::LedgerUnavailable(format!("{err} while submitting {call}"))
            }
            LedgerError::Rejected(reason) | LedgerError::Reverted(reason) => {
                Self::SubmissionRejected {
                    call: call.to_string(),
                    reason,
                }
            }
            other => Self::SubmissionRejected {
                call: call.to_string(),
                reason: other.to_string(),
            },
        }
    }

    /// Cancellation is a normal outcome, not a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::OperatorCancelled)
    }

    /// Transaction hash involved, when one exists.
    pub fn transaction(&self) -> Option<TxHash> {
        match self {
            Self::Reverted { hash, .. }
            | Self::TimedOut { hash, .. }
            | Self::DeploymentAddressMissing { hash, .. } => Some(*hash),
            _ => None,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::OperatorCancelled => EXIT_CANCELLED,
            Self::TimedOut { .. } => EXIT_INDETERMINATE,
            _ => EXIT_FAILURE,
        }
    }
}
