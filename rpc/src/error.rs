//! Ledger boundary error types.

use ballot_abi::AbiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger unreachable: {0}")]
    Unavailable(String),

    #[error("malformed ledger response: {0}")]
    InvalidResponse(String),

    #[error("ledger returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("execution reverted: {0}")]
    Reverted(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("contract interface error: {0}")]
    Interface(#[from] AbiError),

    #[error("signing failed: {0}")]
    Signing(String),
}

impl LedgerError {
    pub fn is_revert(&self) -> bool {
        matches!(self, Self::Reverted(_))
    }
}
