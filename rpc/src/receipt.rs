//! Submitted transactions and their receipts.

use std::fmt;

use serde::Deserialize;

use ballot_types::{Address, Timestamp, TxHash};

use crate::error::LedgerError;
use crate::hexnum;

/// What a submitted transaction targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxTarget {
    /// Contract creation; a successful receipt must name the new address.
    Deployment { contract: String },
    /// Function call on an existing contract.
    Call { to: Address, function: String },
}

impl TxTarget {
    pub fn is_deployment(&self) -> bool {
        matches!(self, Self::Deployment { .. })
    }
}

impl fmt::Display for TxTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deployment { contract } => write!(f, "deployment of {contract}"),
            Self::Call { to, function } => write!(f, "{function} on {to}"),
        }
    }
}

/// A transaction accepted into the pending pool but not yet final.
///
/// Deliberately not `Clone`: it is resolved exactly once by the waiter.
#[derive(Debug)]
pub struct PendingTransaction {
    pub hash: TxHash,
    pub submitted_at: Timestamp,
    pub target: TxTarget,
    pub from: Address,
    pub nonce: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Failure,
}

/// The ledger's record of an included transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub contract_address: Option<Address>,
    pub status: TxStatus,
    pub gas_used: u64,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Success
    }
}

/// `eth_getTransactionReceipt` result as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireReceipt {
    transaction_hash: TxHash,
    block_number: String,
    #[serde(default)]
    contract_address: Option<Address>,
    status: String,
    #[serde(default)]
    gas_used: Option<String>,
}

impl TryFrom<WireReceipt> for Receipt {
    type Error = LedgerError;

    fn try_from(raw: WireReceipt) -> Result<Self, Self::Error> {
        let status = match hexnum::parse_u64(&raw.status)? {
            1 => TxStatus::Success,
            0 => TxStatus::Failure,
            other => {
                return Err(LedgerError::InvalidResponse(format!(
                    "unknown receipt status {other}"
                )))
            }
        };
        Ok(Self {
            transaction_hash: raw.transaction_hash,
            block_number: hexnum::parse_u64(&raw.block_number)?,
            contract_address: raw.contract_address,
            status,
            gas_used: raw.gas_used.as_deref().map(hexnum::parse_u64).transpose()?.unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Receipt, LedgerError> {
        let wire: WireReceipt = serde_json::from_str(json).unwrap();
        Receipt::try_from(wire)
    }

    #[test]
    fn deployment_receipt() {
        let r = parse(
            r#"{"transactionHash":"0xa9bc3c02ec6efd65d7268c7ed78d2bc5d3673ee430bbd33c371c48e73ad8e615",
                "blockNumber":"0x5b8d80","contractAddress":"0x2f21fdeccb32a0b580e7fbb9517a2a63d3af690f",
                "status":"0x1","gasUsed":"0x1e8480","logs":[]}"#,
        )
        .unwrap();
        assert!(r.succeeded());
        assert_eq!(r.block_number, 6_000_000);
        assert_eq!(r.gas_used, 2_000_000);
        assert_eq!(
            r.contract_address.unwrap().to_string(),
            "0x2f21fdeccb32a0b580e7fbb9517a2a63d3af690f"
        );
    }

    #[test]
    fn failed_call_receipt() {
        let r = parse(
            r#"{"transactionHash":"0xa9bc3c02ec6efd65d7268c7ed78d2bc5d3673ee430bbd33c371c48e73ad8e615",
                "blockNumber":"0x10","contractAddress":null,"status":"0x0"}"#,
        )
        .unwrap();
        assert_eq!(r.status, TxStatus::Failure);
        assert!(r.contract_address.is_none());
    }

    #[test]
    fn unknown_status_is_malformed() {
        let err = parse(
            r#"{"transactionHash":"0xa9bc3c02ec6efd65d7268c7ed78d2bc5d3673ee430bbd33c371c48e73ad8e615",
                "blockNumber":"0x10","status":"0x2"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidResponse(_)));
    }
}
