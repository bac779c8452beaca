//! How the next submitted transaction resolves.

use ballot_rpc::TxStatus;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptScript {
    pub status: TxStatus,
    /// Receipt lookups that answer "still pending" before the receipt appears.
    pub pending_polls: u32,
    /// Receipt lookups that fail outright before any other answer.
    pub lookup_errors: u32,
    /// Deployments normally get an address; this leaves it out.
    pub omit_contract_address: bool,
    pub gas_used: u64,
}

impl ReceiptScript {
    pub fn success() -> Self {
        Self {
            status: TxStatus::Success,
            pending_polls: 0,
            lookup_errors: 0,
            omit_contract_address: false,
            gas_used: 51_000,
        }
    }

    pub fn reverted() -> Self {
        Self {
            status: TxStatus::Failure,
            ..Self::success()
        }
    }

    /// Never included, however long the caller waits.
    pub fn never_mined() -> Self {
        Self {
            pending_polls: u32::MAX,
            ..Self::success()
        }
    }

    pub fn after_polls(mut self, polls: u32) -> Self {
        self.pending_polls = polls;
        self
    }

    pub fn with_lookup_errors(mut self, errors: u32) -> Self {
        self.lookup_errors = errors;
        self
    }

    pub fn without_contract_address(mut self) -> Self {
        self.omit_contract_address = true;
        self
    }
}

impl Default for ReceiptScript {
    fn default() -> Self {
        Self::success()
    }
}
