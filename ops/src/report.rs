//! What an orchestrated action did, for the operator.

use std::fmt;

use ballot_rpc::Receipt;
use ballot_types::{Address, NetworkId, TxHash};

use crate::flow::{Action, Stage};
use crate::operator::Preflight;
use crate::verify::ViewCheck;

#[derive(Clone, Debug)]
pub struct RunReport {
    pub action: Action,
    pub network: NetworkId,
    pub preflight: Preflight,
    pub transaction: TxHash,
    pub block: u64,
    pub gas_used: u64,
    pub deployed: Option<Address>,
    /// One-line outcome, e.g. `[Minted] 100 decimal units to account 0x5aa7...d58c`.
    pub headline: String,
    pub checks: Vec<ViewCheck>,
    pub stages: Vec<Stage>,
}

impl RunReport {
    pub fn new(
        action: Action,
        network: NetworkId,
        preflight: Preflight,
        receipt: &Receipt,
        headline: String,
    ) -> Self {
        Self {
            action,
            network,
            preflight,
            transaction: receipt.transaction_hash,
            block: receipt.block_number,
            gas_used: receipt.gas_used,
            deployed: receipt.contract_address,
            headline,
            checks: Vec::new(),
            stages: Vec::new(),
        }
    }

    pub fn with_check(mut self, check: ViewCheck) -> Self {
        self.checks.push(check);
        self
    }

    /// True when every verification read succeeded.
    pub fn fully_verified(&self) -> bool {
        !self.checks.iter().any(ViewCheck::is_failed)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;
        write!(
            f,
            "Transaction {} confirmed in block {} (gas used {})",
            self.transaction, self.block, self.gas_used
        )?;
        if let Some(address) = self.deployed {
            write!(f, "\nContract deployed at {address}")?;
        }
        for check in &self.checks {
            write!(f, "\n{check}")?;
        }
        Ok(())
    }
}
