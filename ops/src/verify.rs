//! Read-only checks run after a write is confirmed.
//!
//! Verification never changes ledger state, so running it twice against
//! the same height yields the same views. A failed read is reported next to
//! the confirmed write; it does not undo or invalidate it.

use std::fmt;

use ballot_abi::{AbiValue, ContractInterface};
use ballot_rpc::{ContractCall, LedgerClient, LedgerError};
use ballot_types::{Address, ProposalName, U256};

/// Upper bound on proposals probed when the count is unknown.
pub const MAX_PROPOSALS: u64 = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposalView {
    pub index: u64,
    pub name: String,
    pub vote_count: U256,
}

impl fmt::Display for ProposalView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Proposal {}: {} ({} votes)", self.index, self.name, self.vote_count)
    }
}

/// Contract state read back after a write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractView {
    Proposals(Vec<ProposalView>),
    VotingPower { account: Address, votes: U256 },
    TokenBalance { account: Address, balance: U256 },
}

impl fmt::Display for ContractView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proposals(list) if list.is_empty() => f.write_str("No proposals found"),
            Self::Proposals(list) => {
                for (i, p) in list.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{p}")?;
                }
                Ok(())
            }
            Self::VotingPower { account, votes } => {
                write!(f, "Account {account} has {votes} units of voting power")
            }
            Self::TokenBalance { account, balance } => {
                write!(f, "Account {account} has a balance of {balance} decimal units")
            }
        }
    }
}

/// One verification read, successful or not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewCheck {
    Read(ContractView),
    Failed { view: &'static str, reason: String },
}

impl ViewCheck {
    pub fn from_result(view: &'static str, result: Result<ContractView, LedgerError>) -> Self {
        match result {
            Ok(read) => Self::Read(read),
            Err(e) => {
                tracing::warn!(view, error = %e, "verification read failed");
                Self::Failed {
                    view,
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for ViewCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(view) => write!(f, "{view}"),
            Self::Failed { view, reason } => write!(f, "Could not read {view}: {reason}"),
        }
    }
}

pub struct PostActionVerifier<'a, L> {
    ledger: &'a L,
}

impl<'a, L: LedgerClient> PostActionVerifier<'a, L> {
    pub fn new(ledger: &'a L) -> Self {
        Self { ledger }
    }

    /// `proposals(index)` on a ballot.
    pub async fn proposal(
        &self,
        ballot: Address,
        interface: &ContractInterface,
        index: u64,
    ) -> Result<ProposalView, LedgerError> {
        let call = ContractCall::new(ballot, interface, "proposals", vec![index.into()]);
        let values = self.ledger.call_view(&call).await?;
        match values.as_slice() {
            [name, count, ..] => {
                let word = name.as_bytes32().ok_or_else(|| shape("proposals", "bytes32 name"))?;
                let vote_count = count.as_uint().ok_or_else(|| shape("proposals", "uint vote count"))?;
                Ok(ProposalView {
                    index,
                    name: ProposalName::decode_bytes32(&word),
                    vote_count,
                })
            }
            _ => Err(shape("proposals", "(bytes32, uint256)")),
        }
    }

    /// Every proposal on a ballot. With no `count`, indices are probed until
    /// the contract reverts or [`MAX_PROPOSALS`] is reached.
    pub async fn proposals(
        &self,
        ballot: Address,
        interface: &ContractInterface,
        count: Option<u64>,
    ) -> Result<ContractView, LedgerError> {
        let mut list = Vec::new();
        for index in 0..count.unwrap_or(MAX_PROPOSALS) {
            match self.proposal(ballot, interface, index).await {
                Ok(p) => list.push(p),
                Err(e) if count.is_none() && e.is_revert() => break,
                Err(e) => return Err(e),
            }
        }
        Ok(ContractView::Proposals(list))
    }

    /// `getVotes(account)` on a votes-enabled token.
    pub async fn voting_power(
        &self,
        token: Address,
        interface: &ContractInterface,
        account: Address,
    ) -> Result<ContractView, LedgerError> {
        let votes = self.read_uint(token, interface, "getVotes", account).await?;
        Ok(ContractView::VotingPower { account, votes })
    }

    /// `balanceOf(account)` on a token.
    pub async fn token_balance(
        &self,
        token: Address,
        interface: &ContractInterface,
        account: Address,
    ) -> Result<ContractView, LedgerError> {
        let balance = self.read_uint(token, interface, "balanceOf", account).await?;
        Ok(ContractView::TokenBalance { account, balance })
    }

    async fn read_uint(
        &self,
        contract: Address,
        interface: &ContractInterface,
        function: &'static str,
        account: Address,
    ) -> Result<U256, LedgerError> {
        let call = ContractCall::new(contract, interface, function, vec![AbiValue::from(account)]);
        self.ledger
            .call_view(&call)
            .await?
            .first()
            .and_then(AbiValue::as_uint)
            .ok_or_else(|| shape(function, "uint256"))
    }
}

fn shape(function: &str, expected: &str) -> LedgerError {
    LedgerError::InvalidResponse(format!("{function} did not return {expected}"))
}
