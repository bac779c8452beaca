//! Transaction-lifecycle orchestration for the tokenized ballot toolkit.
//!
//! Every operator action follows the same path:
//!
//! ```text
//! Validating -> ReadingContext -> AwaitingConfirmation -> Submitting
//!            -> AwaitingLedgerConfirmation -> Verifying -> Done
//! ```
//!
//! with `Cancelled` reachable from the prompt and `Failed` from any
//! non-terminal stage. [`Operator`] wires a [`LedgerClient`], a
//! [`TransactionSubmitter`], and a per-run [`Confirmer`] into the five
//! actions: deploy, vote, mint, transfer, delegate.
//!
//! [`LedgerClient`]: ballot_rpc::LedgerClient
//! [`TransactionSubmitter`]: ballot_rpc::TransactionSubmitter

pub mod confirm;
pub mod delegate;
pub mod deploy;
pub mod error;
pub mod flow;
pub mod mint;
pub mod operator;
pub mod params;
pub mod report;
pub mod transfer;
pub mod verify;
pub mod vote;
pub mod wait;

pub use confirm::{is_assent, AutoConfirm, Confirmer, LineConfirmer};
pub use error::FlowError;
pub use flow::{Action, FlowRun, Stage};
pub use operator::{Operator, Preflight};
pub use params::{DelegateParams, DeployParams, MintParams, TransferParams, VoteParams};
pub use report::RunReport;
pub use verify::{ContractView, PostActionVerifier, ProposalView, ViewCheck};
pub use wait::{poll_until, Backoff, ConfirmationWaiter, Polled, TransactionOutcome, WaitPolicy};
