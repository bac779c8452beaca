//! Nullable infrastructure for deterministic testing.
//!
//! The ledger boundary is abstracted behind the `LedgerClient` and
//! `TransactionSubmitter` traits. This crate provides an in-memory
//! implementation that:
//! - Returns scripted values
//! - Records every write it is asked to make
//! - Never touches the network
//!
//! Usage: build a [`NullLedger`], script its views and receipts, and hand it
//! to the orchestrator in place of the HTTP client and signer.

pub mod artifacts;
pub mod ledger;
pub mod script;

pub use artifacts::{ballot_interface, token_interface, BALLOT_ARTIFACT, TOKEN_ARTIFACT};
pub use ledger::{NullLedger, SubmittedWrite, ViewQuery};
pub use script::ReceiptScript;
