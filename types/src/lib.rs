//! Fundamental types for the tokenized ballot toolkit.
//!
//! This crate defines the values shared across every other crate in the workspace:
//! account addresses, integer quantities, proposal names, transaction hashes,
//! network identifiers, signing keys, and the input error taxonomy.

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod proposal;
pub mod quantity;
pub mod time;

pub use address::Address;
pub use error::{Arity, InputError};
pub use hash::{ParseHashError, TxHash};
pub use keys::PrivateKey;
pub use network::NetworkId;
pub use proposal::ProposalName;
pub use quantity::Quantity;
pub use time::Timestamp;

/// Re-exported so downstream crates agree on a single 256-bit integer type.
pub use alloy_primitives::U256;
