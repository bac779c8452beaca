//! Contract interface descriptions for the ballot and token contracts.
//!
//! A [`ContractInterface`] is built from a compiled artifact (Hardhat JSON:
//! `contractName`, `abi`, `bytecode`). Every read or write names the
//! interface it is encoded against, so a function is always looked up on the
//! contract it is sent to.
//!
//! Supported parameter types: `address`, `uintN`, `bool`, `bytesN`, `bytes`,
//! `string`, and dynamic arrays of any of these. Tuples are rejected.

pub mod codec;
pub mod error;
pub mod interface;
pub mod types;
pub mod value;

pub use error::AbiError;
pub use interface::{AbiFunction, AbiParam, ContractInterface, StateMutability};
pub use types::AbiType;
pub use value::AbiValue;
