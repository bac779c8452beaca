//! Reads and writes addressed to one contract through one interface.

use ballot_abi::{AbiError, AbiValue, ContractInterface};
use ballot_types::Address;

/// A function invocation on a specific contract.
///
/// The interface travels with the address, so a function is always encoded
/// against the contract that will execute it.
#[derive(Clone, Debug)]
pub struct ContractCall<'a> {
    pub contract: Address,
    pub interface: &'a ContractInterface,
    pub function: String,
    pub args: Vec<AbiValue>,
}

impl<'a> ContractCall<'a> {
    pub fn new(
        contract: Address,
        interface: &'a ContractInterface,
        function: impl Into<String>,
        args: Vec<AbiValue>,
    ) -> Self {
        Self {
            contract,
            interface,
            function: function.into(),
            args,
        }
    }

    /// Selector + ABI-encoded arguments.
    pub fn calldata(&self) -> Result<Vec<u8>, AbiError> {
        self.interface.function(&self.function)?.encode_call(&self.args)
    }
}

/// One state-changing operation.
#[derive(Clone, Debug)]
pub enum WriteRequest<'a> {
    /// Create a contract from the interface's bytecode.
    Deploy {
        interface: &'a ContractInterface,
        args: Vec<AbiValue>,
    },
    /// Invoke a function on an existing contract.
    Call(ContractCall<'a>),
}

impl WriteRequest<'_> {
    /// Destination (`None` for contract creation) and transaction payload.
    pub fn encode(&self) -> Result<(Option<Address>, Vec<u8>), AbiError> {
        match self {
            Self::Deploy { interface, args } => Ok((None, interface.encode_deployment(args)?)),
            Self::Call(call) => Ok((Some(call.contract), call.calldata()?)),
        }
    }

    /// Short description for logs and prompts, e.g. `mint on 0x2b16...7983`.
    pub fn describe(&self) -> String {
        match self {
            Self::Deploy { interface, .. } => format!("deploy {}", interface.name()),
            Self::Call(call) => format!("{} on {}", call.function, call.contract.cropped()),
        }
    }

    /// Full invocation with arguments, e.g.
    /// `mint(0x5aa7..., 1000) on 0x2b16...`, for terminal error reports.
    pub fn invocation(&self) -> String {
        let args = self
            .args()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        match self {
            Self::Deploy { interface, .. } => format!("deploy {}({args})", interface.name()),
            Self::Call(call) => format!("{}({args}) on {}", call.function, call.contract),
        }
    }

    pub fn args(&self) -> &[AbiValue] {
        match self {
            Self::Deploy { args, .. } => args,
            Self::Call(call) => &call.args,
        }
    }
}
