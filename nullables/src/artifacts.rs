//! Minimal compiled-artifact fixtures for the ballot and its token.

use ballot_abi::ContractInterface;

/// Hardhat-style artifact for the ballot contract.
pub const BALLOT_ARTIFACT: &str = r#"{
  "contractName": "TokenizedBallot",
  "abi": [
    {
      "type": "constructor",
      "stateMutability": "nonpayable",
      "inputs": [
        { "name": "_proposalNames", "type": "bytes32[]" },
        { "name": "_tokenContract", "type": "address" },
        { "name": "_targetBlockNumber", "type": "uint256" }
      ]
    },
    {
      "type": "function",
      "name": "proposals",
      "stateMutability": "view",
      "inputs": [{ "name": "", "type": "uint256" }],
      "outputs": [
        { "name": "name", "type": "bytes32" },
        { "name": "voteCount", "type": "uint256" }
      ]
    },
    {
      "type": "function",
      "name": "vote",
      "stateMutability": "nonpayable",
      "inputs": [
        { "name": "proposal", "type": "uint256" },
        { "name": "amount", "type": "uint256" }
      ],
      "outputs": []
    },
    {
      "type": "function",
      "name": "targetBlockNumber",
      "stateMutability": "view",
      "inputs": [],
      "outputs": [{ "name": "", "type": "uint256" }]
    },
    {
      "type": "event",
      "name": "Vote",
      "inputs": [
        { "name": "voter", "type": "address", "indexed": true },
        { "name": "proposal", "type": "uint256", "indexed": false }
      ]
    }
  ],
  "bytecode": "0x608060405234801561001057600080fd5b50"
}"#;

/// Hardhat-style artifact for the votes-enabled token.
pub const TOKEN_ARTIFACT: &str = r#"{
  "contractName": "MyToken",
  "abi": [
    {
      "type": "function",
      "name": "mint",
      "stateMutability": "nonpayable",
      "inputs": [
        { "name": "to", "type": "address" },
        { "name": "amount", "type": "uint256" }
      ],
      "outputs": []
    },
    {
      "type": "function",
      "name": "transfer",
      "stateMutability": "nonpayable",
      "inputs": [
        { "name": "to", "type": "address" },
        { "name": "value", "type": "uint256" }
      ],
      "outputs": [{ "name": "", "type": "bool" }]
    },
    {
      "type": "function",
      "name": "balanceOf",
      "stateMutability": "view",
      "inputs": [{ "name": "account", "type": "address" }],
      "outputs": [{ "name": "", "type": "uint256" }]
    },
    {
      "type": "function",
      "name": "delegate",
      "stateMutability": "nonpayable",
      "inputs": [{ "name": "delegatee", "type": "address" }],
      "outputs": []
    },
    {
      "type": "function",
      "name": "getVotes",
      "stateMutability": "view",
      "inputs": [{ "name": "account", "type": "address" }],
      "outputs": [{ "name": "", "type": "uint256" }]
    }
  ],
  "bytecode": "0x"
}"#;

pub fn ballot_interface() -> ContractInterface {
    parse(BALLOT_ARTIFACT, "TokenizedBallot")
}

pub fn token_interface() -> ContractInterface {
    parse(TOKEN_ARTIFACT, "MyToken")
}

fn parse(json: &str, name: &str) -> ContractInterface {
    match ContractInterface::from_artifact_json(json, name) {
        Ok(interface) => interface,
        Err(e) => panic!("{name} fixture artifact is malformed: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_parse() {
        let ballot = ballot_interface();
        assert!(ballot.bytecode().is_some());
        assert_eq!(ballot.constructor_inputs().len(), 3);
        assert!(ballot.has_function("vote"));
        let token = token_interface();
        assert!(token.bytecode().is_none());
        assert!(token.has_function("getVotes"));
        assert!(!token.has_function("vote"));
    }
}
