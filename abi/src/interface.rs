//! Contract interfaces loaded from compiled artifacts.

use alloy_primitives::keccak256;
use serde::Deserialize;
use std::path::Path;

use crate::codec;
use crate::error::AbiError;
use crate::types::AbiType;
use crate::value::AbiValue;

/// One named parameter of a function, constructor, or return tuple.
#[derive(Clone, Debug, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AbiParam {
    pub fn abi_type(&self) -> Result<AbiType, AbiError> {
        self.kind.parse()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    #[default]
    Nonpayable,
    Payable,
}

/// A callable contract function.
#[derive(Clone, Debug, Deserialize)]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default, rename = "stateMutability")]
    pub state_mutability: StateMutability,
}

impl AbiFunction {
    /// Canonical signature, e.g. `transfer(address,uint256)`.
    pub fn signature(&self) -> String {
        let args: Vec<&str> = self.inputs.iter().map(|p| p.kind.as_str()).collect();
        format!("{}({})", self.name, args.join(","))
    }

    /// First four bytes of `keccak256(signature)`.
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    pub fn is_read_only(&self) -> bool {
        matches!(
            self.state_mutability,
            StateMutability::View | StateMutability::Pure
        )
    }

    pub fn input_types(&self) -> Result<Vec<AbiType>, AbiError> {
        self.inputs.iter().map(AbiParam::abi_type).collect()
    }

    pub fn output_types(&self) -> Result<Vec<AbiType>, AbiError> {
        self.outputs.iter().map(AbiParam::abi_type).collect()
    }

    /// Selector followed by the encoded arguments.
    pub fn encode_call(&self, args: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
        if args.len() != self.inputs.len() {
            return Err(AbiError::ArgumentCount {
                function: self.signature(),
                expected: self.inputs.len(),
                got: args.len(),
            });
        }
        let mut data = self.selector().to_vec();
        data.extend(codec::encode(&self.input_types()?, args)?);
        Ok(data)
    }

    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
        codec::decode(&self.output_types()?, data)
    }
}

/// Raw Hardhat / Foundry artifact layout; unknown fields are ignored.
#[derive(Deserialize)]
struct Artifact {
    #[serde(default, rename = "contractName")]
    contract_name: Option<String>,
    abi: Vec<serde_json::Value>,
    #[serde(default)]
    bytecode: Option<serde_json::Value>,
}

/// A contract's callable surface plus, for deployable artifacts, its bytecode.
#[derive(Clone, Debug)]
pub struct ContractInterface {
    name: String,
    functions: Vec<AbiFunction>,
    constructor: Vec<AbiParam>,
    bytecode: Option<Vec<u8>>,
}

impl ContractInterface {
    /// Parse an artifact JSON document. `fallback_name` is used when the
    /// artifact has no `contractName`.
    pub fn from_artifact_json(json: &str, fallback_name: &str) -> Result<Self, AbiError> {
        let artifact: Artifact =
            serde_json::from_str(json).map_err(|e| AbiError::InvalidArtifact(e.to_string()))?;

        let mut functions = Vec::new();
        let mut constructor = Vec::new();
        for entry in artifact.abi {
            match entry.get("type").and_then(|t| t.as_str()) {
                Some("function") => {
                    let f: AbiFunction = serde_json::from_value(entry)
                        .map_err(|e| AbiError::InvalidArtifact(format!("function entry: {e}")))?;
                    functions.push(f);
                }
                Some("constructor") => {
                    let inputs = entry
                        .get("inputs")
                        .cloned()
                        .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
                    constructor = serde_json::from_value(inputs).map_err(|e| {
                        AbiError::InvalidArtifact(format!("constructor entry: {e}"))
                    })?;
                }
                // events, errors, fallback and receive entries are not callable here
                _ => {}
            }
        }

        let bytecode = match artifact.bytecode {
            // Foundry nests the hex under `bytecode.object`
            Some(serde_json::Value::Object(obj)) => obj
                .get("object")
                .and_then(|v| v.as_str())
                .map(decode_bytecode)
                .transpose()?,
            Some(serde_json::Value::String(s)) => Some(decode_bytecode(&s)?),
            _ => None,
        }
        .filter(|code| !code.is_empty());

        Ok(Self {
            name: artifact
                .contract_name
                .unwrap_or_else(|| fallback_name.to_string()),
            functions,
            constructor,
            bytecode,
        })
    }

    /// Load an artifact file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AbiError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AbiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("contract");
        Self::from_artifact_json(&json, stem)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytecode(&self) -> Option<&[u8]> {
        self.bytecode.as_deref()
    }

    pub fn constructor_inputs(&self) -> &[AbiParam] {
        &self.constructor
    }

    /// Look up a function by name. Overloads resolve to the first entry.
    pub fn function(&self, name: &str) -> Result<&AbiFunction, AbiError> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| AbiError::FunctionNotFound {
                contract: self.name.clone(),
                function: name.to_string(),
            })
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name == name)
    }

    /// Creation payload: bytecode followed by the encoded constructor arguments.
    pub fn encode_deployment(&self, args: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
        let code = self
            .bytecode
            .as_ref()
            .ok_or_else(|| AbiError::MissingBytecode(self.name.clone()))?;
        if args.len() != self.constructor.len() {
            return Err(AbiError::ArgumentCount {
                function: format!("{} constructor", self.name),
                expected: self.constructor.len(),
                got: args.len(),
            });
        }
        let types = self
            .constructor
            .iter()
            .map(AbiParam::abi_type)
            .collect::<Result<Vec<_>, _>>()?;
        let mut data = code.clone();
        data.extend(codec::encode(&types, args)?);
        Ok(data)
    }
}

fn decode_bytecode(text: &str) -> Result<Vec<u8>, AbiError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| AbiError::InvalidArtifact(format!("bytecode: {e}")))
}
