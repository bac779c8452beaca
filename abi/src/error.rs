use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid contract artifact: {0}")]
    InvalidArtifact(String),

    #[error("function {function:?} not found on {contract} interface")]
    FunctionNotFound { contract: String, function: String },

    #[error("{0} artifact carries no deployable bytecode")]
    MissingBytecode(String),

    #[error("{function} takes {expected} argument(s), got {got}")]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("unsupported ABI type: {0}")]
    UnsupportedType(String),

    #[error("value out of range for {0}")]
    ValueOutOfRange(String),

    #[error("failed to decode return data: {0}")]
    Decode(String),
}
