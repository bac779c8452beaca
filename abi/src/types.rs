//! Parsed Solidity parameter types.

use std::fmt;
use std::str::FromStr;

use crate::error::AbiError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiType {
    Address,
    /// Unsigned integer of the given bit width (8..=256, multiple of 8).
    Uint(usize),
    Bool,
    /// Fixed-size byte string, 1..=32 bytes.
    FixedBytes(usize),
    Bytes,
    String,
    /// Dynamic-length array `T[]`.
    Array(Box<AbiType>),
}

impl AbiType {
    /// Whether the encoding lives in the tail section (length-prefixed).
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Bytes | Self::String | Self::Array(_))
    }
}

impl FromStr for AbiType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || AbiError::UnsupportedType(s.to_string());

        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(Self::Array(Box::new(inner.parse()?)));
        }
        match s {
            "address" => return Ok(Self::Address),
            "bool" => return Ok(Self::Bool),
            "string" => return Ok(Self::String),
            "bytes" => return Ok(Self::Bytes),
            "uint" => return Ok(Self::Uint(256)),
            _ => {}
        }
        if let Some(bits) = s.strip_prefix("uint") {
            let bits: usize = bits.parse().map_err(|_| unsupported())?;
            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(unsupported());
            }
            return Ok(Self::Uint(bits));
        }
        if let Some(len) = s.strip_prefix("bytes") {
            let len: usize = len.parse().map_err(|_| unsupported())?;
            if len == 0 || len > 32 {
                return Err(unsupported());
            }
            return Ok(Self::FixedBytes(len));
        }
        Err(unsupported())
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::Uint(bits) => write!(f, "uint{bits}"),
            Self::Bool => f.write_str("bool"),
            Self::FixedBytes(len) => write!(f, "bytes{len}"),
            Self::Bytes => f.write_str("bytes"),
            Self::String => f.write_str("string"),
            Self::Array(inner) => write!(f, "{inner}[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_elementary_types() {
        assert_eq!("address".parse::<AbiType>().unwrap(), AbiType::Address);
        assert_eq!("uint256".parse::<AbiType>().unwrap(), AbiType::Uint(256));
        assert_eq!("uint".parse::<AbiType>().unwrap(), AbiType::Uint(256));
        assert_eq!("uint8".parse::<AbiType>().unwrap(), AbiType::Uint(8));
        assert_eq!("bytes32".parse::<AbiType>().unwrap(), AbiType::FixedBytes(32));
        assert_eq!("bytes".parse::<AbiType>().unwrap(), AbiType::Bytes);
    }

    #[test]
    fn parses_arrays() {
        let ty: AbiType = "bytes32[]".parse().unwrap();
        assert_eq!(ty, AbiType::Array(Box::new(AbiType::FixedBytes(32))));
        assert!(ty.is_dynamic());
        assert_eq!(ty.to_string(), "bytes32[]");
    }

    #[test]
    fn rejects_unsupported() {
        for bad in ["tuple", "int256", "uint7", "uint264", "bytes33", "bytes0", "fixed128x18"] {
            assert!(bad.parse::<AbiType>().is_err(), "{bad} should be unsupported");
        }
    }
}
