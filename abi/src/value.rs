//! Typed argument and return values.

use std::fmt;

use ballot_types::{Address, ProposalName, Quantity, U256};

use crate::types::AbiType;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Uint(U256),
    Bool(bool),
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<AbiValue>),
}

impl AbiValue {
    /// Short type description used in mismatch errors.
    pub fn kind(&self) -> String {
        match self {
            Self::Address(_) => "address".into(),
            Self::Uint(_) => "uint".into(),
            Self::Bool(_) => "bool".into(),
            Self::FixedBytes(b) => format!("bytes{}", b.len()),
            Self::Bytes(_) => "bytes".into(),
            Self::String(_) => "string".into(),
            Self::Array(_) => "array".into(),
        }
    }

    /// Whether this value can be encoded as `ty`.
    pub fn matches(&self, ty: &AbiType) -> bool {
        match (self, ty) {
            (Self::Address(_), AbiType::Address)
            | (Self::Uint(_), AbiType::Uint(_))
            | (Self::Bool(_), AbiType::Bool)
            | (Self::Bytes(_), AbiType::Bytes)
            | (Self::String(_), AbiType::String) => true,
            (Self::FixedBytes(b), AbiType::FixedBytes(n)) => b.len() == *n,
            (Self::Array(items), AbiType::Array(inner)) => items.iter().all(|v| v.matches(inner)),
            _ => false,
        }
    }

    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as a 32-byte word, for `bytes32` returns.
    pub fn as_bytes32(&self) -> Option<[u8; 32]> {
        match self {
            Self::FixedBytes(b) if b.len() == 32 => {
                let mut word = [0u8; 32];
                word.copy_from_slice(b);
                Some(word)
            }
            _ => None,
        }
    }
}

/// Human-readable rendering for error messages: addresses in full,
/// integers in decimal, byte strings as `0x` hex.
impl fmt::Display for AbiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(a) => write!(f, "{a}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::FixedBytes(b) | Self::Bytes(b) => write!(f, "0x{}", hex::encode(b)),
            Self::String(text) => write!(f, "{text:?}"),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<Address> for AbiValue {
    fn from(a: Address) -> Self {
        Self::Address(a)
    }
}

impl From<U256> for AbiValue {
    fn from(v: U256) -> Self {
        Self::Uint(v)
    }
}

impl From<Quantity> for AbiValue {
    fn from(q: Quantity) -> Self {
        Self::Uint(q.value())
    }
}

impl From<u64> for AbiValue {
    fn from(v: u64) -> Self {
        Self::Uint(U256::from(v))
    }
}

impl From<bool> for AbiValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&ProposalName> for AbiValue {
    fn from(name: &ProposalName) -> Self {
        Self::FixedBytes(name.to_bytes32().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposal_name_becomes_bytes32() {
        let name = ProposalName::new("Yes").unwrap();
        let v = AbiValue::from(&name);
        assert!(v.matches(&AbiType::FixedBytes(32)));
        assert_eq!(
            ProposalName::decode_bytes32(&v.as_bytes32().unwrap()),
            "Yes"
        );
    }

    #[test]
    fn array_matching_checks_every_element() {
        let ty = AbiType::Array(Box::new(AbiType::Uint(256)));
        assert!(AbiValue::Array(vec![1u64.into(), 2u64.into()]).matches(&ty));
        assert!(!AbiValue::Array(vec![1u64.into(), true.into()]).matches(&ty));
        assert!(AbiValue::Array(vec![]).matches(&ty));
    }

    #[test]
    fn display_spells_out_arguments() {
        let to: Address = "0x5aa70e85d4b0a33fa1b6f5d6e4c0f5e9d8a2d58c".parse().unwrap();
        let args = AbiValue::Array(vec![to.into(), 1000u64.into(), AbiValue::Bytes(vec![0xab])]);
        assert_eq!(
            args.to_string(),
            "[0x5aa70e85d4b0a33fa1b6f5d6e4c0f5e9d8a2d58c, 1000, 0xab]"
        );
    }
}
