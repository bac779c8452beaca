//! Proposal names and their fixed-width `bytes32` encoding.

use std::fmt;
use std::str::FromStr;

use crate::error::InputError;

/// A ballot option's human-readable name.
///
/// Stored on-chain as `bytes32`, right-padded with zeros. Names longer than
/// 32 bytes are rejected rather than truncated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProposalName(String);

impl ProposalName {
    pub const MAX_BYTES: usize = 32;

    pub fn new(name: impl Into<String>) -> Result<Self, InputError> {
        let name = name.into();
        if name.is_empty() || name.contains('\0') {
            return Err(InputError::InvalidProposalName);
        }
        if name.len() > Self::MAX_BYTES {
            let len = name.len();
            return Err(InputError::ProposalNameTooLong { name, len });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_bytes32(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[..self.0.len()].copy_from_slice(self.0.as_bytes());
        out
    }

    /// Decode an on-chain `bytes32` name: trailing zero padding is dropped and
    /// invalid UTF-8 is replaced rather than rejected.
    pub fn decode_bytes32(word: &[u8; 32]) -> String {
        let end = word.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        String::from_utf8_lossy(&word[..end]).into_owned()
    }
}

impl FromStr for ProposalName {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ProposalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_32_bytes() {
        let name = ProposalName::new("Proposal1").unwrap();
        let word = name.to_bytes32();
        assert_eq!(&word[..9], b"Proposal1");
        assert!(word[9..].iter().all(|b| *b == 0));
        assert_eq!(ProposalName::decode_bytes32(&word), "Proposal1");
    }

    #[test]
    fn exactly_32_bytes_fits() {
        let text = "a".repeat(32);
        let name = ProposalName::new(text.clone()).unwrap();
        assert_eq!(ProposalName::decode_bytes32(&name.to_bytes32()), text);
    }

    #[test]
    fn too_long_is_an_error_not_a_clamp() {
        let err = ProposalName::new("a".repeat(33)).unwrap_err();
        assert_eq!(
            err,
            InputError::ProposalNameTooLong {
                name: "a".repeat(33),
                len: 33
            }
        );
    }

    #[test]
    fn multibyte_length_counts_bytes() {
        // 11 three-byte characters = 33 bytes
        assert!(ProposalName::new("€".repeat(11)).is_err());
        assert!(ProposalName::new("€".repeat(10)).is_ok());
    }

    #[test]
    fn empty_and_nul_rejected() {
        assert_eq!(
            ProposalName::new("").unwrap_err(),
            InputError::InvalidProposalName
        );
        assert!(ProposalName::new("a\0b").is_err());
    }

    #[test]
    fn decode_all_zero_is_empty() {
        assert_eq!(ProposalName::decode_bytes32(&[0u8; 32]), "");
    }
}
