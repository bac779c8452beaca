//! Signing key material.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::InputError;

/// A 32-byte secp256k1 private key.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse 64 hex digits, with or without a leading `0x`.
    pub fn from_hex(text: &str) -> Result<Self, InputError> {
        let digits = text.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        if digits.len() != 64 {
            return Err(InputError::InvalidKey("expected 64 hex digits"));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| InputError::InvalidKey("not valid hex"))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_with_and_without_prefix() {
        let raw = "46".repeat(32);
        let a = PrivateKey::from_hex(&raw).unwrap();
        let b = PrivateKey::from_hex(&format!("0x{raw}")).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes(), &[0x46; 32]);
    }

    #[test]
    fn rejects_bad_length_and_alphabet() {
        assert!(PrivateKey::from_hex("abcd").is_err());
        assert!(PrivateKey::from_hex(&"zz".repeat(32)).is_err());
        assert!(PrivateKey::from_hex("").is_err());
    }
}
