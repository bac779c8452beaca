//! `0x`-prefixed hex quantities and data as used on the JSON-RPC wire.

use ballot_types::U256;

use crate::error::LedgerError;

fn digits(text: &str) -> Result<&str, LedgerError> {
    text.strip_prefix("0x")
        .ok_or_else(|| LedgerError::InvalidResponse(format!("expected 0x-prefixed hex, got {text:?}")))
}

pub fn parse_u64(text: &str) -> Result<u64, LedgerError> {
    let d = digits(text)?;
    if d.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(d, 16)
        .map_err(|e| LedgerError::InvalidResponse(format!("bad quantity {text:?}: {e}")))
}

pub fn parse_u128(text: &str) -> Result<u128, LedgerError> {
    let d = digits(text)?;
    if d.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(d, 16)
        .map_err(|e| LedgerError::InvalidResponse(format!("bad quantity {text:?}: {e}")))
}

pub fn parse_u256(text: &str) -> Result<U256, LedgerError> {
    let d = digits(text)?;
    if d.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(d, 16)
        .map_err(|e| LedgerError::InvalidResponse(format!("bad quantity {text:?}: {e}")))
}

pub fn parse_data(text: &str) -> Result<Vec<u8>, LedgerError> {
    hex::decode(digits(text)?)
        .map_err(|e| LedgerError::InvalidResponse(format!("bad data {text:?}: {e}")))
}

pub fn encode_data(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities() {
        assert_eq!(parse_u64("0x1b4").unwrap(), 436);
        assert_eq!(parse_u64("0x0").unwrap(), 0);
        assert_eq!(parse_u128("0x4a817c800").unwrap(), 20_000_000_000);
        assert_eq!(
            parse_u256("0xde0b6b3a7640000").unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
    }

    #[test]
    fn rejects_unprefixed() {
        assert!(parse_u64("1b4").is_err());
        assert!(parse_data("abcd").is_err());
    }

    #[test]
    fn data_roundtrip() {
        let raw = [0xde, 0xad, 0xbe, 0xef];
        assert_eq!(parse_data(&encode_data(&raw)).unwrap(), raw);
        assert!(parse_data("0x").unwrap().is_empty());
    }
}
