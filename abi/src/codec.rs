//! Solidity ABI head/tail encoding.
//!
//! Every supported static type occupies exactly one 32-byte head slot, so a
//! tuple's head size is `32 * len`.

use ballot_types::{Address, U256};

use crate::error::AbiError;
use crate::types::AbiType;
use crate::value::AbiValue;

const WORD: usize = 32;

/// Encode `values` as a tuple of `types`.
pub fn encode(types: &[AbiType], values: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    if types.len() != values.len() {
        return Err(AbiError::ArgumentCount {
            function: "tuple".into(),
            expected: types.len(),
            got: values.len(),
        });
    }
    let mut head = Vec::with_capacity(types.len() * WORD);
    let mut tail = Vec::new();
    let head_len = types.len() * WORD;

    for (ty, value) in types.iter().zip(values) {
        if !value.matches(ty) {
            return Err(AbiError::TypeMismatch {
                expected: ty.to_string(),
                got: value.kind(),
            });
        }
        if ty.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend(encode_single(ty, value)?);
        } else {
            head.extend(encode_single(ty, value)?);
        }
    }
    head.extend(tail);
    Ok(head)
}

fn encode_single(ty: &AbiType, value: &AbiValue) -> Result<Vec<u8>, AbiError> {
    match (ty, value) {
        (AbiType::Address, AbiValue::Address(a)) => Ok(a.to_word().to_vec()),
        (AbiType::Uint(bits), AbiValue::Uint(v)) => {
            if v.bit_len() > *bits {
                return Err(AbiError::ValueOutOfRange(ty.to_string()));
            }
            Ok(v.to_be_bytes::<32>().to_vec())
        }
        (AbiType::Bool, AbiValue::Bool(b)) => Ok(usize_word(usize::from(*b)).to_vec()),
        (AbiType::FixedBytes(_), AbiValue::FixedBytes(b)) => {
            let mut word = [0u8; WORD];
            word[..b.len()].copy_from_slice(b);
            Ok(word.to_vec())
        }
        (AbiType::Bytes, AbiValue::Bytes(b)) => Ok(encode_packed_bytes(b)),
        (AbiType::String, AbiValue::String(s)) => Ok(encode_packed_bytes(s.as_bytes())),
        (AbiType::Array(inner), AbiValue::Array(items)) => {
            let mut out = usize_word(items.len()).to_vec();
            let types = vec![(**inner).clone(); items.len()];
            out.extend(encode(&types, items)?);
            Ok(out)
        }
        _ => Err(AbiError::TypeMismatch {
            expected: ty.to_string(),
            got: value.kind(),
        }),
    }
}

fn encode_packed_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = usize_word(data.len()).to_vec();
    out.extend_from_slice(data);
    let padding = (WORD - data.len() % WORD) % WORD;
    out.resize(out.len() + padding, 0);
    out
}

fn usize_word(n: usize) -> [u8; WORD] {
    U256::from(n).to_be_bytes::<32>()
}

/// Decode a tuple of `types` from `data`.
pub fn decode(types: &[AbiType], data: &[u8]) -> Result<Vec<AbiValue>, AbiError> {
    let mut values = Vec::with_capacity(types.len());
    for (i, ty) in types.iter().enumerate() {
        let slot = read_word(data, i * WORD)?;
        let value = if ty.is_dynamic() {
            let offset = word_to_usize(&slot)?;
            let body = data
                .get(offset..)
                .ok_or_else(|| AbiError::Decode(format!("offset {offset} beyond data")))?;
            decode_dynamic(ty, body)?
        } else {
            decode_static(ty, &slot)
        };
        values.push(value);
    }
    Ok(values)
}

fn decode_static(ty: &AbiType, word: &[u8; WORD]) -> AbiValue {
    match ty {
        AbiType::Address => AbiValue::Address(Address::from_word(word)),
        AbiType::Bool => AbiValue::Bool(word[WORD - 1] != 0),
        AbiType::FixedBytes(len) => AbiValue::FixedBytes(word[..*len].to_vec()),
        _ => AbiValue::Uint(U256::from_be_bytes(*word)),
    }
}

fn decode_dynamic(ty: &AbiType, body: &[u8]) -> Result<AbiValue, AbiError> {
    let len = word_to_usize(&read_word(body, 0)?)?;
    match ty {
        AbiType::Bytes | AbiType::String => {
            let end = WORD
                .checked_add(len)
                .ok_or_else(|| AbiError::Decode(format!("{ty} length {len} overflows")))?;
            let bytes = body
                .get(WORD..end)
                .ok_or_else(|| AbiError::Decode(format!("{len}-byte {ty} truncated")))?
                .to_vec();
            if matches!(ty, AbiType::String) {
                String::from_utf8(bytes)
                    .map(AbiValue::String)
                    .map_err(|e| AbiError::Decode(e.to_string()))
            } else {
                Ok(AbiValue::Bytes(bytes))
            }
        }
        AbiType::Array(inner) => {
            let elements = &body[WORD..];
            if len > elements.len() / WORD {
                return Err(AbiError::Decode(format!(
                    "{ty} claims {len} elements in {} bytes",
                    elements.len()
                )));
            }
            let types = vec![(**inner).clone(); len];
            decode(&types, elements).map(AbiValue::Array)
        }
        _ => Err(AbiError::UnsupportedType(ty.to_string())),
    }
}

fn read_word(data: &[u8], at: usize) -> Result<[u8; WORD], AbiError> {
    let bytes = at
        .checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .ok_or_else(|| AbiError::Decode(format!("need 32 bytes at offset {at}, have {}", data.len())))?;
    let mut word = [0u8; WORD];
    word.copy_from_slice(bytes);
    Ok(word)
}

fn word_to_usize(word: &[u8; WORD]) -> Result<usize, AbiError> {
    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(AbiError::Decode("length or offset too large".into()));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(tail))
        .map_err(|_| AbiError::Decode("length or offset too large".into()))
}
