//! Input error taxonomy.
//!
//! Every variant is raised before any network call is made.

use std::fmt;
use thiserror::Error;

/// Expected argument count for an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
            Self::Between(lo, hi) => (lo..=hi).contains(&count),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
            Self::Between(lo, hi) => write!(f, "{lo} to {hi}"),
        }
    }
}

/// Malformed operator input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid number of arguments: expected {expected}, got {got}")]
    InvalidArgumentCount { expected: Arity, got: usize },

    #[error("invalid {field}: {value:?} is not a 0x-prefixed 40-digit hex address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid {field}: {value:?} {reason}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("at least one proposal name is required")]
    MissingProposals,

    #[error("proposal name {name:?} is {len} bytes, the limit is 32")]
    ProposalNameTooLong { name: String, len: usize },

    #[error("proposal name must not be empty or contain NUL bytes")]
    InvalidProposalName,

    #[error("invalid private key: {0}")]
    InvalidKey(&'static str),
}

impl InputError {
    /// Re-label the offending field of an address or number error.
    pub fn with_field(self, field: &'static str) -> Self {
        match self {
            Self::InvalidAddress { value, .. } => Self::InvalidAddress { field, value },
            Self::InvalidNumber { value, reason, .. } => Self::InvalidNumber {
                field,
                value,
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_accepts() {
        assert!(Arity::Exactly(3).accepts(3));
        assert!(!Arity::Exactly(3).accepts(2));
        assert!(Arity::AtLeast(3).accepts(7));
        assert!(!Arity::AtLeast(3).accepts(2));
        assert!(Arity::Between(1, 2).accepts(1));
        assert!(Arity::Between(1, 2).accepts(2));
        assert!(!Arity::Between(1, 2).accepts(3));
    }

    #[test]
    fn with_field_relabels_number_errors() {
        let err = InputError::InvalidNumber {
            field: "number",
            value: "abc".into(),
            reason: "is not a decimal integer",
        }
        .with_field("amount");
        assert_eq!(
            err.to_string(),
            "invalid amount: \"abc\" is not a decimal integer"
        );
    }

    #[test]
    fn with_field_leaves_other_variants() {
        assert_eq!(
            InputError::MissingProposals.with_field("amount"),
            InputError::MissingProposals
        );
    }
}
