//! Positional-argument validation for every operator action.
//!
//! Arity is checked before any field so a short argument list never
//! produces a misleading field error.

use ballot_types::{Address, Arity, InputError, ProposalName, Quantity};

/// `NAME... TOKEN DURATION`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployParams {
    pub proposals: Vec<ProposalName>,
    pub token: Address,
    /// Blocks between now and the voting-power snapshot.
    pub duration: Quantity,
}

/// `BALLOT INDEX AMOUNT`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteParams {
    pub ballot: Address,
    pub proposal: Quantity,
    pub amount: Quantity,
}

/// `TOKEN TO AMOUNT`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintParams {
    pub token: Address,
    pub to: Address,
    pub amount: Quantity,
}

/// `TOKEN TO AMOUNT`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferParams {
    pub token: Address,
    pub to: Address,
    pub amount: Quantity,
}

/// `TOKEN [DELEGATEE]`; a missing delegatee means the signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegateParams {
    pub token: Address,
    pub delegatee: Option<Address>,
}

impl DelegateParams {
    pub fn delegatee_or(&self, signer: Address) -> Address {
        self.delegatee.unwrap_or(signer)
    }
}

fn check_arity(args: &[String], expected: Arity) -> Result<(), InputError> {
    if expected.accepts(args.len()) {
        Ok(())
    } else {
        Err(InputError::InvalidArgumentCount {
            expected,
            got: args.len(),
        })
    }
}

fn address(value: &str, field: &'static str) -> Result<Address, InputError> {
    value.parse::<Address>().map_err(|e| e.with_field(field))
}

fn quantity(value: &str, field: &'static str) -> Result<Quantity, InputError> {
    value.parse::<Quantity>().map_err(|e| e.with_field(field))
}

pub fn validate_deploy(args: &[String]) -> Result<DeployParams, InputError> {
    check_arity(args, Arity::AtLeast(2))?;
    let (names, tail) = args.split_at(args.len() - 2);
    if names.is_empty() {
        return Err(InputError::MissingProposals);
    }
    let proposals = names
        .iter()
        .map(|n| ProposalName::new(n.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let token = address(&tail[0], "token address")?;
    let duration = quantity(&tail[1], "block duration")?;
    if duration.is_zero() {
        return Err(InputError::InvalidNumber {
            field: "block duration",
            value: tail[1].clone(),
            reason: "must be at least 1",
        });
    }
    Ok(DeployParams {
        proposals,
        token,
        duration,
    })
}

pub fn validate_vote(args: &[String]) -> Result<VoteParams, InputError> {
    check_arity(args, Arity::Exactly(3))?;
    Ok(VoteParams {
        ballot: address(&args[0], "ballot address")?,
        proposal: quantity(&args[1], "proposal index")?,
        amount: quantity(&args[2], "vote amount")?,
    })
}

pub fn validate_mint(args: &[String]) -> Result<MintParams, InputError> {
    check_arity(args, Arity::Exactly(3))?;
    Ok(MintParams {
        token: address(&args[0], "token address")?,
        to: address(&args[1], "recipient address")?,
        amount: quantity(&args[2], "mint amount")?,
    })
}

pub fn validate_transfer(args: &[String]) -> Result<TransferParams, InputError> {
    check_arity(args, Arity::Exactly(3))?;
    Ok(TransferParams {
        token: address(&args[0], "token address")?,
        to: address(&args[1], "recipient address")?,
        amount: quantity(&args[2], "transfer amount")?,
    })
}

pub fn validate_delegate(args: &[String]) -> Result<DelegateParams, InputError> {
    check_arity(args, Arity::Between(1, 2))?;
    Ok(DelegateParams {
        token: address(&args[0], "token address")?,
        delegatee: args
            .get(1)
            .map(|a| address(a, "delegatee address"))
            .transpose()?,
    })
}
