//! Ballot deployment.

use ballot_abi::{AbiValue, ContractInterface};
use ballot_rpc::{LedgerClient, TransactionSubmitter, WriteRequest};
use ballot_types::{InputError, Quantity};

use crate::confirm::Confirmer;
use crate::error::FlowError;
use crate::flow::{Action, FlowRun, Stage};
use crate::operator::Operator;
use crate::params::validate_deploy;
use crate::report::RunReport;
use crate::verify::ViewCheck;

pub(crate) async fn run<L, S, C>(
    op: &Operator<'_, L, S>,
    run: &mut FlowRun,
    args: &[String],
    ballot: &ContractInterface,
    token: &ContractInterface,
    confirmer: &mut C,
) -> Result<RunReport, FlowError>
where
    L: LedgerClient,
    S: TransactionSubmitter,
    C: Confirmer,
{
    let params = validate_deploy(args)?;

    run.advance(Stage::ReadingContext)?;
    let preflight = op.preflight().await?;
    let target_block = params
        .duration
        .checked_add(Quantity::from_u64(preflight.height))
        .ok_or_else(|| InputError::InvalidNumber {
            field: "block duration",
            value: params.duration.to_string(),
            reason: "overflows the block height",
        })?;

    let names: Vec<&str> = params.proposals.iter().map(|p| p.as_str()).collect();
    let request = WriteRequest::Deploy {
        interface: ballot,
        args: vec![
            AbiValue::Array(params.proposals.iter().map(AbiValue::from).collect()),
            params.token.into(),
            target_block.into(),
        ],
    };
    let summary = format!(
        "{}\nDeploy {} with proposals [{}] on token {}, voting power snapshot at block {} ({} + {})",
        preflight.describe(op.network()),
        ballot.name(),
        names.join(", "),
        params.token,
        target_block,
        preflight.height,
        params.duration
    );

    let receipt = op.execute(run, confirmer, &summary, &request).await?;
    let deployed = receipt
        .contract_address
        .ok_or(FlowError::DeploymentAddressMissing {
            hash: receipt.transaction_hash,
            block: receipt.block_number,
        })?;
    tracing::info!(%deployed, block = receipt.block_number, "ballot deployed");

    let verifier = op.verifier();
    let proposals = verifier
        .proposals(deployed, ballot, Some(params.proposals.len() as u64))
        .await;
    let power = verifier
        .voting_power(params.token, token, preflight.signer)
        .await;

    let headline = format!("[{}] {} at {}", Action::Deploy.past_tense(), ballot.name(), deployed);
    Ok(
        RunReport::new(Action::Deploy, op.network(), preflight, &receipt, headline)
            .with_check(ViewCheck::from_result("proposals", proposals))
            .with_check(ViewCheck::from_result("deployer voting power", power)),
    )
}
