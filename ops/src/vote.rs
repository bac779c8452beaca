//! Casting votes on a deployed ballot.

use ballot_abi::ContractInterface;
use ballot_rpc::{ContractCall, LedgerClient, TransactionSubmitter, WriteRequest};
use ballot_types::InputError;

use crate::confirm::Confirmer;
use crate::error::FlowError;
use crate::flow::{Action, FlowRun, Stage};
use crate::operator::Operator;
use crate::params::validate_vote;
use crate::report::RunReport;
use crate::verify::ViewCheck;

pub(crate) async fn run<L, S, C>(
    op: &Operator<'_, L, S>,
    run: &mut FlowRun,
    args: &[String],
    ballot: &ContractInterface,
    confirmer: &mut C,
) -> Result<RunReport, FlowError>
where
    L: LedgerClient,
    S: TransactionSubmitter,
    C: Confirmer,
{
    let params = validate_vote(args)?;
    let not_a_proposal = || InputError::InvalidNumber {
        field: "proposal index",
        value: params.proposal.to_string(),
        reason: "is not a proposal on this ballot",
    };
    let index = params.proposal.as_u64().ok_or_else(not_a_proposal)?;

    run.advance(Stage::ReadingContext)?;
    let preflight = op.preflight().await?;
    let proposal = op
        .verifier()
        .proposal(params.ballot, ballot, index)
        .await
        .map_err(|e| {
            if e.is_revert() {
                FlowError::Input(not_a_proposal())
            } else {
                FlowError::from_read(e)
            }
        })?;

    let request = WriteRequest::Call(ContractCall::new(
        params.ballot,
        ballot,
        "vote",
        vec![params.proposal.into(), params.amount.into()],
    ));
    let summary = format!(
        "{}\nConfirm cast {} to {}",
        preflight.describe(op.network()),
        params.amount,
        proposal.name
    );

    let receipt = op.execute(run, confirmer, &summary, &request).await?;

    let proposals = op.verifier().proposals(params.ballot, ballot, None).await;
    let headline = format!(
        "[{}] {} votes for proposal {} ({}) on {}",
        Action::Vote.past_tense(),
        params.amount,
        index,
        proposal.name,
        params.ballot.cropped()
    );
    Ok(
        RunReport::new(Action::Vote, op.network(), preflight, &receipt, headline)
            .with_check(ViewCheck::from_result("proposals", proposals)),
    )
}
