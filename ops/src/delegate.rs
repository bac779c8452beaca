//! Delegating token voting power.

use ballot_abi::ContractInterface;
use ballot_rpc::{ContractCall, LedgerClient, TransactionSubmitter, WriteRequest};

use crate::confirm::Confirmer;
use crate::error::FlowError;
use crate::flow::{Action, FlowRun, Stage};
use crate::operator::Operator;
use crate::params::validate_delegate;
use crate::report::RunReport;
use crate::verify::{ContractView, ViewCheck};

pub(crate) async fn run<L, S, C>(
    op: &Operator<'_, L, S>,
    run: &mut FlowRun,
    args: &[String],
    token: &ContractInterface,
    confirmer: &mut C,
) -> Result<RunReport, FlowError>
where
    L: LedgerClient,
    S: TransactionSubmitter,
    C: Confirmer,
{
    let params = validate_delegate(args)?;

    run.advance(Stage::ReadingContext)?;
    let preflight = op.preflight().await?;
    let delegatee = params.delegatee_or(preflight.signer);
    let before = op
        .verifier()
        .voting_power(params.token, token, delegatee)
        .await
        .map_err(FlowError::from_read)?;
    let current = match &before {
        ContractView::VotingPower { votes, .. } => votes.to_string(),
        other => other.to_string(),
    };

    let request = WriteRequest::Call(ContractCall::new(
        params.token,
        token,
        "delegate",
        vec![delegatee.into()],
    ));
    let summary = format!(
        "{}\nConfirm delegating the voting power of {} to {} (currently {} units)",
        preflight.describe(op.network()),
        preflight.signer,
        delegatee,
        current
    );

    let receipt = op.execute(run, confirmer, &summary, &request).await?;

    let after = op
        .verifier()
        .voting_power(params.token, token, delegatee)
        .await;
    let headline = format!(
        "[{}] voting power of {} to {}",
        Action::Delegate.past_tense(),
        preflight.signer.cropped(),
        delegatee.cropped()
    );
    Ok(
        RunReport::new(Action::Delegate, op.network(), preflight, &receipt, headline)
            .with_check(ViewCheck::from_result("delegatee voting power", after)),
    )
}
