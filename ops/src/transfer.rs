//! Transferring tokens from the signer.

use ballot_abi::ContractInterface;
use ballot_rpc::{ContractCall, LedgerClient, TransactionSubmitter, WriteRequest};

use crate::confirm::Confirmer;
use crate::error::FlowError;
use crate::flow::{Action, FlowRun, Stage};
use crate::operator::Operator;
use crate::params::validate_transfer;
use crate::report::RunReport;
use crate::verify::ViewCheck;

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
    let params = validate_transfer(args)?;

    run.advance(Stage::ReadingContext)?;
    let preflight = op.preflight().await?;

    let request = WriteRequest::Call(ContractCall::new(
        params.token,
        token,
        "transfer",
        vec![params.to.into(), params.amount.into()],
    ));
    let summary = format!(
        "{}\nConfirm transferring {} decimal units of {} from {} to {}",
        preflight.describe(op.network()),
        params.amount,
        params.token.cropped(),
        preflight.signer,
        params.to
    );

    let receipt = op.execute(run, confirmer, &summary, &request).await?;

    let verifier = op.verifier();
    let recipient = verifier.token_balance(params.token, token, params.to).await;
    let sender = verifier
        .token_balance(params.token, token, preflight.signer)
        .await;
    let headline = format!(
        "[{}] {} decimal units to account {}",
        Action::Transfer.past_tense(),
        params.amount,
        params.to.cropped()
    );
    Ok(
        RunReport::new(Action::Transfer, op.network(), preflight, &receipt, headline)
            .with_check(ViewCheck::from_result("recipient balance", recipient))
            .with_check(ViewCheck::from_result("sender balance", sender)),
    )
}
