//! Minting tokens to an account.

use ballot_abi::ContractInterface;
use ballot_rpc::{ContractCall, LedgerClient, TransactionSubmitter, WriteRequest};

use crate::confirm::Confirmer;
use crate::error::FlowError;
use crate::flow::{Action, FlowRun, Stage};
use crate::operator::Operator;
use crate::params::validate_mint;
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
    let params = validate_mint(args)?;

    run.advance(Stage::ReadingContext)?;
    let preflight = op.preflight().await?;

    let request = WriteRequest::Call(ContractCall::new(
        params.token,
        token,
        "mint",
        vec![params.to.into(), params.amount.into()],
    ));
    let summary = format!(
        "{}\nConfirm minting {} decimal units of {} to {}",
        preflight.describe(op.network()),
        params.amount,
        params.token.cropped(),
        params.to
    );

    let receipt = op.execute(run, confirmer, &summary, &request).await?;

    let balance = op
        .verifier()
        .token_balance(params.token, token, params.to)
        .await;
    let headline = format!(
        "[{}] {} decimal units to account {}",
        Action::Mint.past_tense(),
        params.amount,
        params.to.cropped()
    );
    Ok(
        RunReport::new(Action::Mint, op.network(), preflight, &receipt, headline)
            .with_check(ViewCheck::from_result("recipient balance", balance)),
    )
}
