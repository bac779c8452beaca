//! Entry points for the five operator actions.

use ballot_abi::ContractInterface;
use ballot_rpc::{LedgerClient, Receipt, TransactionSubmitter, WriteRequest};
use ballot_types::{Address, NetworkId, U256};
use ballot_utils::format_ether;

use crate::confirm::Confirmer;
use crate::error::FlowError;
use crate::flow::{Action, FlowRun, Stage};
use crate::report::RunReport;
use crate::verify::PostActionVerifier;
use crate::wait::{ConfirmationWaiter, WaitPolicy};
use crate::{delegate, deploy, mint, transfer, vote};

/// Signer context read before every write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preflight {
    pub height: u64,
    pub signer: Address,
    pub balance: U256,
}

impl Preflight {
    pub fn describe(&self, network: NetworkId) -> String {
        format!(
            "Last block {} on {}, signing as {} with {} {}",
            self.height,
            network.as_str(),
            self.signer,
            format_ether(self.balance),
            network.native_symbol()
        )
    }
}

/// Runs operator actions against one ledger with one signer.
pub struct Operator<'a, L, S> {
    ledger: &'a L,
    submitter: &'a S,
    network: NetworkId,
    policy: WaitPolicy,
}

impl<'a, L, S> Operator<'a, L, S>
where
    L: LedgerClient,
    S: TransactionSubmitter,
{
    pub fn new(ledger: &'a L, submitter: &'a S, network: NetworkId, policy: WaitPolicy) -> Self {
        Self {
            ledger,
            submitter,
            network,
            policy,
        }
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn verifier(&self) -> PostActionVerifier<'a, L> {
        PostActionVerifier::new(self.ledger)
    }

    /// Deploy a ballot: `NAME... TOKEN DURATION`.
    pub async fn deploy<C: Confirmer>(
        &self,
        args: &[String],
        ballot: &ContractInterface,
        token: &ContractInterface,
        mut confirmer: C,
    ) -> Result<RunReport, FlowError> {
        let mut run = FlowRun::start(Action::Deploy);
        let result = deploy::run(self, &mut run, args, ballot, token, &mut confirmer).await;
        conclude(run, result)
    }

    /// Cast votes: `BALLOT INDEX AMOUNT`.
    pub async fn vote<C: Confirmer>(
        &self,
        args: &[String],
        ballot: &ContractInterface,
        mut confirmer: C,
    ) -> Result<RunReport, FlowError> {
        let mut run = FlowRun::start(Action::Vote);
        let result = vote::run(self, &mut run, args, ballot, &mut confirmer).await;
        conclude(run, result)
    }

    /// Mint tokens: `TOKEN TO AMOUNT`.
    pub async fn mint<C: Confirmer>(
        &self,
        args: &[String],
        token: &ContractInterface,
        mut confirmer: C,
    ) -> Result<RunReport, FlowError> {
        let mut run = FlowRun::start(Action::Mint);
        let result = mint::run(self, &mut run, args, token, &mut confirmer).await;
        conclude(run, result)
    }

    /// Transfer tokens: `TOKEN TO AMOUNT`.
    pub async fn transfer<C: Confirmer>(
        &self,
        args: &[String],
        token: &ContractInterface,
        mut confirmer: C,
    ) -> Result<RunReport, FlowError> {
        let mut run = FlowRun::start(Action::Transfer);
        let result = transfer::run(self, &mut run, args, token, &mut confirmer).await;
        conclude(run, result)
    }

    /// Delegate voting power: `TOKEN [DELEGATEE]`.
    pub async fn delegate<C: Confirmer>(
        &self,
        args: &[String],
        token: &ContractInterface,
        mut confirmer: C,
    ) -> Result<RunReport, FlowError> {
        let mut run = FlowRun::start(Action::Delegate);
        let result = delegate::run(self, &mut run, args, token, &mut confirmer).await;
        conclude(run, result)
    }

    pub(crate) async fn preflight(&self) -> Result<Preflight, FlowError> {
        let height = self
            .ledger
            .current_height()
            .await
            .map_err(FlowError::from_read)?;
        let signer = self.submitter.sender();
        let balance = self
            .ledger
            .account_balance(&signer)
            .await
            .map_err(FlowError::from_read)?;
        tracing::info!(
            height,
            %signer,
            balance = %format_ether(balance),
            symbol = self.network.native_symbol(),
            "signer context"
        );
        Ok(Preflight {
            height,
            signer,
            balance,
        })
    }

    /// Prompt, submit, and wait for one write. Returns the successful
    /// receipt with the run positioned at [`Stage::Verifying`].
    pub(crate) async fn execute<C: Confirmer>(
        &self,
        run: &mut FlowRun,
        confirmer: &mut C,
        summary: &str,
        request: &WriteRequest<'_>,
    ) -> Result<Receipt, FlowError> {
        // surface interface mismatches before the operator is asked anything
        request.encode()?;

        run.advance(Stage::AwaitingConfirmation)?;
        if !confirmer.confirm(summary).await? {
            tracing::info!(action = %run.action(), "operator declined");
            return Err(FlowError::OperatorCancelled);
        }

        run.advance(Stage::Submitting)?;
        let pending = self
            .submitter
            .submit(request)
            .await
            .map_err(|e| FlowError::from_submit(e, &request.invocation()))?;

        run.advance(Stage::AwaitingLedgerConfirmation)?;
        let receipt = ConfirmationWaiter::new(self.ledger, self.policy.clone())
            .wait(pending)
            .await?
            .into_receipt()?;

        run.advance(Stage::Verifying)?;
        Ok(receipt)
    }
}

fn conclude(mut run: FlowRun, result: Result<RunReport, FlowError>) -> Result<RunReport, FlowError> {
    run.finish(&result);
    result.map(|mut report| {
        report.stages = run.into_history();
        report
    })
}
