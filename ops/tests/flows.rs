use std::time::Duration;

use ballot_abi::{AbiError, AbiValue, ContractInterface};
use ballot_nullables::{ballot_interface, token_interface, NullLedger, ReceiptScript, ViewQuery};
use ballot_ops::{
    AutoConfirm, ContractView, FlowError, LineConfirmer, Operator, ProposalView, Stage, ViewCheck, WaitPolicy,
};
use ballot_rpc::{LedgerError, TxTarget};
use ballot_types::{Address, NetworkId, ProposalName, U256};

const TOKEN: &str = "0x2b16a4d5c0c4c5b39a4a5cd3cb1d1ce3d1e27983";
const BALLOT: &str = "0x9f3c0e5d1a2b4c6d8e0f1a2b3c4d5e6f7a8b9c0d";
const ALICE: &str = "0x5aa7fb0f965572a5639a84eeecf34bfd9068d58c";

fn signer() -> Address {
    "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf".parse().unwrap()
}

fn addr(s: &str) -> Address {
    s.parse().unwrap()
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn policy() -> WaitPolicy {
    WaitPolicy {
        timeout_secs: 30,
        initial_poll_ms: 10,
        max_poll_ms: 100,
    }
}

fn operator(ledger: &NullLedger) -> Operator<'_, NullLedger, NullLedger> {
    Operator::new(ledger, ledger, NetworkId::Sepolia, policy())
}

fn answering(answer: &'static str) -> LineConfirmer<&'static [u8], Vec<u8>> {
    LineConfirmer::new(answer.as_bytes(), Vec::new())
}

/// Ballot with `names`, each carrying `votes[i]`; tokens answer from fixed tables.
fn scripted_ledger(names: &'static [&'static str], votes: &'static [u64]) -> NullLedger {
    let ledger = NullLedger::new(signer());
    ledger.set_balance(signer(), U256::from(1_500_000_000_000_000_000u64));
    ledger.on_view(move |q: &ViewQuery| match q.function.as_str() {
        "proposals" => {
            let index = q.uint_arg().unwrap_or(u64::MAX) as usize;
            match names.get(index) {
                Some(name) => Ok(vec![
                    AbiValue::from(&ProposalName::new(*name).unwrap()),
                    AbiValue::from(votes.get(index).copied().unwrap_or(0)),
                ]),
                None => Err(LedgerError::Reverted("index out of bounds".into())),
            }
        }
        "getVotes" => Ok(vec![AbiValue::from(42u64)]),
        "balanceOf" => Ok(vec![AbiValue::from(1000u64)]),
        other => Err(LedgerError::Reverted(format!("unexpected view {other}"))),
    });
    ledger
}

fn proposal_names(check: &ViewCheck) -> Vec<String> {
    match check {
        ViewCheck::Read(ContractView::Proposals(list)) => {
            list.iter().map(|p| p.name.clone()).collect()
        }
        other => panic!("expected proposals, got {other:?}"),
    }
}

#[tokio::test]
async fn deploy_lists_proposals_in_order() {
    let ledger = scripted_ledger(&["Alpha", "Beta", "Gamma"], &[]);
    ledger.set_height(100);
    let (ballot, token) = (ballot_interface(), token_interface());

    let report = operator(&ledger)
        .deploy(
            &args(&["Alpha", "Beta", "Gamma", TOKEN, "10"]),
            &ballot,
            &token,
            answering("\n"),
        )
        .await
        .unwrap();

    let deployed = NullLedger::deployment_address(0);
    assert_eq!(report.deployed, Some(deployed));
    assert_eq!(proposal_names(&report.checks[0]), ["Alpha", "Beta", "Gamma"]);
    assert_eq!(
        report.checks[1],
        ViewCheck::Read(ContractView::VotingPower {
            account: signer(),
            votes: U256::from(42u64)
        })
    );
    assert_eq!(report.stages.last(), Some(&Stage::Done));
    assert!(report.headline.starts_with("[Deployed] TokenizedBallot at "));

    let writes = ledger.submitted();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].to, None);
    assert_eq!(writes[0].args[1], AbiValue::from(addr(TOKEN)));
    // snapshot block = current height + duration
    assert_eq!(writes[0].args[2], AbiValue::from(110u64));

    let proposal_reads: Vec<_> = ledger
        .views()
        .into_iter()
        .filter(|q| q.function == "proposals")
        .collect();
    assert_eq!(proposal_reads.len(), 3);
    assert!(proposal_reads.iter().all(|q| q.contract == deployed));
}

#[tokio::test]
async fn deploy_prompt_shows_signer_context() {
    let ledger = scripted_ledger(&["Yes", "No"], &[]);
    let (ballot, token) = (ballot_interface(), token_interface());
    let mut confirmer = answering("n\n");

    let err = operator(&ledger)
        .deploy(&args(&["Yes", "No", TOKEN, "5"]), &ballot, &token, &mut confirmer)
        .await
        .unwrap_err();
    assert!(err.is_cancellation());

    let (_, written) = confirmer.into_parts();
    let prompt = String::from_utf8(written).unwrap();
    assert!(prompt.contains("Last block 100 on sepolia"));
    assert!(prompt.contains("1.5 ETH"));
    assert!(prompt.contains("proposals [Yes, No]"));
    assert!(prompt.ends_with("(Y/n): "));
}

#[tokio::test]
async fn declined_vote_submits_nothing() {
    let ledger = scripted_ledger(&["Alpha", "Beta"], &[]);
    let ballot = ballot_interface();
    let mut confirmer = answering("  N \n");

    let err = operator(&ledger)
        .vote(&args(&[BALLOT, "1", "100"]), &ballot, &mut confirmer)
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::OperatorCancelled));
    assert_eq!(err.exit_code(), 3);
    assert!(ledger.submitted().is_empty());
    let (_, written) = confirmer.into_parts();
    assert!(String::from_utf8(written)
        .unwrap()
        .contains("Confirm cast 100 to Beta (Y/n): "));
}

#[tokio::test]
async fn accepted_vote_reports_every_proposal() {
    let ledger = scripted_ledger(&["Alpha", "Beta", "Gamma"], &[0, 5, 2]);
    let ballot = ballot_interface();

    let report = operator(&ledger)
        .vote(&args(&[BALLOT, "1", "5"]), &ballot, answering("y\n"))
        .await
        .unwrap();

    let writes = ledger.submitted();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].to, Some(addr(BALLOT)));
    assert_eq!(writes[0].function.as_deref(), Some("vote"));
    assert_eq!(writes[0].args, vec![AbiValue::from(1u64), AbiValue::from(5u64)]);

    assert_eq!(proposal_names(&report.checks[0]), ["Alpha", "Beta", "Gamma"]);
    match &report.checks[0] {
        ViewCheck::Read(ContractView::Proposals(list)) => {
            assert_eq!(list[1].vote_count, U256::from(5u64))
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(report.headline.contains("proposal 1 (Beta)"));
}

#[tokio::test]
async fn vote_for_missing_proposal_is_rejected_before_prompt() {
    let ledger = scripted_ledger(&["Alpha"], &[]);
    let ballot = ballot_interface();
    let mut confirmer = answering("y\n");

    let err = operator(&ledger)
        .vote(&args(&[BALLOT, "9", "5"]), &ballot, &mut confirmer)
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::Input(_)));
    assert!(err.to_string().contains("proposal index"));
    assert!(ledger.submitted().is_empty());
    assert!(confirmer.into_parts().1.is_empty());
}

#[tokio::test]
async fn mint_confirms_and_reads_recipient_balance() {
    let ledger = scripted_ledger(&[], &[]);
    let token = token_interface();

    let report = operator(&ledger)
        .mint(&args(&[TOKEN, ALICE, "1000"]), &token, answering("\n"))
        .await
        .unwrap();

    assert_eq!(
        report.headline,
        "[Minted] 1000 decimal units to account 0x5aa7...d58c"
    );
    assert_eq!(
        ledger.submitted()[0].args,
        vec![AbiValue::from(addr(ALICE)), AbiValue::from(1000u64)]
    );
    assert_eq!(
        report.checks,
        vec![ViewCheck::Read(ContractView::TokenBalance {
            account: addr(ALICE),
            balance: U256::from(1000u64)
        })]
    );
    assert!(report.fully_verified());
    assert_eq!(report.block, 101);
    assert_eq!(report.preflight.signer, signer());
    let rendered = report.to_string();
    assert!(rendered.contains("confirmed in block 101"));
}

#[tokio::test]
async fn transfer_reads_both_balances() {
    let ledger = scripted_ledger(&[], &[]);
    let token = token_interface();

    let report = operator(&ledger)
        .transfer(&args(&[TOKEN, ALICE, "7"]), &token, answering("\n"))
        .await
        .unwrap();

    assert_eq!(report.checks.len(), 2);
    let accounts: Vec<_> = ledger
        .views()
        .into_iter()
        .filter(|q| q.function == "balanceOf")
        .filter_map(|q| q.address_arg())
        .collect();
    assert_eq!(accounts, vec![addr(ALICE), signer()]);
    assert_eq!(ledger.submitted()[0].function.as_deref(), Some("transfer"));
}

#[tokio::test]
async fn delegate_defaults_to_signer() {
    let ledger = scripted_ledger(&[], &[]);
    let token = token_interface();

    let report = operator(&ledger)
        .delegate(&args(&[TOKEN]), &token, answering("\n"))
        .await
        .unwrap();

    assert_eq!(ledger.submitted()[0].args, vec![AbiValue::from(signer())]);
    assert_eq!(
        report.checks,
        vec![ViewCheck::Read(ContractView::VotingPower {
            account: signer(),
            votes: U256::from(42u64)
        })]
    );
}

#[tokio::test]
async fn failed_receipt_is_reverted() {
    let ledger = scripted_ledger(&[], &[]);
    ledger.script_next(ReceiptScript::reverted().after_polls(2));
    let token = token_interface();

    let err = operator(&ledger)
        .mint(&args(&[TOKEN, ALICE, "100"]), &token, answering("\n"))
        .await
        .unwrap_err();

    match &err {
        FlowError::Reverted {
            hash,
            block,
            target,
            ..
        } => {
            assert_eq!(*hash, ledger.submitted()[0].hash);
            assert_eq!(*block, 101);
            assert_eq!(
                *target,
                TxTarget::Call {
                    to: addr(TOKEN),
                    function: "mint".into()
                }
            );
        }
        other => panic!("expected revert, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert_eq!(ledger.receipt_lookups(), 3);
}

#[tokio::test]
async fn deployment_without_address_fails() {
    let ledger = scripted_ledger(&["A"], &[]);
    ledger.script_next(ReceiptScript::success().without_contract_address());
    let (ballot, token) = (ballot_interface(), token_interface());

    let err = operator(&ledger)
        .deploy(&args(&["A", TOKEN, "3"]), &ballot, &token, answering("\n"))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::DeploymentAddressMissing { block: 101, .. }));
}

#[tokio::test(start_paused = true)]
async fn unmined_transaction_times_out() {
    let ledger = scripted_ledger(&[], &[]);
    ledger.script_next(ReceiptScript::never_mined());
    let token = token_interface();

    let err = operator(&ledger)
        .mint(&args(&[TOKEN, ALICE, "1"]), &token, answering("\n"))
        .await
        .unwrap_err();

    match &err {
        FlowError::TimedOut { waited, hash, .. } => {
            assert!(*waited >= Duration::from_secs(30));
            assert!(*waited < Duration::from_secs(31));
            assert_eq!(*hash, ledger.submitted()[0].hash);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 4);
}

#[tokio::test(start_paused = true)]
async fn transient_receipt_errors_are_retried() {
    let ledger = scripted_ledger(&[], &[]);
    ledger.script_next(ReceiptScript::success().with_lookup_errors(2).after_polls(1));
    let token = token_interface();

    let report = operator(&ledger)
        .mint(&args(&[TOKEN, ALICE, "1"]), &token, answering("\n"))
        .await
        .unwrap();

    assert_eq!(ledger.receipt_lookups(), 4);
    assert_eq!(report.transaction, ledger.submitted()[0].hash);
}

#[tokio::test]
async fn rejected_submission_is_reported() {
    let ledger = scripted_ledger(&[], &[]);
    ledger.reject_next(LedgerError::Rejected("insufficient funds for gas".into()));
    let token = token_interface();

    let err = operator(&ledger)
        .mint(&args(&[TOKEN, ALICE, "1"]), &token, answering("\n"))
        .await
        .unwrap_err();

    assert!(matches!(&err, FlowError::SubmissionRejected { reason, .. } if reason.contains("insufficient funds")));
    assert_eq!(err.transaction(), None);
}

#[tokio::test]
async fn rejected_mint_names_recipient_amount_and_token() {
    let ledger = scripted_ledger(&[], &[]);
    ledger.reject_next(LedgerError::Rejected("insufficient funds".into()));
    let token = token_interface();

    let err = operator(&ledger)
        .mint(&args(&[TOKEN, ALICE, "1000"]), &token, AutoConfirm)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains(&format!("mint({ALICE}, 1000) on {TOKEN}")), "{message}");
    assert!(message.contains("insufficient funds"), "{message}");
}

#[tokio::test]
async fn node_lost_during_submission_keeps_the_call() {
    let ledger = scripted_ledger(&[], &[]);
    ledger.reject_next(LedgerError::Unavailable("connection reset".into()));
    let token = token_interface();

    let err = operator(&ledger)
        .transfer(&args(&[TOKEN, ALICE, "25"]), &token, AutoConfirm)
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::LedgerUnavailable(_)));
    let message = err.to_string();
    assert!(message.contains(&format!("transfer({ALICE}, 25) on {TOKEN}")), "{message}");
}

#[tokio::test]
async fn unreachable_ledger_fails_before_prompt() {
    let ledger = scripted_ledger(&[], &[]);
    ledger.set_offline(true);
    let token = token_interface();
    let mut confirmer = answering("\n");

    let err = operator(&ledger)
        .mint(&args(&[TOKEN, ALICE, "1"]), &token, &mut confirmer)
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::LedgerUnavailable(_)));
    assert!(confirmer.into_parts().1.is_empty());
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_ledger() {
    let ledger = scripted_ledger(&[], &[]);
    let token = token_interface();

    let err = operator(&ledger)
        .mint(&args(&[TOKEN, "0x1234", "1"]), &token, answering("\n"))
        .await
        .unwrap_err();

    assert!(matches!(err, FlowError::Input(_)));
    assert!(ledger.views().is_empty());
    assert!(ledger.submitted().is_empty());
}

#[tokio::test]
async fn wrong_interface_is_caught_before_prompt() {
    let ledger = scripted_ledger(&["Alpha"], &[]);
    // token artifact passed where the ballot is expected
    let token = token_interface();
    let mut confirmer = answering("\n");

    let err = operator(&ledger)
        .vote(&args(&[BALLOT, "0", "1"]), &token, &mut confirmer)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Interface(AbiError::FunctionNotFound { .. })
    ));
    assert!(confirmer.into_parts().1.is_empty());
}

#[tokio::test]
async fn verification_failure_keeps_the_write() {
    let ledger = scripted_ledger(&[], &[]);
    let mint_only = ContractInterface::from_artifact_json(
        r#"{"contractName":"MintOnly","abi":[{"type":"function","name":"mint",
            "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
            "outputs":[],"stateMutability":"nonpayable"}]}"#,
        "MintOnly",
    )
    .unwrap();

    let report = operator(&ledger)
        .mint(&args(&[TOKEN, ALICE, "3"]), &mint_only, answering("\n"))
        .await
        .unwrap();

    assert_eq!(ledger.submitted().len(), 1);
    assert!(!report.fully_verified());
    assert!(report.checks[0].to_string().starts_with("Could not read recipient balance"));
}

#[tokio::test]
async fn verification_is_idempotent() {
    let ledger = scripted_ledger(&["Alpha", "Beta"], &[3, 4]);
    let ballot = ballot_interface();
    let op = operator(&ledger);
    let verifier = op.verifier();

    let first = verifier.proposals(addr(BALLOT), &ballot, None).await.unwrap();
    let second = verifier.proposals(addr(BALLOT), &ballot, None).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        ContractView::Proposals(vec![
            ProposalView {
                index: 0,
                name: "Alpha".into(),
                vote_count: U256::from(3u64)
            },
            ProposalView {
                index: 1,
                name: "Beta".into(),
                vote_count: U256::from(4u64)
            },
        ])
    );
    assert!(ledger.submitted().is_empty());
}
