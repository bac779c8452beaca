//! Nullable ledger: scripted reads, recorded writes.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use ballot_abi::AbiValue;
use ballot_rpc::{
    ContractCall, LedgerClient, LedgerError, PendingTransaction, Receipt, TransactionSubmitter,
    TxTarget, WriteRequest,
};
use ballot_types::{Address, Timestamp, TxHash, U256};

use crate::script::ReceiptScript;

/// A view call as the ledger received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewQuery {
    pub contract: Address,
    pub interface: String,
    pub function: String,
    pub args: Vec<AbiValue>,
}

impl ViewQuery {
    /// First argument as an integer, for index-style lookups.
    pub fn uint_arg(&self) -> Option<u64> {
        self.args.first()?.as_uint()?.try_into().ok()
    }

    /// First argument as an address, for account-style lookups.
    pub fn address_arg(&self) -> Option<Address> {
        self.args.first()?.as_address()
    }
}

/// A write the ledger was asked to make.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedWrite {
    pub hash: TxHash,
    pub nonce: u64,
    /// `None` for contract creation.
    pub to: Option<Address>,
    /// `None` for contract creation.
    pub function: Option<String>,
    pub args: Vec<AbiValue>,
    /// Exact transaction payload.
    pub data: Vec<u8>,
}

struct InFlight {
    script: ReceiptScript,
    receipt: Receipt,
}

type ViewResponder = Box<dyn Fn(&ViewQuery) -> Result<Vec<AbiValue>, LedgerError>>;

/// An in-memory ledger that is both reader and submitter.
pub struct NullLedger {
    signer: Address,
    height: Cell<u64>,
    balances: RefCell<HashMap<Address, U256>>,
    responder: RefCell<Option<ViewResponder>>,
    views: RefCell<Vec<ViewQuery>>,
    scripts: RefCell<VecDeque<ReceiptScript>>,
    in_flight: RefCell<HashMap<TxHash, InFlight>>,
    submitted: RefCell<Vec<SubmittedWrite>>,
    reject_next: RefCell<Option<LedgerError>>,
    offline: Cell<bool>,
    receipt_lookups: Cell<u32>,
}

impl NullLedger {
    pub fn new(signer: Address) -> Self {
        Self {
            signer,
            height: Cell::new(100),
            balances: RefCell::new(HashMap::new()),
            responder: RefCell::new(None),
            views: RefCell::new(Vec::new()),
            scripts: RefCell::new(VecDeque::new()),
            in_flight: RefCell::new(HashMap::new()),
            submitted: RefCell::new(Vec::new()),
            reject_next: RefCell::new(None),
            offline: Cell::new(false),
            receipt_lookups: Cell::new(0),
        }
    }

    pub fn set_height(&self, height: u64) {
        self.height.set(height);
    }

    pub fn set_balance(&self, account: Address, wei: U256) {
        self.balances.borrow_mut().insert(account, wei);
    }

    /// Answer view calls with `responder`. Without one, every view reverts.
    pub fn on_view(&self, responder: impl Fn(&ViewQuery) -> Result<Vec<AbiValue>, LedgerError> + 'static) {
        *self.responder.borrow_mut() = Some(Box::new(responder));
    }

    /// Script how the next submitted transaction resolves.
    pub fn script_next(&self, script: ReceiptScript) {
        self.scripts.borrow_mut().push_back(script);
    }

    /// Fail the next submission with `error`.
    pub fn reject_next(&self, error: LedgerError) {
        *self.reject_next.borrow_mut() = Some(error);
    }

    /// Make every call fail as if the node were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// All writes submitted so far (for assertions).
    pub fn submitted(&self) -> Vec<SubmittedWrite> {
        self.submitted.borrow().clone()
    }

    /// All view calls made so far (for assertions).
    pub fn views(&self) -> Vec<ViewQuery> {
        self.views.borrow().clone()
    }

    pub fn receipt_lookups(&self) -> u32 {
        self.receipt_lookups.get()
    }

    /// Address a deployment with this nonce receives.
    pub fn deployment_address(nonce: u64) -> Address {
        let mut bytes = [0xc0u8; 20];
        bytes[12..].copy_from_slice(&nonce.to_be_bytes());
        Address::new(bytes)
    }

    fn check_online(&self) -> Result<(), LedgerError> {
        if self.offline.get() {
            Err(LedgerError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn hash_for(nonce: u64) -> TxHash {
        let mut bytes = [0xabu8; 32];
        bytes[24..].copy_from_slice(&nonce.to_be_bytes());
        TxHash::new(bytes)
    }
}

impl LedgerClient for NullLedger {
    async fn current_height(&self) -> Result<u64, LedgerError> {
        self.check_online()?;
        Ok(self.height.get())
    }

    async fn account_balance(&self, account: &Address) -> Result<U256, LedgerError> {
        self.check_online()?;
        Ok(self
            .balances
            .borrow()
            .get(account)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn call_view(&self, call: &ContractCall<'_>) -> Result<Vec<AbiValue>, LedgerError> {
        self.check_online()?;
        // same encoding path as the real client, so interface errors match
        call.calldata()?;
        let query = ViewQuery {
            contract: call.contract,
            interface: call.interface.name().to_string(),
            function: call.function.clone(),
            args: call.args.clone(),
        };
        self.views.borrow_mut().push(query.clone());
        match self.responder.borrow().as_ref() {
            Some(responder) => responder(&query),
            None => Err(LedgerError::Reverted("no view scripted".to_string())),
        }
    }

    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<Receipt>, LedgerError> {
        self.receipt_lookups.set(self.receipt_lookups.get() + 1);
        self.check_online()?;
        let mut in_flight = self.in_flight.borrow_mut();
        let Some(entry) = in_flight.get_mut(hash) else {
            return Ok(None);
        };
        if entry.script.lookup_errors > 0 {
            entry.script.lookup_errors -= 1;
            return Err(LedgerError::Unavailable("connection reset".to_string()));
        }
        if entry.script.pending_polls > 0 {
            entry.script.pending_polls -= 1;
            return Ok(None);
        }
        Ok(Some(entry.receipt.clone()))
    }
}

impl TransactionSubmitter for NullLedger {
    fn sender(&self) -> Address {
        self.signer
    }

    async fn submit(&self, request: &WriteRequest<'_>) -> Result<PendingTransaction, LedgerError> {
        self.check_online()?;
        if let Some(error) = self.reject_next.borrow_mut().take() {
            return Err(error);
        }
        let (to, data) = request.encode()?;

        let nonce = self.submitted.borrow().len() as u64;
        let hash = Self::hash_for(nonce);
        let script = self.scripts.borrow_mut().pop_front().unwrap_or_default();

        let (target, function) = match request {
            WriteRequest::Deploy { interface, .. } => (
                TxTarget::Deployment {
                    contract: interface.name().to_string(),
                },
                None,
            ),
            WriteRequest::Call(call) => (
                TxTarget::Call {
                    to: call.contract,
                    function: call.function.clone(),
                },
                Some(call.function.clone()),
            ),
        };
        let contract_address = (target.is_deployment() && !script.omit_contract_address)
            .then(|| Self::deployment_address(nonce));

        let receipt = Receipt {
            transaction_hash: hash,
            block_number: self.height.get() + 1,
            contract_address,
            status: script.status,
            gas_used: script.gas_used,
        };
        self.in_flight
            .borrow_mut()
            .insert(hash, InFlight { script, receipt });
        self.submitted.borrow_mut().push(SubmittedWrite {
            hash,
            nonce,
            to,
            function,
            args: request.args().to_vec(),
            data,
        });

        Ok(PendingTransaction {
            hash,
            submitted_at: Timestamp::now(),
            target,
            from: self.signer,
            nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::token_interface;
    use ballot_rpc::TxStatus;

    fn signer() -> Address {
        Address::new([0x11; 20])
    }

    #[tokio::test]
    async fn submissions_are_recorded_in_order() {
        let ledger = NullLedger::new(signer());
        let token = token_interface();
        let to = Address::new([0x22; 20]);
        for amount in [5u64, 7] {
            let request = WriteRequest::Call(ContractCall::new(
                Address::new([0x33; 20]),
                &token,
                "mint",
                vec![to.into(), amount.into()],
            ));
            ledger.submit(&request).await.unwrap();
        }
        let writes = ledger.submitted();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].nonce, 0);
        assert_eq!(writes[1].args[1], AbiValue::from(7u64));
        assert_eq!(writes[0].function.as_deref(), Some("mint"));
        assert_eq!(&writes[0].data[..4], &[0x40, 0xc1, 0x0f, 0x19]);
    }

    #[tokio::test]
    async fn receipt_follows_script() {
        let ledger = NullLedger::new(signer());
        ledger.script_next(ReceiptScript::reverted().after_polls(2).with_lookup_errors(1));
        let token = token_interface();
        let request = WriteRequest::Call(ContractCall::new(
            Address::new([0x33; 20]),
            &token,
            "delegate",
            vec![signer().into()],
        ));
        let pending = ledger.submit(&request).await.unwrap();

        assert!(ledger.transaction_receipt(&pending.hash).await.is_err());
        assert_eq!(ledger.transaction_receipt(&pending.hash).await.unwrap(), None);
        assert_eq!(ledger.transaction_receipt(&pending.hash).await.unwrap(), None);
        let receipt = ledger.transaction_receipt(&pending.hash).await.unwrap().unwrap();
        assert_eq!(receipt.status, TxStatus::Failure);
        assert_eq!(ledger.receipt_lookups(), 4);
    }

    #[tokio::test]
    async fn unknown_functions_fail_before_recording() {
        let ledger = NullLedger::new(signer());
        let token = token_interface();
        let call = ContractCall::new(Address::new([0x33; 20]), &token, "proposals", vec![0u64.into()]);
        assert!(matches!(
            ledger.call_view(&call).await,
            Err(LedgerError::Interface(_))
        ));
        assert!(ledger.views().is_empty());
    }

    #[tokio::test]
    async fn offline_ledger_refuses_everything() {
        let ledger = NullLedger::new(signer());
        ledger.set_offline(true);
        assert!(matches!(
            ledger.current_height().await,
            Err(LedgerError::Unavailable(_))
        ));
    }
}
