//! JSON-RPC implementation of [`LedgerClient`].

use serde_json::json;
use std::sync::Arc;

use ballot_abi::AbiValue;
use ballot_types::{Address, TxHash, U256};

use crate::error::LedgerError;
use crate::hexnum;
use crate::receipt::{Receipt, WireReceipt};
use crate::request::ContractCall;
use crate::transport::JsonRpcTransport;
use crate::LedgerClient;

#[derive(Clone)]
pub struct HttpLedger {
    transport: Arc<JsonRpcTransport>,
}

impl HttpLedger {
    pub fn new(transport: Arc<JsonRpcTransport>) -> Self {
        Self { transport }
    }
}

impl LedgerClient for HttpLedger {
    async fn current_height(&self) -> Result<u64, LedgerError> {
        let height: String = self.transport.request("eth_blockNumber", json!([])).await?;
        hexnum::parse_u64(&height)
    }

    async fn account_balance(&self, account: &Address) -> Result<U256, LedgerError> {
        let balance: String = self
            .transport
            .request("eth_getBalance", json!([account.to_string(), "latest"]))
            .await?;
        hexnum::parse_u256(&balance)
    }

    async fn call_view(&self, call: &ContractCall<'_>) -> Result<Vec<AbiValue>, LedgerError> {
        let function = call.interface.function(&call.function)?;
        let data = function.encode_call(&call.args)?;

        let result: String = self
            .transport
            .request(
                "eth_call",
                json!([
                    { "to": call.contract.to_string(), "data": hexnum::encode_data(&data) },
                    "latest"
                ]),
            )
            .await?;
        let bytes = hexnum::parse_data(&result)?;

        if bytes.is_empty() && !function.outputs.is_empty() {
            return Err(LedgerError::InvalidResponse(format!(
                "{} returned no data; is {} a {} contract?",
                call.function,
                call.contract,
                call.interface.name()
            )));
        }
        function
            .decode_output(&bytes)
            .map_err(|e| LedgerError::InvalidResponse(format!("{}: {e}", call.function)))
    }

    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<Receipt>, LedgerError> {
        let wire: Option<WireReceipt> = self
            .transport
            .request("eth_getTransactionReceipt", json!([hash.to_string()]))
            .await?;
        wire.map(Receipt::try_from).transpose()
    }
}
