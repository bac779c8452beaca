//! Signs write requests locally and broadcasts them with `eth_sendRawTransaction`.

use serde_json::json;
use std::sync::Arc;

use ballot_types::{Address, Timestamp, TxHash, U256};

use crate::error::LedgerError;
use crate::hexnum;
use crate::receipt::{PendingTransaction, TxTarget};
use crate::request::WriteRequest;
use crate::signer::{LegacyTransaction, LocalSigner};
use crate::transport::JsonRpcTransport;
use crate::TransactionSubmitter;

/// Headroom added on top of `eth_estimateGas`, in percent.
const GAS_MARGIN_PERCENT: u64 = 20;

/// Gas limit for an estimate; saturates rather than wrapping on absurd values.
fn with_margin(gas: u64) -> u64 {
    gas.saturating_add(gas.saturating_mul(GAS_MARGIN_PERCENT) / 100)
}

pub struct SigningSubmitter {
    transport: Arc<JsonRpcTransport>,
    signer: LocalSigner,
    chain_id: u64,
}

impl SigningSubmitter {
    pub fn new(transport: Arc<JsonRpcTransport>, signer: LocalSigner, chain_id: u64) -> Self {
        Self {
            transport,
            signer,
            chain_id,
        }
    }

    async fn pending_nonce(&self) -> Result<u64, LedgerError> {
        let count: String = self
            .transport
            .request(
                "eth_getTransactionCount",
                json!([self.signer.address().to_string(), "pending"]),
            )
            .await?;
        hexnum::parse_u64(&count)
    }

    async fn gas_price(&self) -> Result<u128, LedgerError> {
        let price: String = self.transport.request("eth_gasPrice", json!([])).await?;
        hexnum::parse_u128(&price)
    }

    async fn estimate_gas(&self, to: Option<Address>, data: &[u8]) -> Result<u64, LedgerError> {
        let mut call = json!({
            "from": self.signer.address().to_string(),
            "data": hexnum::encode_data(data),
        });
        if let Some(to) = to {
            call["to"] = json!(to.to_string());
        }
        let estimate: String = self
            .transport
            .request("eth_estimateGas", json!([call]))
            .await
            .map_err(|e| match e {
                LedgerError::Reverted(detail) | LedgerError::Rpc { message: detail, .. } => {
                    LedgerError::Rejected(format!("gas estimation failed: {detail}"))
                }
                other => other,
            })?;
        let gas = hexnum::parse_u64(&estimate)?;
        Ok(with_margin(gas))
    }
}

impl TransactionSubmitter for SigningSubmitter {
    fn sender(&self) -> Address {
        self.signer.address()
    }

    async fn submit(&self, request: &WriteRequest<'_>) -> Result<PendingTransaction, LedgerError> {
        let (to, data) = request.encode()?;

        let nonce = self.pending_nonce().await?;
        let gas_price = self.gas_price().await?;
        let gas_limit = self.estimate_gas(to, &data).await?;

        let tx = LegacyTransaction {
            nonce,
            gas_price,
            gas_limit,
            to,
            value: U256::ZERO,
            data,
            chain_id: self.chain_id,
        };
        let raw = self.signer.sign(&tx)?;

        let hash: String = self
            .transport
            .request("eth_sendRawTransaction", json!([hexnum::encode_data(&raw)]))
            .await
            .map_err(|e| match e {
                LedgerError::Rpc { code, message } => {
                    LedgerError::Rejected(format!("{message} (code {code})"))
                }
                LedgerError::Reverted(detail) => LedgerError::Rejected(detail),
                other => other,
            })?;
        let hash: TxHash = hash
            .parse()
            .map_err(|e| LedgerError::InvalidResponse(format!("{e}")))?;

        tracing::info!(
            %hash,
            nonce,
            gas_limit,
            gas_price = %gas_price,
            action = %request.describe(),
            "transaction submitted"
        );

        let target = match request {
            WriteRequest::Deploy { interface, .. } => TxTarget::Deployment {
                contract: interface.name().to_string(),
            },
            WriteRequest::Call(call) => TxTarget::Call {
                to: call.contract,
                function: call.function.clone(),
            },
        };
        Ok(PendingTransaction {
            hash,
            submitted_at: Timestamp::now(),
            target,
            from: self.signer.address(),
            nonce,
        })
    }
}
