//! Ledger boundary for the tokenized ballot toolkit.
//!
//! Two capabilities are exposed as traits so orchestration code never talks
//! to the network directly:
//! - [`LedgerClient`]: read-only queries (height, balance, view calls, receipts).
//! - [`TransactionSubmitter`]: sign and submit exactly one state change,
//!   returning a [`PendingTransaction`] without waiting for inclusion.
//!
//! [`HttpLedger`] and [`SigningSubmitter`] implement them over JSON-RPC.

pub mod client;
pub mod config;
pub mod error;
pub mod hexnum;
pub mod receipt;
pub mod request;
pub mod signer;
pub mod submitter;
pub mod transport;

pub use client::HttpLedger;
pub use config::{ClientConfig, ClientSettings, ConfigError};
pub use error::LedgerError;
pub use receipt::{PendingTransaction, Receipt, TxStatus, TxTarget};
pub use request::{ContractCall, WriteRequest};
pub use signer::{LegacyTransaction, LocalSigner};
pub use submitter::SigningSubmitter;
pub use transport::JsonRpcTransport;

use ballot_abi::AbiValue;
use ballot_types::{Address, TxHash, U256};

/// Read capability over the remote ledger.
#[allow(async_fn_in_trait)]
pub trait LedgerClient {
    /// Latest block number.
    async fn current_height(&self) -> Result<u64, LedgerError>;

    /// Native-currency balance in wei.
    async fn account_balance(&self, account: &Address) -> Result<U256, LedgerError>;

    /// Execute a non-mutating contract function and decode its return values.
    async fn call_view(&self, call: &ContractCall<'_>) -> Result<Vec<AbiValue>, LedgerError>;

    /// Receipt of an included transaction; `None` while it is still pending.
    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<Receipt>, LedgerError>;
}

/// Write capability: one signed state change per call.
#[allow(async_fn_in_trait)]
pub trait TransactionSubmitter {
    /// Account that signs submitted transactions.
    fn sender(&self) -> Address;

    /// Sign and submit `request`. Returns as soon as the ledger accepts it
    /// into its pending pool.
    async fn submit(&self, request: &WriteRequest<'_>) -> Result<PendingTransaction, LedgerError>;
}

/// Connect to the configured network: builds the transport, checks the
/// node's chain id against the configuration, and returns both capabilities.
pub async fn connect(config: &ClientConfig) -> Result<(HttpLedger, SigningSubmitter), LedgerError> {
    let transport = std::sync::Arc::new(JsonRpcTransport::new(
        config.rpc_url(),
        config.request_timeout(),
    )?);

    let remote_chain = hexnum::parse_u64(&transport.request::<String>("eth_chainId", serde_json::json!([])).await?)?;
    let expected = config.network().chain_id();
    if remote_chain != expected {
        return Err(LedgerError::Unavailable(format!(
            "node reports chain id {remote_chain}, {} expects {expected}",
            config.network().as_str()
        )));
    }

    let signer = LocalSigner::new(config.private_key())?;
    tracing::info!(
        network = config.network().as_str(),
        chain_id = expected,
        signer = %signer.address(),
        "connected to ledger"
    );
    let ledger = HttpLedger::new(transport.clone());
    let submitter = SigningSubmitter::new(transport, signer, expected);
    Ok((ledger, submitter))
}
