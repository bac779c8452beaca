//! JSON-RPC 2.0 over HTTP(S).

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::LedgerError;

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC error code nodes use for `execution reverted`.
const EXECUTION_REVERTED: i64 = 3;

/// HTTP client bound to one node endpoint.
///
/// The URL may embed a provider API key, so it is never logged.
pub struct JsonRpcTransport {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl JsonRpcTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LedgerError::Unavailable(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Send one request and deserialize its `result`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, id, "rpc request");

        let response = self.http.post(&self.url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                LedgerError::Unavailable(format!("{method} timed out"))
            } else if e.is_connect() {
                LedgerError::Unavailable(format!("{method}: connection failed"))
            } else {
                LedgerError::Unavailable(format!("{method}: {}", e.without_url()))
            }
        })?;

        if !response.status().is_success() {
            return Err(LedgerError::Unavailable(format!(
                "{method}: HTTP status {}",
                response.status()
            )));
        }

        let envelope: RpcResponse = response.json().await.map_err(|e| {
            LedgerError::InvalidResponse(format!("{method}: {}", e.without_url()))
        })?;
        interpret(method, envelope)
    }
}

fn interpret<T: DeserializeOwned>(method: &str, envelope: RpcResponse) -> Result<T, LedgerError> {
    if let Some(err) = envelope.error {
        tracing::debug!(method, code = err.code, message = %err.message, "rpc error");
        if err.code == EXECUTION_REVERTED || err.message.contains("revert") {
            let detail = match err.data {
                Some(serde_json::Value::String(data)) => format!("{} ({data})", err.message),
                _ => err.message,
            };
            return Err(LedgerError::Reverted(detail));
        }
        return Err(LedgerError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    let result = envelope.result.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result)
        .map_err(|e| LedgerError::InvalidResponse(format!("{method}: {e}")))
}
