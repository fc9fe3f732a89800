//! JSON-RPC 2.0 envelopes.
//!
//! Requests are built here and serialized to a body string; responses are
//! parsed into [`JsonRpcResponse`] before the client interprets `result`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, RpcError};

/// Protocol version string carried by every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request id used when the caller does not supply one.
pub const DEFAULT_REQUEST_ID: u64 = 1;

/// JSON-RPC code for "method not found".
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Method names understood by the ledger node.
pub mod methods {
    pub const SUBMIT: &str = "submit";
    pub const GET_ACCOUNT: &str = "get_account";
    pub const GET_ACCOUNT_STATE_WITH_PROOF: &str = "get_account_state_with_proof";
    pub const GET_EVENTS: &str = "get_events";
    pub const GET_CURRENCIES: &str = "get_currencies";
    pub const GET_METADATA: &str = "get_metadata";
}

/// A single JSON-RPC request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: Vec<Value>,
    pub id: u64,
}

impl JsonRpcRequest {
    /// A request with the default id.
    pub fn new(method: &'static str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            id: DEFAULT_REQUEST_ID,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Serialize to the body sent over the wire.
    pub fn to_body(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RpcError::malformed(e.to_string()))
    }
}

/// A parsed JSON-RPC response.
///
/// `result` and `error` are kept as raw JSON: the shape of `result` depends on
/// the method, and `error` is reported back verbatim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub diem_ledger_version: Option<u64>,
    #[serde(default)]
    pub diem_ledger_timestampusec: Option<u64>,
    #[serde(default)]
    pub diem_chain_id: Option<u8>,
}

impl JsonRpcResponse {
    /// Parse a response body. Anything that is not a JSON object is malformed.
    pub fn parse(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Err(RpcError::malformed(format!(
                "expected a JSON object, got: {}",
                value
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Fail with `RemoteRejected` if the response carries an error object.
    pub fn check_error(&self) -> Result<()> {
        match &self.error {
            None | Some(Value::Null) => Ok(()),
            Some(error) => Err(RpcError::RemoteRejected {
                code: error.get("code").and_then(Value::as_i64),
                message: error.to_string(),
            }),
        }
    }

    /// Take `result`, treating JSON `null` as absent.
    pub fn take_result(&mut self) -> Option<Value> {
        self.result.take().filter(|v| !v.is_null())
    }
}
