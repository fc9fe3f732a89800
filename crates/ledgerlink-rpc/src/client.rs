//! JSON-RPC client for the ledger node.
//!
//! Every call is one request/response round trip over the client's
//! [`Transport`]. The response is classified in a fixed order: a non-success
//! HTTP status is a transport error carrying the raw body; a body that is not
//! JSON is malformed; a non-null `error` object is a remote rejection; only
//! then is `result` decoded into the method's view type.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use ledgerlink_core::{Address, SignedTransaction};

use crate::config::RpcConfig;
use crate::error::{Result, RpcError};
use crate::messages::{methods, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND};
use crate::transport::{HttpTransport, Transport};
use crate::views::{
    AccountStateWithProof, AccountView, CurrencyInfoView, EventData, EventView, MetadataView,
    SubmitReceipt,
};

/// Client for one ledger endpoint.
///
/// Stateless apart from the transport, so a single client may serve
/// concurrent calls.
pub struct Client<T: Transport> {
    transport: T,
}

impl Client<HttpTransport> {
    /// Build an HTTP client from configuration.
    pub fn connect(config: &RpcConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> Client<T> {
    /// Create a client over an existing transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and return the response once the error field is clear.
    async fn call(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let body = request.to_body()?;
        tracing::debug!(method = request.method, id = request.id, "sending request");

        let response = self.transport.post(body).await?;
        tracing::debug!(
            method = request.method,
            status = response.status,
            "received response"
        );

        if !response.is_success() {
            return Err(RpcError::Transport {
                status: response.status,
                body: response.body,
            });
        }

        let parsed = JsonRpcResponse::parse(&response.body)?;
        if let Err(e) = parsed.check_error() {
            tracing::warn!(method = request.method, error = %e, "request rejected");
            return Err(e);
        }
        Ok(parsed)
    }

    /// Submit canonical signed-transaction bytes.
    pub async fn submit(&self, signed_txn: &[u8]) -> Result<SubmitReceipt> {
        let request = JsonRpcRequest::new(methods::SUBMIT, vec![json!(hex::encode(signed_txn))]);
        let response = self.call(request).await?;
        let ledger_version = response
            .diem_ledger_version
            .ok_or_else(|| RpcError::malformed("submit response lacks diem_ledger_version"))?;
        Ok(SubmitReceipt { ledger_version })
    }

    /// Encode and submit a signed transaction.
    pub async fn submit_transaction(&self, txn: &SignedTransaction) -> Result<SubmitReceipt> {
        self.submit(&txn.to_canonical_bytes()).await
    }

    /// Fetch an account, optionally at a historical version.
    ///
    /// An unknown account yields a view with no sequence number.
    pub async fn get_account(
        &self,
        address: Address,
        version: Option<u64>,
    ) -> Result<AccountView> {
        let mut params = vec![json!(address.to_hex())];
        if let Some(version) = version {
            params.push(json!(version));
        }

        let mut response = self
            .call(JsonRpcRequest::new(methods::GET_ACCOUNT, params))
            .await?;
        match response.take_result() {
            Some(result) => decode_result(methods::GET_ACCOUNT, result),
            None => Ok(AccountView::default()),
        }
    }

    /// Fetch the latest account state blob together with its proof bundle.
    pub async fn get_account_state_blob(&self, address: &str) -> Result<AccountStateWithProof> {
        let params = vec![json!(address), Value::Null, Value::Null];
        let mut response = self
            .call(JsonRpcRequest::new(
                methods::GET_ACCOUNT_STATE_WITH_PROOF,
                params,
            ))
            .await?;
        let result = require_result(methods::GET_ACCOUNT_STATE_WITH_PROOF, &mut response)?;
        decode_result(methods::GET_ACCOUNT_STATE_WITH_PROOF, result)
    }

    /// Fetch up to `limit` events from stream `event_key`, starting at `start`.
    ///
    /// `request_id` is echoed as the JSON-RPC id.
    pub async fn get_events(
        &self,
        event_key: &str,
        start: u64,
        limit: u64,
        request_id: u64,
    ) -> Result<Vec<EventView>> {
        let params = vec![json!(event_key), json!(start), json!(limit)];
        let request = JsonRpcRequest::new(methods::GET_EVENTS, params).with_id(request_id);
        let mut response = self.call(request).await?;

        let result = require_result(methods::GET_EVENTS, &mut response)?;
        let events: Vec<EventView> = decode_result(methods::GET_EVENTS, result)?;

        for event in &events {
            if let EventData::Opaque { kind, .. } = &event.data {
                tracing::warn!(
                    key = %event.key,
                    sequence_number = event.sequence_number,
                    kind = %kind,
                    "unrecognized event type"
                );
            }
        }
        Ok(events)
    }

    /// List the currencies the ledger knows about.
    ///
    /// Nodes that do not implement the method yield an empty list.
    pub async fn get_currencies(&self) -> Result<Vec<CurrencyInfoView>> {
        let request = JsonRpcRequest::new(methods::GET_CURRENCIES, vec![]);
        let mut response = match self.call(request).await {
            Ok(response) => response,
            Err(RpcError::RemoteRejected {
                code: Some(METHOD_NOT_FOUND),
                ..
            }) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        match response.take_result() {
            Some(result) => decode_result(methods::GET_CURRENCIES, result),
            None => Ok(Vec::new()),
        }
    }

    /// Ledger metadata at `version`, or at the latest version.
    pub async fn get_metadata(&self, version: Option<u64>) -> Result<MetadataView> {
        let params = version.map(|v| vec![json!(v)]).unwrap_or_default();
        let mut response = self
            .call(JsonRpcRequest::new(methods::GET_METADATA, params))
            .await?;
        let result = require_result(methods::GET_METADATA, &mut response)?;
        decode_result(methods::GET_METADATA, result)
    }
}

fn require_result(method: &str, response: &mut JsonRpcResponse) -> Result<Value> {
    response
        .take_result()
        .ok_or_else(|| RpcError::malformed(format!("{} response has no result", method)))
}

fn decode_result<R: DeserializeOwned>(method: &str, result: Value) -> Result<R> {
    serde_json::from_value(result)
        .map_err(|e| RpcError::malformed(format!("{} result: {}", method, e)))
}
