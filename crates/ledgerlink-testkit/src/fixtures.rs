//! Test fixtures and helpers.
//!
//! Canned JSON-RPC responses and a client wired to a scripted transport.

use std::sync::Arc;

use serde_json::{json, Value};

use ledgerlink_core::{Address, PrivateKey, RawKey};
use ledgerlink_rpc::{Client, HttpResponse, MemoryTransport};

/// Wrap `result` in a successful JSON-RPC response body.
pub fn ok_body(result: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
        "diem_chain_id": 4,
        "diem_ledger_version": 3_311_u64,
        "diem_ledger_timestampusec": 1_600_000_000_000_000_u64,
    })
    .to_string()
}

/// A JSON-RPC error response body.
pub fn error_body(code: i64, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {"code": code, "message": message, "data": null},
    })
    .to_string()
}

/// Response to a successful `submit`.
pub fn submit_accepted(ledger_version: u64) -> HttpResponse {
    HttpResponse::ok(
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": null,
            "diem_ledger_version": ledger_version,
        })
        .to_string(),
    )
}

/// Response to `get_account` for an existing account.
pub fn account(address: Address, sequence_number: u64) -> HttpResponse {
    HttpResponse::ok(ok_body(json!({
        "address": address.to_hex(),
        "sequence_number": sequence_number,
        "authentication_key": "00".repeat(32),
        "balances": [{"amount": 1_000_000, "currency": "XUS"}],
        "is_frozen": false,
        "sent_events_key": format!("0300000000000000{}", address.to_hex()),
        "received_events_key": format!("0200000000000000{}", address.to_hex()),
        "role": {"type": "unknown"},
    })))
}

/// Response to `get_account` for an unknown account.
pub fn account_not_found() -> HttpResponse {
    HttpResponse::ok(ok_body(Value::Null))
}

/// Response to `get_account_state_with_proof`.
pub fn account_state(version: u64, blob: Option<&[u8]>) -> HttpResponse {
    HttpResponse::ok(ok_body(json!({
        "version": version,
        "blob": blob.map(hex::encode),
        "proof": {
            "ledger_info_to_transaction_info_proof": "0a0b",
            "transaction_info": "0c",
            "transaction_info_to_account_proof": "0d0e0f",
        },
    })))
}

/// Response to `get_events` holding `unknown`-typed events with the given payloads.
pub fn unknown_events(key: &str, payloads: &[&[u8]]) -> HttpResponse {
    let events: Vec<Value> = payloads
        .iter()
        .enumerate()
        .map(|(i, bytes)| {
            json!({
                "key": key,
                "sequence_number": i,
                "transaction_version": 100 + i,
                "data": {"type": "unknown", "bytes": hex::encode(bytes)},
            })
        })
        .collect();
    HttpResponse::ok(ok_body(Value::Array(events)))
}

/// Response to `get_currencies`.
pub fn currencies(codes: &[&str]) -> HttpResponse {
    let infos: Vec<Value> = codes
        .iter()
        .map(|code| {
            json!({
                "code": code,
                "scaling_factor": 1_000_000,
                "fractional_part": 100,
                "to_xdx_exchange_rate": 1.0,
                "total_value": 5_000_000_000_u64,
                "preburn_value": 0,
            })
        })
        .collect();
    HttpResponse::ok(ok_body(Value::Array(infos)))
}

/// Response to `get_metadata`.
pub fn metadata(version: u64, chain_id: u8) -> HttpResponse {
    HttpResponse::ok(ok_body(json!({
        "version": version,
        "timestamp": 1_600_000_000_000_000_u64,
        "chain_id": chain_id,
    })))
}

/// A client over a scripted transport, plus a deterministic signer.
pub struct RpcFixture {
    pub transport: Arc<MemoryTransport>,
    pub client: Client<Arc<MemoryTransport>>,
    pub key: PrivateKey,
}

impl RpcFixture {
    /// Fixture with a random key.
    pub fn new() -> Self {
        Self::with_key(PrivateKey::generate().expect("OS random source available"))
    }

    /// Fixture whose key is derived from `seed`.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::with_key(PrivateKey::from_raw(RawKey::from_bytes(seed)))
    }

    fn with_key(key: PrivateKey) -> Self {
        let transport = Arc::new(MemoryTransport::new());
        Self {
            client: Client::new(Arc::clone(&transport)),
            transport,
            key,
        }
    }

    /// The account address controlled by the fixture's key.
    pub fn address(&self) -> Address {
        self.key.public_key().derived_address()
    }

    /// Queue a response for the next call.
    pub fn respond(&self, response: HttpResponse) -> &Self {
        self.transport.push_response(response);
        self
    }

    /// The `n`th request body sent, parsed as JSON.
    pub fn request(&self, n: usize) -> Value {
        let requests = self.transport.requests();
        let body = requests.get(n).expect("request was sent");
        serde_json::from_str(body).expect("request body is JSON")
    }
}

impl Default for RpcFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlink_core::{RawTransactionBuilder, Script, ChainId};
    use ledgerlink_rpc::EventData;

    #[tokio::test]
    async fn test_fixture_account_flow() {
        let fixture = RpcFixture::with_seed([0x07; 32]);
        let address = fixture.address();
        fixture.respond(account(address, 12)).respond(account_not_found());

        let view = fixture.client.get_account(address, None).await.unwrap();
        assert_eq!(view.sequence_number, Some(12));
        assert_eq!(view.address, Some(address));
        assert_eq!(view.balances[0].amount, 1_000_000);

        let missing = fixture.client.get_account(Address::ZERO, None).await.unwrap();
        assert_eq!(missing.sequence_number, None);

        assert_eq!(fixture.request(0)["params"][0], address.to_hex());
    }

    #[tokio::test]
    async fn test_fixture_submit_flow() {
        let fixture = RpcFixture::new();
        fixture.respond(submit_accepted(55));

        let signed = RawTransactionBuilder::new(
            fixture.address(),
            0,
            Script::new(vec![0xa1, 0x1c], vec![], vec![]).into(),
            ChainId::new(4),
        )
        .sign(&fixture.key)
        .unwrap();

        let receipt = fixture.client.submit_transaction(&signed).await.unwrap();
        assert_eq!(receipt.ledger_version, 55);

        let sent = fixture.request(0);
        assert_eq!(sent["params"][0], hex::encode(signed.to_canonical_bytes()));
    }

    #[tokio::test]
    async fn test_fixture_state_events_currencies() {
        let fixture = RpcFixture::new();
        fixture
            .respond(account_state(8, None))
            .respond(unknown_events("k", &[b"\x01\x02", b""]))
            .respond(currencies(&["XUS", "XDX"]))
            .respond(metadata(8, 4));

        let state = fixture.client.get_account_state_blob("aa").await.unwrap();
        assert!(state.blob.is_none());
        assert_eq!(&state.proof.transaction_info_to_account_proof[..], &[0x0d, 0x0e, 0x0f]);

        let events = fixture.client.get_events("k", 0, 10, 3).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0].data,
            EventData::Unknown {
                bytes: vec![1u8, 2].into()
            }
        );

        let infos = fixture.client.get_currencies().await.unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[1].total_value, Some(5_000_000_000));

        let meta = fixture.client.get_metadata(None).await.unwrap();
        assert_eq!(meta.chain_id, 4);
    }
}
