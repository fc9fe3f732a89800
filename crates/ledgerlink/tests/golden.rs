//! Golden tests for cross-implementation verification.
//!
//! Every implementation talking to the ledger must produce identical:
//! - canonical encodings
//! - key text forms (reversed hex)
//! - signatures (deterministic Ed25519)
//! - signed transaction bytes and the hex submitted over JSON-RPC

use std::sync::Once;

use ledgerlink::rpc::{HttpResponse, MemoryTransport};
use ledgerlink::core::from_bytes;
use ledgerlink::{
    decode, encode, Address, BlockingClient, ErrorKind, EventData, PrivateKey, PublicKey, RawKey,
    Shape, SignedTransaction, Value,
};
use ledgerlink_testkit::fixtures;
use ledgerlink_testkit::vectors::{
    codec_vectors, golden_signed_transaction, known_private_key, uleb128_vectors,
    KNOWN_ADDRESS, KNOWN_MESSAGE, KNOWN_PUBLIC_KEY, KNOWN_SIGNATURE, SIGNED_TRANSACTION_HEX,
};
use proptest::prelude::*;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

fn blocking(responses: Vec<HttpResponse>) -> BlockingClient<MemoryTransport> {
    init_tracing();
    BlockingClient::new(MemoryTransport::with_responses(responses)).unwrap()
}

#[test]
fn golden_codec_vectors() {
    for vector in codec_vectors() {
        let bytes = encode(&vector.value);
        assert_eq!(hex::encode(&bytes), vector.expected_hex, "{}", vector.name);
        assert_eq!(decode(&bytes, &vector.shape).unwrap(), vector.value, "{}", vector.name);
    }
}

#[test]
fn golden_uleb128_prefixes() {
    for (len, prefix) in uleb128_vectors() {
        let bytes = encode(&Value::Bytes(vec![0xee; len]));
        assert!(hex::encode(&bytes).starts_with(prefix), "len {}", len);
    }
}

#[test]
fn golden_known_ed25519_vector() {
    let private = PrivateKey::from_hex(
        "4cc9cd70d755484327b5164fa8f3f080b12aea9cbcc7bf0d4e7d92f58d4ae990",
    )
    .unwrap();
    let public = private.public_key();
    assert_eq!(public.to_hex(), KNOWN_PUBLIC_KEY);

    let signature = private.sign(KNOWN_MESSAGE).unwrap();
    assert_eq!(signature.to_hex(), KNOWN_SIGNATURE);
    assert!(PublicKey::from_hex(KNOWN_PUBLIC_KEY)
        .unwrap()
        .verify(&signature, KNOWN_MESSAGE)
        .unwrap());

    assert_eq!(Address::from_public_key(&public).to_hex(), KNOWN_ADDRESS);
}

#[test]
fn golden_raw_key_reversal() {
    let mut text = String::from("01");
    text.push_str(&"00".repeat(31));

    let key = RawKey::from_hex(&text).unwrap();
    assert_eq!(key.as_bytes()[31], 0x01);
    assert!(key.as_bytes()[..31].iter().all(|b| *b == 0));
    assert_eq!(key.to_hex(), text);
}

#[test]
fn golden_key_import_errors() {
    assert_eq!(
        PrivateKey::from_hex("abcd").unwrap_err().kind(),
        ErrorKind::InvalidEncoding
    );
    assert_eq!(
        PublicKey::from_hex(&"zz".repeat(32)).unwrap_err().kind(),
        ErrorKind::InvalidEncoding
    );
}

#[test]
fn golden_signed_transaction_bytes() {
    let signed = golden_signed_transaction();
    assert_eq!(hex::encode(signed.to_canonical_bytes()), SIGNED_TRANSACTION_HEX);

    let decoded: SignedTransaction =
        from_bytes(&hex::decode(SIGNED_TRANSACTION_HEX).unwrap()).unwrap();
    assert!(decoded.verify_signature().unwrap());
}

#[test]
fn golden_submit_sends_canonical_hex() {
    let client = blocking(vec![fixtures::submit_accepted(901)]);
    let signed = golden_signed_transaction();

    let receipt = client.submit_transaction(&signed).unwrap();
    assert_eq!(receipt.ledger_version, 901);

    let sent: serde_json::Value =
        serde_json::from_str(&client.inner().transport().requests()[0]).unwrap();
    assert_eq!(sent["method"], "submit");
    assert_eq!(sent["params"][0], SIGNED_TRANSACTION_HEX);
}

#[test]
fn rpc_account_lifecycle() {
    let key = known_private_key();
    let address = key.public_key().derived_address();
    let client = blocking(vec![
        fixtures::account_not_found(),
        fixtures::account(address, 4),
    ]);

    assert_eq!(client.get_account(address, None).unwrap().sequence_number, None);
    assert_eq!(client.get_account(address, None).unwrap().sequence_number, Some(4));
}

#[test]
fn rpc_state_and_events() {
    let client = blocking(vec![
        fixtures::account_state(77, Some(&[0xde, 0xad])),
        fixtures::unknown_events("evkey", &[b"\xff"]),
    ]);

    let state = client.get_account_state_blob(KNOWN_ADDRESS).unwrap();
    assert_eq!(state.version, 77);
    assert_eq!(state.blob.as_deref(), Some(&[0xde, 0xad][..]));

    let events = client.get_events("evkey", 0, 1, 9).unwrap();
    assert!(matches!(&events[0].data, EventData::Unknown { bytes } if bytes[..] == [0xff]));
}

#[test]
fn rpc_error_classification() {
    let client = blocking(vec![
        HttpResponse::new(500, "internal"),
        HttpResponse::ok("{not json"),
        HttpResponse::ok(fixtures::error_body(-32602, "Invalid params")),
        HttpResponse::ok(fixtures::error_body(-32601, "Method not found")),
    ]);

    assert_eq!(client.get_metadata(None).unwrap_err().kind(), ErrorKind::Transport);
    assert_eq!(client.get_metadata(None).unwrap_err().kind(), ErrorKind::Malformed);
    assert_eq!(
        client.get_account(Address::ZERO, None).unwrap_err().kind(),
        ErrorKind::RemoteRejected
    );
    assert!(client.get_currencies().unwrap().is_empty());
}

#[test]
fn concurrent_signing_with_one_key() {
    let key = std::sync::Arc::new(known_private_key());
    let expected = key.sign(KNOWN_MESSAGE).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let key = std::sync::Arc::clone(&key);
            std::thread::spawn(move || key.sign(KNOWN_MESSAGE).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

proptest! {
    #[test]
    fn map_encoding_ignores_insertion_order(
        entries in proptest::collection::vec((proptest::collection::vec(any::<u8>(), 0..6), any::<u64>()), 0..8)
    ) {
        let forward = Value::map(entries.iter().cloned().map(|(k, v)| (k, Value::U64(v))));
        let backward = Value::map(entries.iter().rev().cloned().map(|(k, v)| (k, Value::U64(v))));

        // Later duplicates win, so only compare when keys are distinct.
        let mut keys: Vec<_> = entries.iter().map(|(k, _)| k.clone()).collect();
        keys.sort();
        keys.dedup();
        prop_assume!(keys.len() == entries.len());

        let bytes = encode(&forward);
        prop_assert_eq!(&bytes, &encode(&backward));
        prop_assert_eq!(decode(&bytes, &Shape::map(Shape::U64)).unwrap(), forward);
    }
}
