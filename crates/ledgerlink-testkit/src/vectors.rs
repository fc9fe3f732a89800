//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical encoding and the Ed25519 conventions so
//! that every implementation produces identical bytes.

use ledgerlink_core::{
    canonical, Address, ChainId, PrivateKey, RawTransaction, Script, Shape, SignedTransaction,
    TransactionPayload, Value,
};

/// Private key of the known Ed25519 vector (reversed hex form).
pub const KNOWN_PRIVATE_KEY: &str =
    "4cc9cd70d755484327b5164fa8f3f080b12aea9cbcc7bf0d4e7d92f58d4ae990";

/// Public key derived from [`KNOWN_PRIVATE_KEY`] (reversed hex form).
pub const KNOWN_PUBLIC_KEY: &str =
    "7d8ce6951efa7d471f6109e3b16d1a02382fc2e01843df3ed44226c27e3a1733";

/// Message signed in the known vector.
pub const KNOWN_MESSAGE: &[u8] = b"Hello ED25519";

/// Deterministic signature of [`KNOWN_MESSAGE`] under [`KNOWN_PRIVATE_KEY`].
pub const KNOWN_SIGNATURE: &str = "569decff0849eb0f0e150a09755b155b707dfa3eb9da8ca81fdd3f62b9ec1cc6\
                                   4c83f5b7e5c41bc6059cc434e20e5295464cd4fe2ce1c1870c8830c3f8819801";

/// Authentication key of [`KNOWN_PUBLIC_KEY`].
pub const KNOWN_AUTHENTICATION_KEY: &str =
    "85732f645e9f8b18ad5a2ac0ee11bf11d3df4b739da4f657f4c33988386e398f";

/// Account address of [`KNOWN_PUBLIC_KEY`].
pub const KNOWN_ADDRESS: &str = "d3df4b739da4f657f4c33988386e398f";

/// A golden codec vector.
#[derive(Debug, Clone)]
pub struct CodecVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub value: Value,
    pub shape: Shape,
    /// Expected encoding (hex).
    pub expected_hex: &'static str,
}

/// Get all golden codec vectors.
pub fn codec_vectors() -> Vec<CodecVector> {
    vec![
        CodecVector {
            name: "u8",
            value: Value::U8(7),
            shape: Shape::U8,
            expected_hex: "07",
        },
        CodecVector {
            name: "u16 little-endian",
            value: Value::U16(0x1234),
            shape: Shape::U16,
            expected_hex: "3412",
        },
        CodecVector {
            name: "u32",
            value: Value::U32(1),
            shape: Shape::U32,
            expected_hex: "01000000",
        },
        CodecVector {
            name: "u64 max",
            value: Value::U64(u64::MAX),
            shape: Shape::U64,
            expected_hex: "ffffffffffffffff",
        },
        CodecVector {
            name: "u128",
            value: Value::U128(1),
            shape: Shape::U128,
            expected_hex: "01000000000000000000000000000000",
        },
        CodecVector {
            name: "bool true",
            value: Value::Bool(true),
            shape: Shape::Bool,
            expected_hex: "01",
        },
        CodecVector {
            name: "empty bytes",
            value: Value::Bytes(vec![]),
            shape: Shape::Bytes,
            expected_hex: "00",
        },
        CodecVector {
            name: "bytes",
            value: Value::Bytes(vec![0xaa; 3]),
            shape: Shape::Bytes,
            expected_hex: "03aaaaaa",
        },
        CodecVector {
            name: "fixed bytes",
            value: Value::FixedBytes(vec![0xaa; 3]),
            shape: Shape::FixedBytes(3),
            expected_hex: "aaaaaa",
        },
        CodecVector {
            name: "sequence of u16",
            value: Value::Seq(vec![Value::U16(1), Value::U16(2)]),
            shape: Shape::seq(Shape::U16),
            expected_hex: "0201000200",
        },
        CodecVector {
            name: "map sorted by encoded key",
            value: Value::map([(b"aa".to_vec(), Value::U8(1)), (b"b".to_vec(), Value::U8(2))]),
            shape: Shape::map(Shape::U8),
            // "b" (01 62) sorts before "aa" (02 61 61)
            expected_hex: "0201620202616101",
        },
        CodecVector {
            name: "option none",
            value: Value::Option(None),
            shape: Shape::option(Shape::U8),
            expected_hex: "00",
        },
        CodecVector {
            name: "option some",
            value: Value::Option(Some(Box::new(Value::U8(5)))),
            shape: Shape::option(Shape::U8),
            expected_hex: "0105",
        },
        CodecVector {
            name: "variant",
            value: Value::variant(2, Value::U16(1)),
            shape: Shape::Variant(vec![Shape::Unit, Shape::Unit, Shape::U16]),
            expected_hex: "020100",
        },
        CodecVector {
            name: "record",
            value: Value::record(vec![("a", Value::U8(1)), ("b", Value::Bool(false))]),
            shape: Shape::Record(vec![("a", Shape::U8), ("b", Shape::Bool)]),
            expected_hex: "0100",
        },
    ]
}

/// ULEB128 length prefixes at the byte boundaries: `(length, encoded prefix)`.
pub fn uleb128_vectors() -> Vec<(usize, &'static str)> {
    vec![
        (0, "00"),
        (1, "01"),
        (127, "7f"),
        (128, "8001"),
        (300, "ac02"),
        (16384, "808001"),
    ]
}

/// The raw transaction behind [`SIGNED_TRANSACTION_HEX`].
pub fn golden_raw_transaction() -> RawTransaction {
    RawTransaction {
        sender: Address::from_bytes([0x11; 16]),
        sequence_number: 1,
        payload: TransactionPayload::Script(Script::new(vec![0x01], vec![], vec![])),
        max_gas_amount: 1000,
        gas_unit_price: 0,
        gas_currency_code: "XUS".to_string(),
        expiration_timestamp_secs: 0,
        chain_id: ChainId::new(4),
    }
}

/// Canonical encoding of [`golden_raw_transaction`].
pub const RAW_TRANSACTION_HEX: &str = "11111111111111111111111111111111\
                                       0100000000000000\
                                       01010100\
                                       00\
                                       e803000000000000\
                                       0000000000000000\
                                       03585553\
                                       0000000000000000\
                                       04";

/// [`golden_raw_transaction`] signed with [`KNOWN_PRIVATE_KEY`], canonical form.
pub const SIGNED_TRANSACTION_HEX: &str = "11111111111111111111111111111111\
                                          0100000000000000\
                                          01010100\
                                          00\
                                          e803000000000000\
                                          0000000000000000\
                                          03585553\
                                          0000000000000000\
                                          04\
                                          00\
                                          2033173a7ec22642d43edf4318e0c22f38021a6db1e309611f477dfa1e95e68c7d\
                                          4020eb5f5d487afed44ff25b8353dc4868841bde2ce1ec2f61cbf80ac200a24c9c\
                                          6abf06070cb203d779824c6c6a4e1f9c43498b5f063faf817278471787e94d0a";

/// Sign [`golden_raw_transaction`] with the known key.
pub fn golden_signed_transaction() -> SignedTransaction {
    golden_raw_transaction()
        .sign(&known_private_key())
        .expect("known key signs")
}

/// The known private key.
pub fn known_private_key() -> PrivateKey {
    PrivateKey::from_hex(KNOWN_PRIVATE_KEY).expect("known private key is well-formed")
}

/// Check every codec vector; returns the names of vectors that failed.
pub fn verify_codec_vectors() -> Vec<&'static str> {
    codec_vectors()
        .into_iter()
        .filter(|v| {
            let encoded = canonical::encode(&v.value);
            let round_trips = canonical::decode(&encoded, &v.shape)
                .map(|decoded| decoded == v.value)
                .unwrap_or(false);
            hex::encode(&encoded) != v.expected_hex || !round_trips
        })
        .map(|v| v.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlink_core::{from_bytes, to_bytes, PublicKey, Signature};

    #[test]
    fn test_codec_vectors_hold() {
        assert!(verify_codec_vectors().is_empty(), "{:?}", verify_codec_vectors());
    }

    #[test]
    fn test_uleb128_prefixes() {
        for (len, prefix) in uleb128_vectors() {
            let encoded = canonical::encode(&Value::Bytes(vec![0; len]));
            assert_eq!(hex::encode(&encoded[..prefix.len() / 2]), prefix, "len {}", len);
            assert_eq!(encoded.len(), prefix.len() / 2 + len);
        }
    }

    #[test]
    fn test_known_key_vector() {
        let private = known_private_key();
        let public = private.public_key();
        assert_eq!(public.to_hex(), KNOWN_PUBLIC_KEY);

        let signature = private.sign(KNOWN_MESSAGE).unwrap();
        assert_eq!(signature.to_hex(), KNOWN_SIGNATURE);

        let imported = PublicKey::from_hex(KNOWN_PUBLIC_KEY).unwrap();
        let expected = Signature::from_hex(KNOWN_SIGNATURE).unwrap();
        assert!(imported.verify(&expected, KNOWN_MESSAGE).unwrap());
    }

    #[test]
    fn test_known_address() {
        let public = PublicKey::from_hex(KNOWN_PUBLIC_KEY).unwrap();
        assert_eq!(public.authentication_key().to_hex(), KNOWN_AUTHENTICATION_KEY);
        assert_eq!(public.derived_address().to_hex(), KNOWN_ADDRESS);
    }

    #[test]
    fn test_golden_transaction_bytes() {
        let raw = golden_raw_transaction();
        assert_eq!(hex::encode(to_bytes(&raw)), RAW_TRANSACTION_HEX);

        let signed = golden_signed_transaction();
        assert_eq!(hex::encode(signed.to_canonical_bytes()), SIGNED_TRANSACTION_HEX);
        assert!(signed.verify_signature().unwrap());

        let decoded: SignedTransaction =
            from_bytes(&hex::decode(SIGNED_TRANSACTION_HEX).unwrap()).unwrap();
        assert_eq!(decoded, signed);
    }
}
