//! Proptest generators for property-based testing.

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

use ledgerlink_core::{
    Address, ChainId, PrivateKey, RawKey, RawTransaction, Script, Shape, StructTag,
    TransactionArgument, TransactionPayload, TypeTag, Value,
};

/// Field names handed out to generated records.
const FIELD_NAMES: [&str; 4] = ["a", "b", "c", "d"];

/// Generate a shape without deferred parts, nested at most a few levels.
pub fn shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Unit),
        Just(Shape::U8),
        Just(Shape::U16),
        Just(Shape::U32),
        Just(Shape::U64),
        Just(Shape::U128),
        Just(Shape::Bool),
        Just(Shape::Bytes),
        (0usize..8).prop_map(Shape::FixedBytes),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(Shape::seq),
            inner.clone().prop_map(Shape::map),
            inner.clone().prop_map(Shape::option),
            vec(inner.clone(), 1..4).prop_map(Shape::Variant),
            vec(inner, 0..=FIELD_NAMES.len()).prop_map(|fields| {
                Shape::Record(FIELD_NAMES.iter().copied().zip(fields).collect())
            }),
        ]
    })
}

/// Generate a value that conforms to `shape`.
///
/// Deferred shapes are resolved as they are met; a shape that recurses
/// without bound will not terminate.
pub fn value_for(shape: &Shape) -> BoxedStrategy<Value> {
    match shape {
        Shape::Unit => Just(Value::Unit).boxed(),
        Shape::U8 => any::<u8>().prop_map(Value::U8).boxed(),
        Shape::U16 => any::<u16>().prop_map(Value::U16).boxed(),
        Shape::U32 => any::<u32>().prop_map(Value::U32).boxed(),
        Shape::U64 => any::<u64>().prop_map(Value::U64).boxed(),
        Shape::U128 => any::<u128>().prop_map(Value::U128).boxed(),
        Shape::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        Shape::Bytes => bytes(32).prop_map(Value::Bytes).boxed(),
        Shape::FixedBytes(n) => vec(any::<u8>(), *n).prop_map(Value::FixedBytes).boxed(),
        Shape::Seq(inner) => vec(value_for(inner), 0..4).prop_map(Value::Seq).boxed(),
        Shape::Map(inner) => btree_map(bytes(6), value_for(inner), 0..4)
            .prop_map(Value::Map)
            .boxed(),
        Shape::Option(inner) => proptest::option::of(value_for(inner))
            .prop_map(|v| Value::Option(v.map(Box::new)))
            .boxed(),
        Shape::Variant(arms) => {
            let arms = arms.clone();
            (0..arms.len())
                .prop_flat_map(move |tag| {
                    value_for(&arms[tag]).prop_map(move |v| Value::variant(tag as u32, v))
                })
                .boxed()
        }
        Shape::Record(fields) => {
            let names: Vec<&'static str> = fields.iter().map(|(name, _)| *name).collect();
            let values: Vec<BoxedStrategy<Value>> =
                fields.iter().map(|(_, shape)| value_for(shape)).collect();
            values
                .prop_map(move |values| Value::Record(names.iter().copied().zip(values).collect()))
                .boxed()
        }
        Shape::Deferred(resolve) => value_for(&resolve()),
    }
}

/// Generate a shape together with a conforming value.
pub fn shaped_value() -> impl Strategy<Value = (Shape, Value)> {
    shape().prop_flat_map(|shape| {
        let values = value_for(&shape);
        (Just(shape), values)
    })
}

/// Generate byte strings up to `max_len`.
pub fn bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..=max_len)
}

/// Generate a random RawKey.
pub fn raw_key() -> impl Strategy<Value = RawKey> {
    any::<[u8; 32]>().prop_map(RawKey::from_bytes)
}

/// Generate a random private key.
pub fn private_key() -> impl Strategy<Value = PrivateKey> {
    raw_key().prop_map(PrivateKey::from_raw)
}

/// Generate a random Address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 16]>().prop_map(Address::from_bytes)
}

/// Generate a message to sign.
pub fn message() -> impl Strategy<Value = Vec<u8>> {
    bytes(256)
}

/// Generate an identifier-like string.
pub fn identifier() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a type tag, including nested vectors and structs.
pub fn type_tag() -> impl Strategy<Value = TypeTag> {
    let leaf = prop_oneof![
        Just(TypeTag::Bool),
        Just(TypeTag::U8),
        Just(TypeTag::U64),
        Just(TypeTag::U128),
        Just(TypeTag::Address),
        Just(TypeTag::Signer),
    ];

    leaf.prop_recursive(3, 12, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| TypeTag::Vector(Box::new(t))),
            (address(), identifier(), identifier(), vec(inner, 0..3)).prop_map(
                |(address, module, name, type_params)| {
                    TypeTag::Struct(Box::new(StructTag {
                        address,
                        module,
                        name,
                        type_params,
                    }))
                }
            ),
        ]
    })
}

/// Generate a script argument.
pub fn transaction_argument() -> impl Strategy<Value = TransactionArgument> {
    prop_oneof![
        any::<u8>().prop_map(TransactionArgument::U8),
        any::<u64>().prop_map(TransactionArgument::U64),
        any::<u128>().prop_map(TransactionArgument::U128),
        address().prop_map(TransactionArgument::Address),
        bytes(32).prop_map(TransactionArgument::U8Vector),
        any::<bool>().prop_map(TransactionArgument::Bool),
    ]
}

/// Generate a transaction payload.
pub fn payload() -> impl Strategy<Value = TransactionPayload> {
    prop_oneof![
        (bytes(64), vec(type_tag(), 0..3), vec(transaction_argument(), 0..4))
            .prop_map(|(code, ty_args, args)| {
                TransactionPayload::Script(Script::new(code, ty_args, args))
            }),
        bytes(64).prop_map(TransactionPayload::Module),
    ]
}

/// Generate a raw transaction.
pub fn raw_transaction() -> impl Strategy<Value = RawTransaction> {
    (
        address(),
        any::<u64>(),
        payload(),
        any::<u64>(),
        any::<u64>(),
        "[A-Z]{3}",
        any::<u64>(),
        any::<u8>(),
    )
        .prop_map(
            |(sender, sequence_number, payload, max_gas, price, currency, expiry, chain)| {
                RawTransaction {
                    sender,
                    sequence_number,
                    payload,
                    max_gas_amount: max_gas,
                    gas_unit_price: price,
                    gas_currency_code: currency,
                    expiration_timestamp_secs: expiry,
                    chain_id: ChainId::new(chain),
                }
            },
        )
}
