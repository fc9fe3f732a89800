//! Canonical binary encoding for deterministic serialization.
//!
//! Wire rules:
//! - Integers are fixed-width little-endian
//! - Byte vectors, sequences and maps carry a ULEB128 length prefix
//! - Fixed arrays and records carry no prefix; record fields follow declaration order
//! - Map entries are sorted by the byte order of their *encoded* keys
//! - Options and variants carry a tag (`0`/`1` and ULEB128 respectively)
//!
//! The format is not self-describing. Decoding is driven by a [`Shape`]
//! supplied by the caller, and is strict: any input that would not be produced
//! by [`encode`] is rejected, so every value has exactly one encoding.

use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// Maximum nesting of containers accepted by the decoder.
pub const MAX_CONTAINER_DEPTH: usize = 500;

/// Largest length prefix accepted by the decoder.
pub const MAX_SEQUENCE_LENGTH: u64 = u32::MAX as u64;

/// A canonical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Zero-sized payload (e.g. a variant without data).
    Unit,
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Bool(bool),
    /// Length-prefixed byte vector.
    Bytes(Vec<u8>),
    /// Fixed-length byte array, no prefix.
    FixedBytes(Vec<u8>),
    /// Length-prefixed sequence of values of one shape.
    Seq(Vec<Value>),
    /// Mapping from byte-string keys to values. Insertion order is irrelevant.
    Map(BTreeMap<Vec<u8>, Value>),
    Option(Option<Box<Value>>),
    /// Enum variant: tag plus payload.
    Variant(u32, Box<Value>),
    /// Fixed-size record. Names are not encoded.
    Record(Vec<(&'static str, Value)>),
}

/// The expected shape of an encoded value.
#[derive(Debug, Clone)]
pub enum Shape {
    Unit,
    U8,
    U16,
    U32,
    U64,
    U128,
    Bool,
    Bytes,
    FixedBytes(usize),
    Seq(Box<Shape>),
    /// Map with byte-string keys and values of the inner shape.
    Map(Box<Shape>),
    Option(Box<Shape>),
    /// Variant payload shapes, indexed by tag.
    Variant(Vec<Shape>),
    Record(Vec<(&'static str, Shape)>),
    /// Resolved lazily; used for recursive types.
    Deferred(fn() -> Shape),
}

impl Shape {
    pub fn seq(inner: Shape) -> Self {
        Shape::Seq(Box::new(inner))
    }

    pub fn map(inner: Shape) -> Self {
        Shape::Map(Box::new(inner))
    }

    pub fn option(inner: Shape) -> Self {
        Shape::Option(Box::new(inner))
    }
}

/// Encode a value to canonical bytes.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Decode canonical bytes into a value of the given shape.
///
/// Fails with [`CoreError::Malformed`] on short input, invalid tags,
/// non-canonical prefixes, unsorted map keys, or trailing bytes.
pub fn decode(bytes: &[u8], shape: &Shape) -> Result<Value> {
    let mut decoder = Decoder::new(bytes);
    let value = decoder.read_value(shape)?;
    if decoder.remaining() != 0 {
        return Err(CoreError::malformed(format!(
            "{} trailing bytes",
            decoder.remaining()
        )));
    }
    Ok(value)
}

/// Recursively encode a value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Unit => {}
        Value::U8(n) => buf.push(*n),
        Value::U16(n) => buf.extend_from_slice(&n.to_le_bytes()),
        Value::U32(n) => buf.extend_from_slice(&n.to_le_bytes()),
        Value::U64(n) => buf.extend_from_slice(&n.to_le_bytes()),
        Value::U128(n) => buf.extend_from_slice(&n.to_le_bytes()),
        Value::Bool(b) => buf.push(u8::from(*b)),
        Value::Bytes(b) => encode_bytes(buf, b),
        Value::FixedBytes(b) => buf.extend_from_slice(b),
        Value::Seq(items) => {
            encode_uleb128(buf, items.len() as u64);
            for item in items {
                encode_value_to(buf, item);
            }
        }
        Value::Map(entries) => encode_map_canonical(buf, entries),
        Value::Option(None) => buf.push(0),
        Value::Option(Some(inner)) => {
            buf.push(1);
            encode_value_to(buf, inner);
        }
        Value::Variant(tag, payload) => {
            encode_uleb128(buf, u64::from(*tag));
            encode_value_to(buf, payload);
        }
        Value::Record(fields) => {
            for (_, field) in fields {
                encode_value_to(buf, field);
            }
        }
    }
}

/// Encode an unsigned integer as ULEB128 (7 bits per byte, low group first).
fn encode_uleb128(buf: &mut Vec<u8>, mut n: u64) {
    while n >= 0x80 {
        buf.push((n as u8 & 0x7f) | 0x80);
        n >>= 7;
    }
    buf.push(n as u8);
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uleb128(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a map canonically.
///
/// Entries are sorted by their encoded key bytes, which differs from raw key
/// order because of the length prefix (`"b"` sorts before `"aa"`).
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &BTreeMap<Vec<u8>, Value>) {
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::with_capacity(k.len() + 1);
            encode_bytes(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    encode_uleb128(buf, key_value_pairs.len() as u64);
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

/// Cursor over canonical input.
struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(CoreError::malformed(format!(
                "need {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.take(N)?);
        Ok(arr)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_uleb128(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        for shift in (0..64).step_by(7) {
            let byte = self.read_u8()?;
            let digit = u64::from(byte & 0x7f);
            value |= digit << shift;
            if byte & 0x80 == 0 {
                if shift > 0 && digit == 0 {
                    return Err(CoreError::malformed("non-canonical ULEB128 encoding"));
                }
                if value > MAX_SEQUENCE_LENGTH {
                    return Err(CoreError::malformed(format!(
                        "length {} exceeds maximum",
                        value
                    )));
                }
                return Ok(value);
            }
            if shift >= 28 {
                break;
            }
        }
        Err(CoreError::malformed("ULEB128 value overflows u32"))
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.read_uleb128()?;
        usize::try_from(len).map_err(|_| CoreError::malformed("length does not fit in usize"))
    }

    fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_len()?;
        Ok(self.take(len)?.to_vec())
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_CONTAINER_DEPTH {
            return Err(CoreError::malformed("maximum container depth exceeded"));
        }
        Ok(())
    }

    fn read_value(&mut self, shape: &Shape) -> Result<Value> {
        let value = match shape {
            Shape::Unit => Value::Unit,
            Shape::U8 => Value::U8(self.read_u8()?),
            Shape::U16 => Value::U16(u16::from_le_bytes(self.take_array()?)),
            Shape::U32 => Value::U32(u32::from_le_bytes(self.take_array()?)),
            Shape::U64 => Value::U64(u64::from_le_bytes(self.take_array()?)),
            Shape::U128 => Value::U128(u128::from_le_bytes(self.take_array()?)),
            Shape::Bool => match self.read_u8()? {
                0 => Value::Bool(false),
                1 => Value::Bool(true),
                b => return Err(CoreError::malformed(format!("invalid bool byte {:#04x}", b))),
            },
            Shape::Bytes => Value::Bytes(self.read_bytes()?),
            Shape::FixedBytes(n) => Value::FixedBytes(self.take(*n)?.to_vec()),
            Shape::Seq(inner) => {
                self.enter()?;
                let len = self.read_len()?;
                // Untrusted length: cap the preallocation by the input size.
                let mut items = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    items.push(self.read_value(inner)?);
                }
                self.depth -= 1;
                Value::Seq(items)
            }
            Shape::Map(inner) => {
                self.enter()?;
                let len = self.read_len()?;
                let mut entries = BTreeMap::new();
                let input: &'a [u8] = self.input;
                let mut prev_key: Option<&'a [u8]> = None;
                for _ in 0..len {
                    let start = self.pos;
                    let key = self.read_bytes()?;
                    let encoded_key = &input[start..self.pos];
                    if let Some(prev) = prev_key {
                        if encoded_key <= prev {
                            return Err(CoreError::malformed(
                                "map keys not in canonical order or duplicated",
                            ));
                        }
                    }
                    prev_key = Some(encoded_key);
                    let value = self.read_value(inner)?;
                    entries.insert(key, value);
                }
                self.depth -= 1;
                Value::Map(entries)
            }
            Shape::Option(inner) => match self.read_u8()? {
                0 => Value::Option(None),
                1 => {
                    self.enter()?;
                    let value = self.read_value(inner)?;
                    self.depth -= 1;
                    Value::Option(Some(Box::new(value)))
                }
                t => return Err(CoreError::malformed(format!("invalid option tag {}", t))),
            },
            Shape::Variant(variants) => {
                let tag = self.read_uleb128()?;
                let payload_shape = usize::try_from(tag)
                    .ok()
                    .and_then(|i| variants.get(i))
                    .ok_or_else(|| {
                        CoreError::malformed(format!(
                            "variant tag {} out of range ({} variants)",
                            tag,
                            variants.len()
                        ))
                    })?;
                self.enter()?;
                let payload = self.read_value(payload_shape)?;
                self.depth -= 1;
                // tag < variants.len() <= usize, and read_uleb128 caps at u32::MAX
                Value::Variant(tag as u32, Box::new(payload))
            }
            Shape::Record(fields) => {
                self.enter()?;
                let mut values = Vec::with_capacity(fields.len());
                for (name, field_shape) in fields {
                    values.push((*name, self.read_value(field_shape)?));
                }
                self.depth -= 1;
                Value::Record(values)
            }
            Shape::Deferred(resolve) => {
                self.enter()?;
                let value = self.read_value(&resolve())?;
                self.depth -= 1;
                value
            }
        };
        Ok(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed layer
// ─────────────────────────────────────────────────────────────────────────────

/// A Rust type with a canonical encoding.
pub trait Canonical: Sized {
    /// The shape the decoder expects for this type.
    fn shape() -> Shape;

    /// Convert to a canonical value.
    fn to_value(&self) -> Value;

    /// Convert back from a decoded value.
    fn from_value(value: Value) -> Result<Self>;
}

/// Encode a typed value.
pub fn to_bytes<T: Canonical>(value: &T) -> Vec<u8> {
    encode(&value.to_value())
}

/// Decode a typed value; the whole input must be consumed.
pub fn from_bytes<T: Canonical>(bytes: &[u8]) -> Result<T> {
    T::from_value(decode(bytes, &T::shape())?)
}

fn unexpected(expected: &str, found: &Value) -> CoreError {
    CoreError::malformed(format!("expected {}, found {:?}", expected, found))
}

impl Value {
    /// Build a record value.
    pub fn record(fields: Vec<(&'static str, Value)>) -> Self {
        Value::Record(fields)
    }

    /// Build a variant value.
    pub fn variant(tag: u32, payload: Value) -> Self {
        Value::Variant(tag, Box::new(payload))
    }

    /// Build a map from key/value pairs in any order. Later duplicates win.
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<Vec<u8>>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Value::Bytes(b) => Ok(b),
            other => Err(unexpected("bytes", &other)),
        }
    }

    pub fn into_fixed_bytes<const N: usize>(self) -> Result<[u8; N]> {
        match self {
            Value::FixedBytes(b) if b.len() == N => {
                let mut arr = [0u8; N];
                arr.copy_from_slice(&b);
                Ok(arr)
            }
            other => Err(unexpected(&format!("{} fixed bytes", N), &other)),
        }
    }

    pub fn into_seq(self) -> Result<Vec<Value>> {
        match self {
            Value::Seq(items) => Ok(items),
            other => Err(unexpected("sequence", &other)),
        }
    }

    pub fn into_map(self) -> Result<BTreeMap<Vec<u8>, Value>> {
        match self {
            Value::Map(entries) => Ok(entries),
            other => Err(unexpected("map", &other)),
        }
    }

    pub fn into_variant(self) -> Result<(u32, Value)> {
        match self {
            Value::Variant(tag, payload) => Ok((tag, *payload)),
            other => Err(unexpected("variant", &other)),
        }
    }

    pub fn into_fields(self) -> Result<Fields> {
        match self {
            Value::Record(fields) => Ok(Fields {
                inner: fields.into_iter(),
            }),
            other => Err(unexpected("record", &other)),
        }
    }
}

/// Ordered reader over the fields of a decoded record.
pub struct Fields {
    inner: std::vec::IntoIter<(&'static str, Value)>,
}

impl Fields {
    /// Take the next field, which must carry the given name.
    pub fn take(&mut self, name: &str) -> Result<Value> {
        match self.inner.next() {
            Some((n, value)) if n == name => Ok(value),
            Some((n, _)) => Err(CoreError::malformed(format!(
                "expected field `{}`, found `{}`",
                name, n
            ))),
            None => Err(CoreError::malformed(format!("missing field `{}`", name))),
        }
    }

    /// Take and convert the next field.
    pub fn field<T: Canonical>(&mut self, name: &str) -> Result<T> {
        T::from_value(self.take(name)?)
    }
}

macro_rules! impl_canonical_uint {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Canonical for $ty {
                fn shape() -> Shape {
                    Shape::$variant
                }

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(n) => Ok(n),
                        other => Err(unexpected(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

impl_canonical_uint!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, u128 => U128);

impl Canonical for bool {
    fn shape() -> Shape {
        Shape::Bool
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(unexpected("bool", &other)),
        }
    }
}

/// Strings travel as their UTF-8 bytes.
impl Canonical for String {
    fn shape() -> Shape {
        Shape::Bytes
    }

    fn to_value(&self) -> Value {
        Value::Bytes(self.as_bytes().to_vec())
    }

    fn from_value(value: Value) -> Result<Self> {
        String::from_utf8(value.into_bytes()?)
            .map_err(|e| CoreError::malformed(format!("invalid utf-8: {}", e)))
    }
}

impl<const N: usize> Canonical for [u8; N] {
    fn shape() -> Shape {
        Shape::FixedBytes(N)
    }

    fn to_value(&self) -> Value {
        Value::FixedBytes(self.to_vec())
    }

    fn from_value(value: Value) -> Result<Self> {
        value.into_fixed_bytes()
    }
}

impl<T: Canonical> Canonical for Option<T> {
    fn shape() -> Shape {
        Shape::option(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Option(self.as_ref().map(|v| Box::new(v.to_value())))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Option(None) => Ok(None),
            Value::Option(Some(inner)) => Ok(Some(T::from_value(*inner)?)),
            other => Err(unexpected("option", &other)),
        }
    }
}

impl<T: Canonical> Canonical for Vec<T> {
    fn shape() -> Shape {
        Shape::seq(T::shape())
    }

    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(Canonical::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        value.into_seq()?.into_iter().map(T::from_value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    fn uleb(n: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_uleb128(&mut buf, n);
        buf
    }

    #[test]
    fn test_integer_encoding_little_endian() {
        assert_eq!(encode(&Value::U8(0xab)), vec![0xab]);
        assert_eq!(encode(&Value::U16(0x0102)), vec![0x02, 0x01]);
        assert_eq!(encode(&Value::U32(1)), vec![1, 0, 0, 0]);
        assert_eq!(
            encode(&Value::U64(0x0102030405060708)),
            vec![8, 7, 6, 5, 4, 3, 2, 1]
        );
        assert_eq!(encode(&Value::U128(1)).len(), 16);
    }

    #[test]
    fn test_uleb128_encoding() {
        assert_eq!(uleb(0), vec![0x00]);
        assert_eq!(uleb(1), vec![0x01]);
        assert_eq!(uleb(127), vec![0x7f]);
        assert_eq!(uleb(128), vec![0x80, 0x01]);
        assert_eq!(uleb(300), vec![0xac, 0x02]);
        assert_eq!(uleb(16384), vec![0x80, 0x80, 0x01]);
        assert_eq!(uleb(u32::MAX as u64), vec![0xff, 0xff, 0xff, 0xff, 0x0f]);
    }

    #[test]
    fn test_bytes_and_option_encoding() {
        assert_eq!(encode(&Value::Bytes(vec![1, 2, 3])), vec![3, 1, 2, 3]);
        assert_eq!(encode(&Value::FixedBytes(vec![1, 2, 3])), vec![1, 2, 3]);
        assert_eq!(encode(&Value::Option(None)), vec![0]);
        assert_eq!(
            encode(&Value::Option(Some(Box::new(Value::Bool(true))))),
            vec![1, 1]
        );
        assert_eq!(encode(&Value::variant(2, Value::U8(9))), vec![2, 9]);
    }

    #[test]
    fn test_record_has_no_prefix() {
        let record = Value::record(vec![("a", Value::U8(1)), ("b", Value::U16(2))]);
        assert_eq!(encode(&record), vec![1, 2, 0]);
    }

    #[test]
    fn test_map_key_ordering() {
        // "b" encodes as [01 62], "aa" as [02 61 61]: the prefix decides.
        let map = Value::map(vec![
            (b"aa".to_vec(), Value::U8(1)),
            (b"b".to_vec(), Value::U8(2)),
        ]);
        assert_eq!(
            encode(&map),
            vec![0x02, 0x01, b'b', 0x02, 0x02, b'a', b'a', 0x01]
        );
    }

    #[test]
    fn test_map_insertion_order_irrelevant() {
        let a = Value::map(vec![
            (b"x".to_vec(), Value::U8(1)),
            (b"yy".to_vec(), Value::U8(2)),
            (b"z".to_vec(), Value::U8(3)),
        ]);
        let b = Value::map(vec![
            (b"z".to_vec(), Value::U8(3)),
            (b"x".to_vec(), Value::U8(1)),
            (b"yy".to_vec(), Value::U8(2)),
        ]);
        assert_eq!(encode(&a), encode(&b));
    }

    #[test]
    fn test_roundtrip_nested() {
        let shape = Shape::Record(vec![
            ("id", Shape::U64),
            ("tags", Shape::seq(Shape::Bytes)),
            ("extra", Shape::option(Shape::map(Shape::Bool))),
            ("kind", Shape::Variant(vec![Shape::Unit, Shape::U32])),
        ]);
        let value = Value::record(vec![
            ("id", Value::U64(42)),
            (
                "tags",
                Value::Seq(vec![Value::Bytes(b"one".to_vec()), Value::Bytes(vec![])]),
            ),
            (
                "extra",
                Value::Option(Some(Box::new(Value::map(vec![
                    (b"k".to_vec(), Value::Bool(true)),
                    (b"kk".to_vec(), Value::Bool(false)),
                ])))),
            ),
            ("kind", Value::variant(1, Value::U32(7))),
        ]);

        let bytes = encode(&value);
        assert_eq!(decode(&bytes, &shape).unwrap(), value);
    }

    #[test]
    fn test_decode_rejects_short_input() {
        let err = decode(&[1, 2, 3], &Shape::U64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);

        // Length prefix claims more than is present.
        let err = decode(&[5, 1, 2], &Shape::Bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let err = decode(&[1, 0, 0], &Shape::U16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_decode_rejects_invalid_tags() {
        assert!(decode(&[2], &Shape::Bool).is_err());
        assert!(decode(&[2, 0], &Shape::option(Shape::U8)).is_err());
        assert!(decode(&[3, 0], &Shape::Variant(vec![Shape::Unit, Shape::U8])).is_err());
    }

    #[test]
    fn test_decode_rejects_non_canonical_uleb() {
        // 1 encoded in two bytes
        let err = decode(&[0x81, 0x00, 0xff], &Shape::Bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);

        // Does not fit in u32
        let err = decode(&[0xff, 0xff, 0xff, 0xff, 0x1f], &Shape::Bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);

        // Continuation bit set on the last available byte
        assert!(decode(&[0x80], &Shape::Bytes).is_err());
    }

    #[test]
    fn test_decode_rejects_unsorted_or_duplicate_map_keys() {
        let shape = Shape::map(Shape::U8);
        // "aa" before "b": wrong order
        let unsorted = vec![0x02, 0x02, b'a', b'a', 0x01, 0x01, b'b', 0x02];
        assert!(decode(&unsorted, &shape).is_err());

        let duplicate = vec![0x02, 0x01, b'b', 0x01, 0x01, b'b', 0x02];
        assert!(decode(&duplicate, &shape).is_err());
    }

    #[test]
    fn test_decode_huge_length_does_not_allocate() {
        // Claims u32::MAX elements, provides none.
        let err = decode(&[0xff, 0xff, 0xff, 0xff, 0x0f], &Shape::seq(Shape::U64)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_deferred_shape_depth_limit() {
        fn nested() -> Shape {
            Shape::Variant(vec![Shape::Unit, Shape::Deferred(nested)])
        }
        let mut bytes = vec![1u8; MAX_CONTAINER_DEPTH];
        bytes.push(0);
        let err = decode(&bytes, &nested()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);

        let ok = decode(&[1, 1, 0], &nested()).unwrap();
        assert_eq!(
            ok,
            Value::variant(1, Value::variant(1, Value::variant(0, Value::Unit)))
        );
    }

    #[test]
    fn test_typed_helpers() {
        let v: Vec<Option<u64>> = vec![Some(1), None, Some(u64::MAX)];
        let bytes = to_bytes(&v);
        assert_eq!(from_bytes::<Vec<Option<u64>>>(&bytes).unwrap(), v);

        let s = String::from("héllo");
        assert_eq!(from_bytes::<String>(&to_bytes(&s)).unwrap(), s);

        assert!(from_bytes::<String>(&[2, 0xff, 0xfe]).is_err());
    }

    proptest! {
        #[test]
        fn test_map_encoding_order_independent(
            entries in prop::collection::btree_map(
                prop::collection::vec(any::<u8>(), 0..8),
                any::<u64>(),
                0..16,
            ),
        ) {
            let forward: Vec<_> = entries.iter().map(|(k, v)| (k.clone(), Value::U64(*v))).collect();
            let mut backward = forward.clone();
            backward.reverse();

            let a = encode(&Value::map(forward));
            let b = encode(&Value::map(backward));
            prop_assert_eq!(&a, &b);

            let decoded = decode(&a, &Shape::map(Shape::U64)).unwrap();
            prop_assert_eq!(encode(&decoded), a);
        }

        #[test]
        fn test_decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let shape = Shape::Record(vec![
                ("a", Shape::option(Shape::Bytes)),
                ("b", Shape::map(Shape::seq(Shape::U16))),
                ("c", Shape::Variant(vec![Shape::Unit, Shape::Bool])),
            ]);
            let _ = decode(&bytes, &shape);
        }
    }
}
