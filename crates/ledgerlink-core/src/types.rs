//! Strong type definitions for ledgerlink.
//!
//! Fixed-size byte strings are newtypes to prevent misuse at compile time.

use std::fmt;

use crate::canonical::{Canonical, Shape, Value};
use crate::error::{CoreError, Result};

/// Length of a raw Ed25519 key.
pub const RAW_KEY_LENGTH: usize = 32;

/// Length of an account address.
pub const ADDRESS_LENGTH: usize = 16;

/// The 32-byte normalized form of a key, independent of any key handle.
///
/// The textual form is a historical artifact kept for compatibility with keys
/// already persisted by other tools: the first hex pair of the string is the
/// *last* byte of the array. [`RawKey::from_hex`] and [`RawKey::to_hex`] both
/// apply the reversal, so text round-trips unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawKey(pub [u8; RAW_KEY_LENGTH]);

impl RawKey {
    /// Create from raw bytes (no reordering).
    pub const fn from_bytes(bytes: [u8; RAW_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; RAW_KEY_LENGTH] {
        &self.0
    }

    /// Parse from exactly 64 hex characters, storing bytes in reverse order.
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != RAW_KEY_LENGTH * 2 {
            return Err(CoreError::InvalidEncoding(format!(
                "hex key must be {} characters, got {}",
                RAW_KEY_LENGTH * 2,
                s.len()
            )));
        }
        let mut arr = [0u8; RAW_KEY_LENGTH];
        hex::decode_to_slice(s, &mut arr)?;
        arr.reverse();
        Ok(Self(arr))
    }

    /// Lowercase hex, most significant (last) byte first.
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }
}

// Raw keys may hold private material: never print the bytes.
impl fmt::Debug for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawKey(..)")
    }
}

impl AsRef<[u8]> for RawKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; RAW_KEY_LENGTH]> for RawKey {
    fn from(bytes: [u8; RAW_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

/// A 16-byte account address.
///
/// Text form is plain lowercase hex, no prefix, no reordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LENGTH]);

impl Address {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string (32 characters, optional `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != ADDRESS_LENGTH * 2 {
            return Err(CoreError::InvalidEncoding(format!(
                "address must be {} hex characters, got {}",
                ADDRESS_LENGTH * 2,
                s.len()
            )));
        }
        let mut arr = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }

    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = CoreError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let arr: [u8; ADDRESS_LENGTH] = slice.try_into().map_err(|_| {
            CoreError::Malformed(format!(
                "address must be {} bytes, got {}",
                ADDRESS_LENGTH,
                slice.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl Canonical for Address {
    fn shape() -> Shape {
        Shape::FixedBytes(ADDRESS_LENGTH)
    }

    fn to_value(&self) -> Value {
        Value::FixedBytes(self.0.to_vec())
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(Self(value.into_fixed_bytes()?))
    }
}

/// Identifies the network a transaction is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u8);

impl ChainId {
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Canonical for ChainId {
    fn shape() -> Shape {
        Shape::U8
    }

    fn to_value(&self) -> Value {
        Value::U8(self.0)
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(Self(u8::from_value(value)?))
    }
}
