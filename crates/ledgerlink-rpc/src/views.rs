//! Typed views of JSON-RPC results.
//!
//! Unknown JSON fields are ignored everywhere. Byte strings arrive as hex and
//! are decoded on deserialization; bad hex is a deserialization error, which
//! the client reports as a malformed response. Event payloads are the
//! exception: see [`EventData::from_json`].

use bytes::Bytes;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use ledgerlink_core::Address;

/// Reported by the node when a transaction is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Ledger version at the time the node accepted the submission.
    pub ledger_version: u64,
}

/// An amount of one currency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AmountView {
    pub amount: u64,
    pub currency: String,
}

/// Account summary returned by `get_account`.
///
/// A `null` result (unknown account) maps to the default view, whose
/// `sequence_number` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountView {
    #[serde(default)]
    pub sequence_number: Option<u64>,
    #[serde(default, deserialize_with = "hex_serde::opt_address")]
    pub address: Option<Address>,
    #[serde(default, deserialize_with = "hex_serde::opt_bytes")]
    pub authentication_key: Option<Bytes>,
    #[serde(default)]
    pub balances: Vec<AmountView>,
    #[serde(default)]
    pub is_frozen: Option<bool>,
    #[serde(default)]
    pub sent_events_key: Option<String>,
    #[serde(default)]
    pub received_events_key: Option<String>,
}

/// Proof material accompanying an account state. Carried, never verified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountStateProof {
    #[serde(deserialize_with = "hex_serde::bytes")]
    pub ledger_info_to_transaction_info_proof: Bytes,
    #[serde(deserialize_with = "hex_serde::bytes")]
    pub transaction_info: Bytes,
    #[serde(deserialize_with = "hex_serde::bytes")]
    pub transaction_info_to_account_proof: Bytes,
}

/// Result of `get_account_state_with_proof`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountStateWithProof {
    pub version: u64,
    /// Canonical account state; absent when the account does not exist.
    #[serde(default, deserialize_with = "hex_serde::opt_bytes")]
    pub blob: Option<Bytes>,
    pub proof: AccountStateProof,
}

/// Payload of a payment event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentEvent {
    pub amount: AmountView,
    #[serde(deserialize_with = "hex_serde::address")]
    pub sender: Address,
    #[serde(deserialize_with = "hex_serde::address")]
    pub receiver: Address,
    #[serde(default, deserialize_with = "hex_serde::opt_bytes")]
    pub metadata: Option<Bytes>,
}

/// Event payload, dispatched on its `type` tag.
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    /// `type: "unknown"` with hex-decoded bytes.
    Unknown { bytes: Bytes },
    SentPayment(PaymentEvent),
    ReceivedPayment(PaymentEvent),
    /// A tag this client does not model. The raw JSON is kept.
    Opaque { kind: String, raw: Value },
}

impl EventData {
    pub const UNKNOWN: &'static str = "unknown";
    pub const SENT_PAYMENT: &'static str = "sentpayment";
    pub const RECEIVED_PAYMENT: &'static str = "receivedpayment";

    /// Interpret a `data` object.
    ///
    /// A payload that does not decode under its tag, or carries no tag, is
    /// kept as [`EventData::Opaque`] so one bad event never fails a stream.
    pub fn from_json(raw: Value) -> Self {
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let typed = match kind.as_str() {
            Self::UNKNOWN => {
                #[derive(Deserialize)]
                struct Unknown {
                    #[serde(deserialize_with = "hex_serde::bytes")]
                    bytes: Bytes,
                }
                Unknown::deserialize(&raw).map(|Unknown { bytes }| EventData::Unknown { bytes })
            }
            Self::SENT_PAYMENT => PaymentEvent::deserialize(&raw).map(EventData::SentPayment),
            Self::RECEIVED_PAYMENT => {
                PaymentEvent::deserialize(&raw).map(EventData::ReceivedPayment)
            }
            _ => Err(de::Error::custom("unrecognized event type")),
        };

        match typed {
            Ok(data) => data,
            Err(e) => {
                if matches!(
                    kind.as_str(),
                    Self::UNKNOWN | Self::SENT_PAYMENT | Self::RECEIVED_PAYMENT
                ) {
                    tracing::warn!(kind = %kind, error = %e, "event payload does not match its type");
                }
                EventData::Opaque { kind, raw }
            }
        }
    }

    /// The `type` tag this payload was decoded from.
    pub fn kind(&self) -> &str {
        match self {
            EventData::Unknown { .. } => Self::UNKNOWN,
            EventData::SentPayment(_) => Self::SENT_PAYMENT,
            EventData::ReceivedPayment(_) => Self::RECEIVED_PAYMENT,
            EventData::Opaque { kind, .. } => kind.as_str(),
        }
    }
}

impl<'de> Deserialize<'de> for EventData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(EventData::from_json)
    }
}

/// One entry of an event stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventView {
    pub key: String,
    pub sequence_number: u64,
    pub transaction_version: u64,
    pub data: EventData,
}

/// Description of a currency known to the ledger.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrencyInfoView {
    pub code: String,
    pub scaling_factor: u64,
    #[serde(default)]
    pub fractional_part: u64,
    /// Total amount in circulation, in base units.
    #[serde(default)]
    pub total_value: Option<u64>,
    /// Amount waiting to be burned, in base units.
    #[serde(default)]
    pub preburn_value: Option<u64>,
    #[serde(default, alias = "to_lbr_exchange_rate")]
    pub to_xdx_exchange_rate: Option<f64>,
    #[serde(default)]
    pub mint_events_key: Option<String>,
    #[serde(default)]
    pub burn_events_key: Option<String>,
    #[serde(default)]
    pub preburn_events_key: Option<String>,
}

/// Ledger metadata at a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MetadataView {
    pub version: u64,
    /// Microseconds since the epoch.
    pub timestamp: u64,
    pub chain_id: u8,
}

/// serde helpers for hex-encoded fields.
mod hex_serde {
    use super::*;

    fn decode<E: de::Error>(s: &str) -> std::result::Result<Bytes, E> {
        ::hex::decode(s)
            .map(Bytes::from)
            .map_err(|e| E::custom(format!("invalid hex: {}", e)))
    }

    pub fn bytes<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Bytes, D::Error> {
        let s = String::deserialize(d)?;
        decode(&s)
    }

    pub fn opt_bytes<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<Bytes>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(s) => decode(&s).map(Some),
            None => Ok(None),
        }
    }

    pub fn address<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Address, D::Error> {
        let s = String::deserialize(d)?;
        Address::from_hex(&s).map_err(de::Error::custom)
    }

    pub fn opt_address<'de, D: Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Option<Address>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(s) => Address::from_hex(&s).map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}
