//! Transaction records: the values a client builds, signs and submits.
//!
//! Layouts follow the ledger's canonical encoding field for field. Enum tags
//! are positional, so variants the client never produces keep their slot and
//! are rejected on decode.

use std::time::{SystemTime, UNIX_EPOCH};

use sha3::{Digest, Sha3_256};

use crate::canonical::{to_bytes, Canonical, Shape, Value};
use crate::crypto::{PrivateKey, PublicKey, Signature};
use crate::error::{CoreError, Result};
use crate::types::{Address, ChainId, RawKey, RAW_KEY_LENGTH};

/// Domain separator hashed into the prefix of every signing message.
pub const RAW_TRANSACTION_SALT: &[u8] = b"DIEM::RawTransaction";

/// Default gas limit for new transactions.
pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 1_000_000;

/// Default gas currency.
pub const DEFAULT_GAS_CURRENCY: &str = "XUS";

/// Default validity window, in seconds from build time.
pub const DEFAULT_EXPIRATION_SECS: u64 = 100;

/// A type argument to a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

/// A fully qualified struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructTag {
    pub address: Address,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl Canonical for TypeTag {
    fn shape() -> Shape {
        Shape::Variant(vec![
            Shape::Unit,
            Shape::Unit,
            Shape::Unit,
            Shape::Unit,
            Shape::Unit,
            Shape::Unit,
            Shape::Deferred(TypeTag::shape),
            Shape::Deferred(StructTag::shape),
        ])
    }

    fn to_value(&self) -> Value {
        match self {
            TypeTag::Bool => Value::variant(0, Value::Unit),
            TypeTag::U8 => Value::variant(1, Value::Unit),
            TypeTag::U64 => Value::variant(2, Value::Unit),
            TypeTag::U128 => Value::variant(3, Value::Unit),
            TypeTag::Address => Value::variant(4, Value::Unit),
            TypeTag::Signer => Value::variant(5, Value::Unit),
            TypeTag::Vector(inner) => Value::variant(6, inner.to_value()),
            TypeTag::Struct(tag) => Value::variant(7, tag.to_value()),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        let (tag, payload) = value.into_variant()?;
        Ok(match tag {
            0 => TypeTag::Bool,
            1 => TypeTag::U8,
            2 => TypeTag::U64,
            3 => TypeTag::U128,
            4 => TypeTag::Address,
            5 => TypeTag::Signer,
            6 => TypeTag::Vector(Box::new(TypeTag::from_value(payload)?)),
            7 => TypeTag::Struct(Box::new(StructTag::from_value(payload)?)),
            t => return Err(CoreError::Malformed(format!("invalid type tag {}", t))),
        })
    }
}

impl Canonical for StructTag {
    fn shape() -> Shape {
        Shape::Record(vec![
            ("address", Address::shape()),
            ("module", String::shape()),
            ("name", String::shape()),
            ("type_params", Vec::<TypeTag>::shape()),
        ])
    }

    fn to_value(&self) -> Value {
        Value::record(vec![
            ("address", self.address.to_value()),
            ("module", self.module.to_value()),
            ("name", self.name.to_value()),
            ("type_params", self.type_params.to_value()),
        ])
    }

    fn from_value(value: Value) -> Result<Self> {
        let mut fields = value.into_fields()?;
        Ok(Self {
            address: fields.field("address")?,
            module: fields.field("module")?,
            name: fields.field("name")?,
            type_params: fields.field("type_params")?,
        })
    }
}

/// A value argument to a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionArgument {
    U8(u8),
    U64(u64),
    U128(u128),
    Address(Address),
    U8Vector(Vec<u8>),
    Bool(bool),
}

impl Canonical for TransactionArgument {
    fn shape() -> Shape {
        Shape::Variant(vec![
            Shape::U8,
            Shape::U64,
            Shape::U128,
            Address::shape(),
            Shape::Bytes,
            Shape::Bool,
        ])
    }

    fn to_value(&self) -> Value {
        match self {
            TransactionArgument::U8(n) => Value::variant(0, n.to_value()),
            TransactionArgument::U64(n) => Value::variant(1, n.to_value()),
            TransactionArgument::U128(n) => Value::variant(2, n.to_value()),
            TransactionArgument::Address(a) => Value::variant(3, a.to_value()),
            TransactionArgument::U8Vector(b) => Value::variant(4, Value::Bytes(b.clone())),
            TransactionArgument::Bool(b) => Value::variant(5, b.to_value()),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        let (tag, payload) = value.into_variant()?;
        Ok(match tag {
            0 => TransactionArgument::U8(u8::from_value(payload)?),
            1 => TransactionArgument::U64(u64::from_value(payload)?),
            2 => TransactionArgument::U128(u128::from_value(payload)?),
            3 => TransactionArgument::Address(Address::from_value(payload)?),
            4 => TransactionArgument::U8Vector(payload.into_bytes()?),
            5 => TransactionArgument::Bool(bool::from_value(payload)?),
            t => return Err(CoreError::Malformed(format!("invalid argument tag {}", t))),
        })
    }
}

/// Bytecode to execute once, with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub code: Vec<u8>,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<TransactionArgument>,
}

impl Script {
    pub fn new(code: Vec<u8>, ty_args: Vec<TypeTag>, args: Vec<TransactionArgument>) -> Self {
        Self {
            code,
            ty_args,
            args,
        }
    }
}

impl Canonical for Script {
    fn shape() -> Shape {
        Shape::Record(vec![
            ("code", Shape::Bytes),
            ("ty_args", Vec::<TypeTag>::shape()),
            ("args", Vec::<TransactionArgument>::shape()),
        ])
    }

    fn to_value(&self) -> Value {
        Value::record(vec![
            ("code", Value::Bytes(self.code.clone())),
            ("ty_args", self.ty_args.to_value()),
            ("args", self.args.to_value()),
        ])
    }

    fn from_value(value: Value) -> Result<Self> {
        let mut fields = value.into_fields()?;
        Ok(Self {
            code: fields.take("code")?.into_bytes()?,
            ty_args: fields.field("ty_args")?,
            args: fields.field("args")?,
        })
    }
}

/// What a transaction does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Tag 1.
    Script(Script),
    /// Tag 2: publish a module.
    Module(Vec<u8>),
}

impl From<Script> for TransactionPayload {
    fn from(script: Script) -> Self {
        TransactionPayload::Script(script)
    }
}

impl Canonical for TransactionPayload {
    fn shape() -> Shape {
        Shape::Variant(vec![
            // 0: write sets are produced only by genesis tooling
            Shape::Unit,
            Script::shape(),
            Shape::Record(vec![("code", Shape::Bytes)]),
        ])
    }

    fn to_value(&self) -> Value {
        match self {
            TransactionPayload::Script(script) => Value::variant(1, script.to_value()),
            TransactionPayload::Module(code) => Value::variant(
                2,
                Value::record(vec![("code", Value::Bytes(code.clone()))]),
            ),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        let (tag, payload) = value.into_variant()?;
        match tag {
            1 => Ok(TransactionPayload::Script(Script::from_value(payload)?)),
            2 => {
                let mut fields = payload.into_fields()?;
                Ok(TransactionPayload::Module(fields.take("code")?.into_bytes()?))
            }
            0 => Err(CoreError::Malformed("write-set payloads are not supported".into())),
            t => Err(CoreError::Malformed(format!("invalid payload tag {}", t))),
        }
    }
}

/// An unsigned transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTransaction {
    pub sender: Address,
    pub sequence_number: u64,
    pub payload: TransactionPayload,
    pub max_gas_amount: u64,
    pub gas_unit_price: u64,
    pub gas_currency_code: String,
    pub expiration_timestamp_secs: u64,
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// The bytes that get signed: `SHA3-256(salt) || canonical(self)`.
    pub fn signing_message(&self) -> Vec<u8> {
        let prefix = Sha3_256::digest(RAW_TRANSACTION_SALT);
        let mut message = prefix.to_vec();
        message.extend_from_slice(&to_bytes(self));
        message
    }

    /// Sign and wrap into a [`SignedTransaction`].
    pub fn sign(self, key: &PrivateKey) -> Result<SignedTransaction> {
        let signature = key.sign(&self.signing_message())?;
        Ok(SignedTransaction {
            raw_txn: self,
            authenticator: TransactionAuthenticator::Ed25519 {
                public_key: key.public_key().to_raw(),
                signature,
            },
        })
    }
}

impl Canonical for RawTransaction {
    fn shape() -> Shape {
        Shape::Record(vec![
            ("sender", Address::shape()),
            ("sequence_number", Shape::U64),
            ("payload", TransactionPayload::shape()),
            ("max_gas_amount", Shape::U64),
            ("gas_unit_price", Shape::U64),
            ("gas_currency_code", String::shape()),
            ("expiration_timestamp_secs", Shape::U64),
            ("chain_id", ChainId::shape()),
        ])
    }

    fn to_value(&self) -> Value {
        Value::record(vec![
            ("sender", self.sender.to_value()),
            ("sequence_number", self.sequence_number.to_value()),
            ("payload", self.payload.to_value()),
            ("max_gas_amount", self.max_gas_amount.to_value()),
            ("gas_unit_price", self.gas_unit_price.to_value()),
            ("gas_currency_code", self.gas_currency_code.to_value()),
            (
                "expiration_timestamp_secs",
                self.expiration_timestamp_secs.to_value(),
            ),
            ("chain_id", self.chain_id.to_value()),
        ])
    }

    fn from_value(value: Value) -> Result<Self> {
        let mut fields = value.into_fields()?;
        Ok(Self {
            sender: fields.field("sender")?,
            sequence_number: fields.field("sequence_number")?,
            payload: fields.field("payload")?,
            max_gas_amount: fields.field("max_gas_amount")?,
            gas_unit_price: fields.field("gas_unit_price")?,
            gas_currency_code: fields.field("gas_currency_code")?,
            expiration_timestamp_secs: fields.field("expiration_timestamp_secs")?,
            chain_id: fields.field("chain_id")?,
        })
    }
}

/// Builder for raw transactions.
pub struct RawTransactionBuilder {
    sender: Address,
    sequence_number: u64,
    payload: TransactionPayload,
    chain_id: ChainId,
    max_gas_amount: u64,
    gas_unit_price: u64,
    gas_currency_code: String,
    expiration_timestamp_secs: Option<u64>,
}

impl RawTransactionBuilder {
    pub fn new(
        sender: Address,
        sequence_number: u64,
        payload: TransactionPayload,
        chain_id: ChainId,
    ) -> Self {
        Self {
            sender,
            sequence_number,
            payload,
            chain_id,
            max_gas_amount: DEFAULT_MAX_GAS_AMOUNT,
            gas_unit_price: 0,
            gas_currency_code: DEFAULT_GAS_CURRENCY.to_string(),
            expiration_timestamp_secs: None,
        }
    }

    pub fn max_gas_amount(mut self, amount: u64) -> Self {
        self.max_gas_amount = amount;
        self
    }

    pub fn gas_unit_price(mut self, price: u64) -> Self {
        self.gas_unit_price = price;
        self
    }

    pub fn gas_currency_code(mut self, code: impl Into<String>) -> Self {
        self.gas_currency_code = code.into();
        self
    }

    /// Absolute expiration; defaults to now + [`DEFAULT_EXPIRATION_SECS`].
    pub fn expiration_timestamp_secs(mut self, secs: u64) -> Self {
        self.expiration_timestamp_secs = Some(secs);
        self
    }

    pub fn build(self) -> RawTransaction {
        let expiration_timestamp_secs = self
            .expiration_timestamp_secs
            .unwrap_or_else(|| now_secs().saturating_add(DEFAULT_EXPIRATION_SECS));
        RawTransaction {
            sender: self.sender,
            sequence_number: self.sequence_number,
            payload: self.payload,
            max_gas_amount: self.max_gas_amount,
            gas_unit_price: self.gas_unit_price,
            gas_currency_code: self.gas_currency_code,
            expiration_timestamp_secs,
            chain_id: self.chain_id,
        }
    }

    /// Build and sign.
    pub fn sign(self, key: &PrivateKey) -> Result<SignedTransaction> {
        self.build().sign(key)
    }
}

/// Proof of authorization attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    /// Tag 0. Multi-signature (tag 1) is not produced by this client.
    Ed25519 {
        public_key: RawKey,
        signature: Signature,
    },
}

impl Canonical for TransactionAuthenticator {
    fn shape() -> Shape {
        Shape::Variant(vec![Shape::Record(vec![
            ("public_key", Shape::Bytes),
            ("signature", Shape::Bytes),
        ])])
    }

    fn to_value(&self) -> Value {
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => Value::variant(
                0,
                Value::record(vec![
                    ("public_key", Value::Bytes(public_key.as_bytes().to_vec())),
                    ("signature", Value::Bytes(signature.as_bytes().to_vec())),
                ]),
            ),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        let (tag, payload) = value.into_variant()?;
        if tag != 0 {
            return Err(CoreError::Malformed(format!("invalid authenticator tag {}", tag)));
        }
        let mut fields = payload.into_fields()?;
        let public_key = fields.take("public_key")?.into_bytes()?;
        let public_key: [u8; RAW_KEY_LENGTH] = public_key.as_slice().try_into().map_err(|_| {
            CoreError::Malformed(format!("public key must be 32 bytes, got {}", public_key.len()))
        })?;
        let signature = fields.take("signature")?.into_bytes()?;
        Ok(TransactionAuthenticator::Ed25519 {
            public_key: RawKey::from_bytes(public_key),
            signature: Signature::try_from(signature.as_slice())?,
        })
    }
}

/// A transaction ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw_txn: RawTransaction,
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Check the embedded signature against the embedded public key.
    pub fn verify_signature(&self) -> Result<bool> {
        match &self.authenticator {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => PublicKey::from_raw(*public_key).verify(signature, &self.raw_txn.signing_message()),
        }
    }

    /// Canonical bytes, as submitted to the ledger.
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        to_bytes(self)
    }
}

impl Canonical for SignedTransaction {
    fn shape() -> Shape {
        Shape::Record(vec![
            ("raw_txn", RawTransaction::shape()),
            ("authenticator", TransactionAuthenticator::shape()),
        ])
    }

    fn to_value(&self) -> Value {
        Value::record(vec![
            ("raw_txn", self.raw_txn.to_value()),
            ("authenticator", self.authenticator.to_value()),
        ])
    }

    fn from_value(value: Value) -> Result<Self> {
        let mut fields = value.into_fields()?;
        Ok(Self {
            raw_txn: fields.field("raw_txn")?,
            authenticator: fields.field("authenticator")?,
        })
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
