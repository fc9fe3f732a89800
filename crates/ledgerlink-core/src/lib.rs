//! # ledgerlink core
//!
//! Pure primitives for ledgerlink: canonical encoding, Ed25519 keys and
//! transaction records.
//!
//! This crate contains no I/O and no networking. It is pure computation over
//! byte strings.
//!
//! ## Key Types
//!
//! - [`Value`] / [`Shape`] - Canonical values and their out-of-band shapes
//! - [`PrivateKey`] / [`PublicKey`] - Exclusively owned Ed25519 key handles
//! - [`RawKey`] - The 32-byte normalized key form
//! - [`Address`] - 16-byte account address
//! - [`SignedTransaction`] - What gets submitted to the ledger
//!
//! ## Canonicalization
//!
//! Every value has exactly one encoding. See the [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod transaction;
pub mod types;

pub use canonical::{decode, encode, from_bytes, to_bytes, Canonical, Shape, Value};
pub use crypto::{AuthenticationKey, PrivateKey, PublicKey, Signature};
pub use error::{CoreError, ErrorKind};
pub use transaction::{
    RawTransaction, RawTransactionBuilder, Script, SignedTransaction, StructTag,
    TransactionArgument, TransactionAuthenticator, TransactionPayload, TypeTag,
};
pub use types::{Address, ChainId, RawKey};
