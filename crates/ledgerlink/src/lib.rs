//! # ledgerlink
//!
//! Client-side core for a permissioned ledger: canonical encoding of typed
//! values, Ed25519 key handling over that encoding, and a JSON-RPC client that
//! submits signed transactions and reads accounts, proofs and events.
//!
//! ## Overview
//!
//! Three pieces must agree bit-for-bit:
//!
//! - **Canonical codec**: deterministic encode/decode of typed values
//! - **Keys and signatures**: Ed25519 over codec output
//! - **RPC client**: hex-encodes signed payloads, submits them, decodes views
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ledgerlink::{BlockingClient, PrivateKey, RawTransactionBuilder, RpcConfig, Script};
//! use ledgerlink::{ChainId, Result};
//!
//! fn example() -> Result<()> {
//!     let key = PrivateKey::generate()?;
//!     let sender = key.public_key().derived_address();
//!
//!     let client = BlockingClient::connect(&RpcConfig::from_env("http://127.0.0.1:8080"))?;
//!     let account = client.get_account(sender, None)?;
//!
//!     let txn = RawTransactionBuilder::new(
//!         sender,
//!         account.sequence_number.unwrap_or(0),
//!         Script::new(vec![], vec![], vec![]).into(),
//!         ChainId::new(4),
//!     )
//!     .sign(&key)?;
//!
//!     let receipt = client.submit_transaction(&txn)?;
//!     println!("accepted at version {}", receipt.ledger_version);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `ledgerlink::core` - codec, keys, transaction records
//! - `ledgerlink::rpc` - async client, transports, views

pub mod blocking;
pub mod error;

// Re-export component crates
pub use ledgerlink_core as core;
pub use ledgerlink_rpc as rpc;

pub use blocking::BlockingClient;
pub use error::{Error, Result};

// Re-export commonly used types
pub use ledgerlink_core::{
    decode, encode, Address, AuthenticationKey, Canonical, ChainId, ErrorKind, PrivateKey,
    PublicKey, RawKey, RawTransaction, RawTransactionBuilder, Script, Shape, Signature,
    SignedTransaction, TransactionPayload, Value,
};
pub use ledgerlink_rpc::{
    AccountStateWithProof, AccountView, Client, CurrencyInfoView, EventData, EventView,
    MetadataView, ProxyConfig, RpcConfig, SubmitReceipt,
};
