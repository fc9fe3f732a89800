//! # ledgerlink RPC
//!
//! JSON-RPC client for a ledger node: submit signed transactions, query
//! accounts, account state with proofs, event streams, currencies and
//! metadata.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ledgerlink_rpc::{Client, RpcConfig};
//! use ledgerlink_core::Address;
//!
//! async fn example() -> ledgerlink_rpc::Result<()> {
//!     let client = Client::connect(&RpcConfig::new("http://127.0.0.1:8080"))?;
//!     let account = client.get_account(Address::ZERO, None).await?;
//!     println!("sequence number: {:?}", account.sequence_number);
//!     Ok(())
//! }
//! ```
//!
//! ## Error flow
//!
//! ```text
//! HTTP status not 2xx   -> Transport { status, body }
//! body not JSON         -> MalformedResponse
//! "error" not null      -> RemoteRejected { code, message }
//! result ill-typed      -> MalformedResponse
//! ```
//!
//! Proofs are transported as bytes; verifying them is out of scope here.

pub mod client;
pub mod config;
pub mod error;
pub mod messages;
pub mod transport;
pub mod views;

pub use client::Client;
pub use config::{ProxyConfig, RpcConfig};
pub use error::{Result, RpcError};
pub use messages::{JsonRpcRequest, JsonRpcResponse};
pub use transport::{memory::MemoryTransport, HttpResponse, HttpTransport, Transport};
pub use views::{
    AccountStateProof, AccountStateWithProof, AccountView, AmountView, CurrencyInfoView,
    EventData, EventView, MetadataView, PaymentEvent, SubmitReceipt,
};
