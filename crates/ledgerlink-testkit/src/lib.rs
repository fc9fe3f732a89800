//! # ledgerlink testkit
//!
//! Testing utilities for ledgerlink.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known encodings and the known Ed25519 vector
//! - **Generators**: Proptest strategies for shapes, values, keys and transactions
//! - **Fixtures**: Canned JSON-RPC responses and a client on a scripted transport
//!
//! ## Golden Vectors
//!
//! ```rust
//! use ledgerlink_testkit::vectors::verify_codec_vectors;
//!
//! assert!(verify_codec_vectors().is_empty());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use ledgerlink_core::canonical;
//! use ledgerlink_testkit::generators::shaped_value;
//!
//! proptest! {
//!     #[test]
//!     fn decode_inverts_encode((shape, value) in shaped_value()) {
//!         let bytes = canonical::encode(&value);
//!         prop_assert_eq!(canonical::decode(&bytes, &shape).unwrap(), value);
//!     }
//! }
//! ```
//!
//! ## RPC Fixtures
//!
//! ```rust
//! use ledgerlink_testkit::fixtures::{metadata, RpcFixture};
//!
//! let fixture = RpcFixture::with_seed([1; 32]);
//! fixture.respond(metadata(10, 4));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::RpcFixture;
pub use generators::{private_key, raw_transaction, shaped_value};
pub use vectors::{codec_vectors, known_private_key, verify_codec_vectors, CodecVector};
