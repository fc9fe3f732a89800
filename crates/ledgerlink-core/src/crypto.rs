//! Cryptographic primitives: Ed25519 keys and signatures.
//!
//! Key handles are exclusively owned: neither [`PrivateKey`] nor [`PublicKey`]
//! is `Clone`. Share them with `Arc` when needed. Signing and verification take
//! `&self` and keep no mutable context, so one key may be used from many
//! threads at once.
//!
//! Key material only leaves a handle through explicit `to_raw`/`to_hex`
//! calls; `Debug` output never includes private bytes.

use std::fmt;

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha3::{Digest, Sha3_256};

use crate::error::{CoreError, Result};
use crate::types::{Address, RawKey, ADDRESS_LENGTH, RAW_KEY_LENGTH};

/// Length of an Ed25519 signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// Scheme byte appended to a public key when deriving its authentication key.
pub const ED25519_SCHEME: u8 = 0x00;

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut arr = [0u8; SIGNATURE_LENGTH];
        hex::decode_to_slice(s, &mut arr)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_LENGTH]> for Signature {
    fn from(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = CoreError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let arr: [u8; SIGNATURE_LENGTH] = slice.try_into().map_err(|_| {
            CoreError::Malformed(format!(
                "signature must be {} bytes, got {}",
                SIGNATURE_LENGTH,
                slice.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

/// An Ed25519 public key.
///
/// Import does not validate the point; an invalid key is reported when it is
/// used by [`PublicKey::verify`].
#[derive(PartialEq, Eq)]
pub struct PublicKey {
    raw: RawKey,
}

impl PublicKey {
    /// Import from raw bytes.
    pub fn from_raw(raw: RawKey) -> Self {
        Self { raw }
    }

    /// Import from 64 hex characters (reversed byte order, see [`RawKey`]).
    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Self::from_raw(RawKey::from_hex(s)?))
    }

    /// Extract the raw key bytes.
    pub fn to_raw(&self) -> RawKey {
        self.raw
    }

    /// Export as 64 hex characters (reversed byte order, see [`RawKey`]).
    pub fn to_hex(&self) -> String {
        self.raw.to_hex()
    }

    /// Verify a signature over a message.
    ///
    /// A signature that does not match is `Ok(false)`. An error means the key
    /// itself could not be loaded as a curve point.
    pub fn verify(&self, signature: &Signature, message: &[u8]) -> Result<bool> {
        let verifying_key = VerifyingKey::from_bytes(self.raw.as_bytes())
            .map_err(|e| CoreError::CryptoOp(format!("invalid public key: {}", e)))?;
        let sig = DalekSignature::from_bytes(&signature.0);
        Ok(verifying_key.verify(message, &sig).is_ok())
    }

    /// `SHA3-256(public_key || scheme)`.
    pub fn authentication_key(&self) -> AuthenticationKey {
        let mut hasher = Sha3_256::new();
        hasher.update(self.raw.as_bytes());
        hasher.update([ED25519_SCHEME]);
        AuthenticationKey(hasher.finalize().into())
    }

    /// The account address controlled by this key.
    pub fn derived_address(&self) -> Address {
        self.authentication_key().derived_address()
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}...)", &self.to_hex()[..16])
    }
}

/// An Ed25519 private key.
///
/// The underlying signing key is zeroized when this handle is dropped.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a new key from the operating system's CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut seed = [0u8; RAW_KEY_LENGTH];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| CoreError::CryptoInit(format!("random source unavailable: {}", e)))?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Import from raw seed bytes.
    pub fn from_raw(raw: RawKey) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(raw.as_bytes()),
        }
    }

    /// Import from 64 hex characters (reversed byte order, see [`RawKey`]).
    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Self::from_raw(RawKey::from_hex(s)?))
    }

    /// Extract the raw seed bytes (secret key material).
    pub fn to_raw(&self) -> RawKey {
        RawKey(self.signing_key.to_bytes())
    }

    /// Export as 64 hex characters (reversed byte order, see [`RawKey`]).
    pub fn to_hex(&self) -> String {
        self.to_raw().to_hex()
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_raw(RawKey(self.signing_key.verifying_key().to_bytes()))
    }

    /// Sign a message (deterministic Ed25519).
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let sig = self
            .signing_key
            .try_sign(message)
            .map_err(|e| CoreError::CryptoOp(e.to_string()))?;
        Ok(Signature(sig.to_bytes()))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({:?})", self.public_key())
    }
}

/// Free-function form of [`PrivateKey::sign`].
pub fn sign(key: &PrivateKey, message: &[u8]) -> Result<Signature> {
    key.sign(message)
}

/// Free-function form of [`PublicKey::verify`].
pub fn verify(key: &PublicKey, signature: &Signature, message: &[u8]) -> Result<bool> {
    key.verify(signature, message)
}

/// Free-function form of [`PrivateKey::public_key`].
pub fn public_key_of(key: &PrivateKey) -> PublicKey {
    key.public_key()
}

/// A 32-byte authentication key; its last 16 bytes are the account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthenticationKey(pub [u8; 32]);

impl AuthenticationKey {
    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The address suffix.
    pub fn derived_address(&self) -> Address {
        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&self.0[32 - ADDRESS_LENGTH..]);
        Address(arr)
    }
}

impl Address {
    /// The account address controlled by `key`.
    pub fn from_public_key(key: &PublicKey) -> Self {
        key.derived_address()
    }
}

impl fmt::Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const KNOWN_PRIVATE: &str = "4cc9cd70d755484327b5164fa8f3f080b12aea9cbcc7bf0d4e7d92f58d4ae990";
    const KNOWN_PUBLIC: &str = "7d8ce6951efa7d471f6109e3b16d1a02382fc2e01843df3ed44226c27e3a1733";

    #[test]
    fn test_known_vector() {
        let private = PrivateKey::from_hex(KNOWN_PRIVATE).unwrap();
        assert_eq!(private.public_key().to_hex(), KNOWN_PUBLIC);

        let message = b"Hello ED25519";
        let signature = private.sign(message).unwrap();

        let public = PublicKey::from_hex(KNOWN_PUBLIC).unwrap();
        assert!(public.verify(&signature, message).unwrap());
    }

    #[test]
    fn test_generate_sign_verify() {
        let private = PrivateKey::generate().unwrap();
        let message = b"hello world";
        let signature = private.sign(message).unwrap();

        assert!(private.public_key().verify(&signature, message).unwrap());

        // Tampered message is a plain `false`, not an error
        assert!(!private.public_key().verify(&signature, b"hello worlD").unwrap());
    }

    #[test]
    fn test_signing_is_deterministic() {
        let private = PrivateKey::from_raw(RawKey::from_bytes([0x42; 32]));
        assert_eq!(private.sign(b"m").unwrap(), private.sign(b"m").unwrap());
    }

    #[test]
    fn test_wrong_key_rejects() {
        let a = PrivateKey::from_raw(RawKey::from_bytes([0x01; 32]));
        let b = PrivateKey::from_raw(RawKey::from_bytes([0x02; 32]));
        let signature = a.sign(b"payload").unwrap();
        assert!(!b.public_key().verify(&signature, b"payload").unwrap());
    }

    #[test]
    fn test_private_key_raw_and_hex_roundtrip() {
        let private = PrivateKey::from_hex(KNOWN_PRIVATE).unwrap();
        assert_eq!(private.to_hex(), KNOWN_PRIVATE);

        let again = PrivateKey::from_raw(private.to_raw());
        assert_eq!(again.public_key(), private.public_key());
    }

    #[test]
    fn test_invalid_public_key_is_crypto_op() {
        // Roughly half of all y-coordinates do not decompress; find one.
        let invalid = (0u8..=255)
            .map(|b| {
                let mut bytes = [0u8; 32];
                bytes[0] = b;
                bytes
            })
            .find(|bytes| VerifyingKey::from_bytes(bytes).is_err())
            .expect("some y-coordinate must be off-curve");

        let public = PublicKey::from_raw(RawKey::from_bytes(invalid));
        let err = public
            .verify(&Signature::from_bytes([0u8; 64]), b"msg")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CryptoOp);
    }

    #[test]
    fn test_debug_never_prints_private_material() {
        let private = PrivateKey::from_hex(KNOWN_PRIVATE).unwrap();
        let debug = format!("{:?}", private);
        assert!(debug.starts_with("PrivateKey(PublicKey("));
        assert!(!debug.contains(&KNOWN_PRIVATE[..16]));
    }

    #[test]
    fn test_authentication_key_and_address() {
        let public = PublicKey::from_hex(KNOWN_PUBLIC).unwrap();
        let auth = public.authentication_key();
        assert_eq!(auth.derived_address().as_bytes()[..], auth.as_bytes()[16..]);
        assert_eq!(public.derived_address(), auth.derived_address());
        assert_eq!(Address::from_public_key(&public), auth.derived_address());

        let mut expected = Sha3_256::new();
        expected.update(public.to_raw().as_bytes());
        expected.update([0u8]);
        let expected: [u8; 32] = expected.finalize().into();
        assert_eq!(auth.0, expected);
    }

    #[test]
    fn test_signature_from_slice() {
        assert!(Signature::try_from(&[0u8; 63][..]).is_err());
        let sig = Signature::try_from(&[7u8; 64][..]).unwrap();
        assert_eq!(Signature::from_hex(&sig.to_hex()).unwrap(), sig);
    }

    #[test]
    fn test_keys_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PrivateKey>();
        assert_send_sync::<PublicKey>();
    }
}
