//! Detached Ed25519 signatures over a [`Hash256`] identity hash.
//!
//! Chosen over the teacher's `Signature`/`PublicKey` (untyped `Vec<u8>`
//! placeholders for a post-quantum scheme with no available crate):
//! `ed25519-dalek` is a real, widely-used signature crate and its
//! 32-/64-byte key and signature sizes match [`PubKey`]/[`SigBytes`]
//! exactly.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::model::{Hash256, PubKey, SigBytes};

/// Failure verifying a detached signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// `pubkey`'s bytes are not a valid Ed25519 point.
    BadPublicKey,
    /// The signature does not verify against the given hash and key.
    Invalid,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureError::BadPublicKey => write!(f, "malformed ed25519 public key"),
            SignatureError::Invalid => write!(f, "signature verification failed"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Verifies `signature` over `hash` under `pubkey`.
pub fn verify(hash: &Hash256, pubkey: &PubKey, signature: &SigBytes) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(pubkey.as_bytes()).map_err(|_| SignatureError::BadPublicKey)?;
    let sig = Signature::from_bytes(signature.as_bytes());
    verifying_key
        .verify(hash.as_bytes(), &sig)
        .map_err(|_| SignatureError::Invalid)
}

/// Signs `hash` with `signing_key`. Used by tests and the CLI's key
/// tooling; the evaluator never signs anything itself.
pub fn sign(hash: &Hash256, signing_key: &SigningKey) -> SigBytes {
    SigBytes(signing_key.sign(hash.as_bytes()).to_bytes())
}
