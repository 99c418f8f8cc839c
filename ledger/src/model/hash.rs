//! Fixed-size byte types shared by the model: content hashes, public keys,
//! and detached signatures.
//!
//! Hex encoding is centralized here: every fixed-size array in the model
//! round-trips through [`encode_hex`]/[`decode_hex`], which both codecs
//! (binary and JSON) call instead of hand-rolling their own hex handling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Encodes a fixed-size byte array as lower-case hex.
pub fn encode_hex<const N: usize>(bytes: &[u8; N]) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string into a fixed-size byte array.
///
/// Decoding is case-insensitive; the caller gets back raw bytes, so the
/// "round-trips to lower-case" guarantee lives in [`encode_hex`], not here.
/// Returns `None` if the string is not valid hex or has the wrong length.
pub fn decode_hex<const N: usize>(s: &str) -> Option<[u8; N]> {
    let bytes = hex::decode(s).ok()?;
    if bytes.len() != N {
        return None;
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Some(out)
}

/// Length in bytes of a [`Hash256`].
pub const HASH_LEN: usize = 32;
/// Length in bytes of a [`PubKey`].
pub const PUBKEY_LEN: usize = 32;
/// Length in bytes of a [`SigBytes`].
pub const SIGNATURE_LEN: usize = 64;

/// 256-bit content hash, used for block hashes, transaction hashes, and
/// query identity digests.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hash256(pub [u8; HASH_LEN]);

impl Hash256 {
    /// The all-zero hash, used by [`crate::model::pager::Pager`] to mean
    /// "start from newest".
    pub const ZERO: Hash256 = Hash256([0u8; HASH_LEN]);

    /// Computes the BLAKE3-256 digest of `data`.
    pub fn compute(data: &[u8]) -> Self {
        Hash256(*blake3::hash(data).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LEN]
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        decode_hex(s).map(Hash256)
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

/// Ed25519 public key bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubKey(pub [u8; PUBKEY_LEN]);

impl PubKey {
    pub fn as_bytes(&self) -> &[u8; PUBKEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        decode_hex(s).map(PubKey)
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({})", self.to_hex())
    }
}

/// Detached Ed25519 signature bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SigBytes(pub [u8; SIGNATURE_LEN]);

impl SigBytes {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        decode_hex(s).map(SigBytes)
    }
}

impl fmt::Debug for SigBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigBytes({})", self.to_hex())
    }
}
