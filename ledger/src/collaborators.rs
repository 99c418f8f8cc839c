//! Thin collaborator contracts named by the external interface but
//! deliberately not implemented in full. Real key derivation (a
//! passphrase-based KDF) and real network transports (gRPC/Torii, P2P
//! gossip) are out of scope; what ships here is enough for the CLI and
//! tests to exercise the rest of the pipeline without a network.

use std::fs;
use std::path::PathBuf;

use ed25519_dalek::SigningKey;

use crate::model::PubKey;

/// Failure reading or writing a keystore file.
#[derive(Debug)]
pub enum KeysError {
    Io(std::io::Error),
    Malformed,
}

impl std::fmt::Display for KeysError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeysError::Io(e) => write!(f, "keystore I/O error: {e}"),
            KeysError::Malformed => write!(f, "keystore file is malformed"),
        }
    }
}

impl std::error::Error for KeysError {}

impl From<std::io::Error> for KeysError {
    fn from(e: std::io::Error) -> Self {
        KeysError::Io(e)
    }
}

/// Generates and loads Ed25519 keypairs for a named account.
///
/// The original derives keys from a passphrase via a dedicated KDF; that
/// derivation is out of scope here. [`FileKeysManager`] instead stores
/// raw key material tagged with the passphrase supplied at creation time,
/// which is enough to exercise the contract without claiming to be a
/// production key derivation scheme.
pub trait KeysManager {
    fn generate(&self, account_name: &str, pass_phrase: &str) -> Result<PubKey, KeysError>;
    fn load(&self, account_name: &str, pass_phrase: &str) -> Result<SigningKey, KeysError>;
}

/// One `<account_name>.key` file per account under `root`.
pub struct FileKeysManager {
    root: PathBuf,
}

impl FileKeysManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileKeysManager { root: root.into() }
    }

    fn key_path(&self, account_name: &str) -> PathBuf {
        self.root.join(format!("{account_name}.key"))
    }
}

impl KeysManager for FileKeysManager {
    /// Fails if a key for `account_name` already exists, mirroring the
    /// original CLI's "Keys already exist" rejection.
    fn generate(&self, account_name: &str, pass_phrase: &str) -> Result<PubKey, KeysError> {
        let path = self.key_path(account_name);
        if path.exists() {
            return Err(KeysError::Malformed);
        }
        fs::create_dir_all(&self.root)?;
        let signing_key = SigningKey::generate(&mut rand::rngs::OsRng);
        let pubkey = PubKey(signing_key.verifying_key().to_bytes());
        let contents = format!("{pass_phrase}\n{}\n", hex::encode(signing_key.to_bytes()));
        fs::write(path, contents)?;
        Ok(pubkey)
    }

    fn load(&self, account_name: &str, pass_phrase: &str) -> Result<SigningKey, KeysError> {
        let contents = fs::read_to_string(self.key_path(account_name))?;
        let mut lines = contents.lines();
        let stored_pass = lines.next().ok_or(KeysError::Malformed)?;
        if stored_pass != pass_phrase {
            return Err(KeysError::Malformed);
        }
        let hex_key = lines.next().ok_or(KeysError::Malformed)?;
        let bytes: [u8; 32] = hex::decode(hex_key)
            .ok()
            .and_then(|v| v.try_into().ok())
            .ok_or(KeysError::Malformed)?;
        Ok(SigningKey::from_bytes(&bytes))
    }
}

/// Bytes-in/bytes-out carrier for an encoded query. Real transports
/// (gRPC/Torii, P2P gossip) are out of scope; [`LoopbackTransport`] hands
/// the bytes straight to an in-process handler, which is what the CLI
/// and tests need.
pub trait Transport {
    fn send(&self, bytes: Vec<u8>) -> Vec<u8>;
}

/// Calls a closure in-process instead of dialing a network peer.
pub struct LoopbackTransport<F> {
    handler: F,
}

impl<F> LoopbackTransport<F>
where
    F: Fn(Vec<u8>) -> Vec<u8>,
{
    pub fn new(handler: F) -> Self {
        LoopbackTransport { handler }
    }
}

impl<F> Transport for LoopbackTransport<F>
where
    F: Fn(Vec<u8>) -> Vec<u8>,
{
    fn send(&self, bytes: Vec<u8>) -> Vec<u8> {
        (self.handler)(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_keys_manager_round_trips_generated_key() {
        let dir = tempdir().unwrap();
        let mgr = FileKeysManager::new(dir.path());
        let pubkey = mgr.generate("alice", "hunter2").unwrap();
        let signing_key = mgr.load("alice", "hunter2").unwrap();
        assert_eq!(PubKey(signing_key.verifying_key().to_bytes()), pubkey);
    }

    #[test]
    fn file_keys_manager_rejects_wrong_pass_phrase() {
        let dir = tempdir().unwrap();
        let mgr = FileKeysManager::new(dir.path());
        mgr.generate("alice", "hunter2").unwrap();
        assert!(mgr.load("alice", "wrong").is_err());
    }

    #[test]
    fn file_keys_manager_rejects_generating_over_existing_key() {
        let dir = tempdir().unwrap();
        let mgr = FileKeysManager::new(dir.path());
        mgr.generate("alice", "hunter2").unwrap();
        assert!(mgr.generate("alice", "hunter2").is_err());
    }

    #[test]
    fn loopback_transport_calls_handler_in_process() {
        let transport = LoopbackTransport::new(|bytes: Vec<u8>| {
            let mut out = bytes;
            out.reverse();
            out
        });
        assert_eq!(transport.send(vec![1, 2, 3]), vec![3, 2, 1]);
    }
}
