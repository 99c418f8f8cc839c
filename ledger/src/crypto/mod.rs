//! Ed25519 signing and verification for query and transaction identity
//! hashes. Neither the evaluator nor the block store ever checks a
//! signature; this module is the edge a transport calls before handing
//! a query or transaction anywhere near them.

pub mod signature;

pub use signature::{sign, verify, SignatureError};
