//! Top-level error type unifying the crate's sub-errors, grounded in the
//! teacher's `ConsensusError` (a wrapping enum with one variant per
//! source error and `From` impls, rather than a `thiserror` derive).

use std::fmt;

use crate::codec::CodecError;
use crate::crypto::SignatureError;
use crate::query::EvalError;
use crate::store::StoreError;

/// Failure surfaced by any of the crate's fallible operations, collected
/// into one type for binaries that need a single error to propagate.
#[derive(Debug)]
pub enum LedgerError {
    Codec(CodecError),
    Store(StoreError),
    Eval(EvalError),
    Signature(SignatureError),
    Other(String),
}

impl From<CodecError> for LedgerError {
    fn from(e: CodecError) -> Self {
        LedgerError::Codec(e)
    }
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        LedgerError::Store(e)
    }
}

impl From<EvalError> for LedgerError {
    fn from(e: EvalError) -> Self {
        LedgerError::Eval(e)
    }
}

impl From<SignatureError> for LedgerError {
    fn from(e: SignatureError) -> Self {
        LedgerError::Signature(e)
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Codec(e) => write!(f, "{e}"),
            LedgerError::Store(e) => write!(f, "{e}"),
            LedgerError::Eval(e) => write!(f, "{e}"),
            LedgerError::Signature(e) => write!(f, "{e}"),
            LedgerError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}
