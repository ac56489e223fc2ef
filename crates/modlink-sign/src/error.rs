//! Signing and verification error kinds (`spec.md` §7).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("malformed signature envelope: {0}")]
    BadEnvelope(String),

    #[error("signature does not verify against the signed hashes")]
    BadSignature,

    #[error("certificate chain is not trusted: {0}")]
    UntrustedChain(String),

    #[error("signed hash chain does not match the module-file: expected {expected}, found {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error(transparent)]
    ModuleFile(#[from] modlink_modulefile::ModuleFileError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SignError>;
