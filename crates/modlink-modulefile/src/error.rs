//! Module-file error kinds (`spec.md` §7).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModuleFileError {
    #[error("bad magic: expected {expected:#010x}, found {found:#010x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("unsupported module-file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("truncated module-file: expected {context}")]
    Truncated { context: &'static str },

    #[error("{0} was not valid MUTF-8")]
    InvalidUtf8(&'static str),

    #[error("reader event order violated: {0}")]
    WrongEventOrder(&'static str),

    #[error("bad subsection count for section {section:?}: {count}")]
    BadSubsectionCount { section: crate::format::SectionType, count: u16 },

    #[error("hash mismatch in {scope}: expected {expected}, computed {actual}")]
    HashMismatch {
        scope: &'static str,
        expected: String,
        actual: String,
    },

    #[error("path '{0}' escapes the destination root or is absolute")]
    PathEscape(String),

    #[error("{section:?} must use {expected:?}, found {found:?}")]
    WrongCompressor {
        section: crate::format::SectionType,
        expected: crate::format::Compressor,
        found: crate::format::Compressor,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ModuleFileError>;
