//! `FileHeader`: the fixed-layout preamble of a module-file (`spec.md` §4.5,
//! §6 "Module-file wire format").
//!
//! `section_count`, `compressed_size`, and `uncompressed_size` describe only
//! the *counted* sections: `MODULE_INFO` plus whatever content sections
//! follow it. A `SIGNATURE` section, when present, is always spliced in
//! immediately after `MODULE_INFO` but is never counted and never
//! contributes to the header hash or file hash (§4.5 "Hashing" — the file
//! hash is defined with the signature section omitted). The reader detects
//! it structurally: the section read right after `MODULE_INFO` is treated
//! as a signature if and only if its section type is `SIGNATURE`.

use crate::error::{ModuleFileError, Result};
use crate::format::MAGIC;
use crate::wire::{read_u16, read_u32, read_u64, write_u16, write_u32, write_u64};
use std::io::{self, Read, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub file_type: u16,
    pub major: u16,
    pub minor: u16,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub section_count: u16,
    pub hash_type: u16,
    pub hash: Vec<u8>,
}

impl FileHeader {
    pub fn write(&self, w: &mut impl Write) -> io::Result<()> {
        self.write_with_hash(w, &self.hash)
    }

    /// Write the header with the hash field zeroed out, for computing the
    /// header hash.
    pub fn write_zeroed_hash(&self, w: &mut impl Write) -> io::Result<()> {
        let zeroed = vec![0u8; self.hash.len()];
        self.write_with_hash(w, &zeroed)
    }

    fn write_with_hash(&self, w: &mut impl Write, hash: &[u8]) -> io::Result<()> {
        write_u32(w, MAGIC)?;
        write_u16(w, self.file_type)?;
        write_u16(w, self.major)?;
        write_u16(w, self.minor)?;
        write_u64(w, self.compressed_size)?;
        write_u64(w, self.uncompressed_size)?;
        write_u16(w, self.section_count)?;
        write_u16(w, self.hash_type)?;
        write_u16(w, hash.len() as u16)?;
        w.write_all(hash)
    }

    pub fn read(r: &mut impl Read) -> Result<Self> {
        let magic = read_u32(r)?;
        if magic != MAGIC {
            return Err(ModuleFileError::BadMagic {
                expected: MAGIC,
                found: magic,
            });
        }
        let file_type = read_u16(r)?;
        let major = read_u16(r)?;
        let minor = read_u16(r)?;
        if major != crate::format::MAJOR {
            return Err(ModuleFileError::UnsupportedVersion { major, minor });
        }
        let compressed_size = read_u64(r)?;
        let uncompressed_size = read_u64(r)?;
        let section_count = read_u16(r)?;
        let hash_type = read_u16(r)?;
        let hash_len = read_u16(r)? as usize;
        let mut hash = vec![0u8; hash_len];
        r.read_exact(&mut hash)?;
        Ok(Self {
            file_type,
            major,
            minor,
            compressed_size,
            uncompressed_size,
            section_count,
            hash_type,
            hash,
        })
    }
}
