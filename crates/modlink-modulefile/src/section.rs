//! `Section` and `Subsection` records (`spec.md` §4.5, §6 "Module-file wire
//! format").

use crate::error::{ModuleFileError, Result};
use crate::format::SUBSECTION_TYPE_FILE;
use crate::path_safety::sanitize_subsection_path;
use crate::wire::{read_u16, read_u32, write_mutf8, write_u16, write_u32};
use std::io::{self, Read, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub section_type: u16,
    pub compressor: u16,
    pub csize: u32,
    pub subsection_count: u16,
    pub hash: Vec<u8>,
}

impl SectionHeader {
    pub fn write(&self, w: &mut impl Write) -> io::Result<()> {
        write_u16(w, self.section_type)?;
        write_u16(w, self.compressor)?;
        write_u32(w, self.csize)?;
        write_u16(w, self.subsection_count)?;
        write_u16(w, self.hash.len() as u16)?;
        w.write_all(&self.hash)
    }

    pub fn read(r: &mut impl Read) -> Result<Self> {
        let section_type = read_u16(r)?;
        let compressor = read_u16(r)?;
        let csize = read_u32(r)?;
        let subsection_count = read_u16(r)?;
        let hash_len = read_u16(r)? as usize;
        let mut hash = vec![0u8; hash_len];
        r.read_exact(&mut hash)?;
        Ok(Self {
            section_type,
            compressor,
            csize,
            subsection_count,
            hash,
        })
    }
}

/// A single file entry inside a file-bearing section (`CLASSES`,
/// `RESOURCES`, `NATIVE_LIBS`, `NATIVE_CMDS`, `CONFIG`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subsection {
    pub path: String,
    pub content: Vec<u8>,
}

/// Concatenate subsections into the byte stream a file-bearing section's
/// content holds (before compression).
#[must_use]
pub fn encode_subsections(subs: &[Subsection]) -> Vec<u8> {
    let mut out = Vec::new();
    for sub in subs {
        write_u16(&mut out, SUBSECTION_TYPE_FILE).expect("writing to a Vec cannot fail");
        write_u32(&mut out, sub.content.len() as u32).expect("writing to a Vec cannot fail");
        write_mutf8(&mut out, &sub.path).expect("writing to a Vec cannot fail");
        out.extend_from_slice(&sub.content);
    }
    out
}

/// Parse `expected` subsections out of a file-bearing section's
/// (decompressed) content, validating each path is safe to extract.
pub fn decode_subsections(
    content: &[u8],
    expected: u16,
    section_type: crate::format::SectionType,
) -> Result<Vec<Subsection>> {
    let mut cursor = content;
    let mut out = Vec::with_capacity(expected as usize);
    for _ in 0..expected {
        let subsection_type = crate::wire::take_u16(&mut cursor)?;
        if subsection_type != SUBSECTION_TYPE_FILE {
            return Err(ModuleFileError::WrongEventOrder(
                "unknown subsection type in file-bearing section",
            ));
        }
        let csize = crate::wire::take_u32(&mut cursor)? as usize;
        let raw_path = crate::wire::take_mutf8(&mut cursor)?;
        let path = sanitize_subsection_path(&raw_path, section_type)?;
        let data = crate::wire::take_bytes(&mut cursor, csize)?;
        out.push(Subsection {
            path,
            content: data.to_vec(),
        });
    }
    if !cursor.is_empty() {
        return Err(ModuleFileError::BadSubsectionCount {
            section: section_type,
            count: expected,
        });
    }
    Ok(out)
}
