//! The streaming module-file reader (`spec.md` §4.5 "Reader").
//!
//! Conceptually this is the event sequence
//! `START_FILE -> (START_SECTION (START_SUBSECTION END_SUBSECTION)* END_SECTION)+ -> END_FILE`;
//! [`read_module_file`] drives that sequence itself and verifies each
//! section's hash the moment its content is in hand, before the section is
//! accepted into the result, so a tampered section is caught at the point
//! it would otherwise emit `END_SECTION`.

use crate::compressors::codec_for;
use crate::error::{ModuleFileError, Result};
use crate::format::{Compressor, SectionType};
use crate::hash::{digest, to_hex};
use crate::header::FileHeader;
use crate::section::{decode_subsections, SectionHeader, Subsection};
use crate::wire::read_u16;
use std::io::Read;

#[derive(Debug, Clone)]
pub struct ParsedSection {
    pub section_type: SectionType,
    pub content: Vec<u8>,
    pub subsections: Vec<Subsection>,
}

#[derive(Debug, Clone)]
pub struct ParsedSignature {
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ParsedModuleFile {
    pub header: FileHeader,
    pub sections: Vec<ParsedSection>,
    pub signature: Option<ParsedSignature>,
}

impl ParsedModuleFile {
    #[must_use]
    pub fn module_info(&self) -> &[u8] {
        &self.sections[0].content
    }

    #[must_use]
    pub fn section(&self, section_type: SectionType) -> Option<&ParsedSection> {
        self.sections.iter().find(|s| s.section_type == section_type)
    }
}

/// Read a full `Read` number of bytes, returning `Ok(None)` only if the
/// stream was exhausted before any byte of this section header was read.
fn try_read_section_header(r: &mut impl Read) -> Result<Option<SectionHeader>> {
    let mut type_bytes = [0u8; 2];
    let mut read_total = 0;
    while read_total < 2 {
        let n = r.read(&mut type_bytes[read_total..])?;
        if n == 0 {
            if read_total == 0 {
                return Ok(None);
            }
            return Err(ModuleFileError::Truncated {
                context: "section type",
            });
        }
        read_total += n;
    }
    let section_type = u16::from_be_bytes(type_bytes);
    let compressor = read_u16(r)?;
    let csize = crate::wire::read_u32(r)?;
    let subsection_count = read_u16(r)?;
    let hash_len = read_u16(r)? as usize;
    let mut hash = vec![0u8; hash_len];
    r.read_exact(&mut hash)?;
    Ok(Some(SectionHeader {
        section_type,
        compressor,
        csize,
        subsection_count,
        hash,
    }))
}

pub fn read_module_file(r: &mut impl Read) -> Result<ParsedModuleFile> {
    let header = FileHeader::read(r)?;

    let mut header_hash_buf = Vec::new();
    header.write_zeroed_hash(&mut header_hash_buf)?;
    let mut file_hash_buf = header_hash_buf;

    let mut sections = Vec::with_capacity(header.section_count as usize);
    let mut signature = None;
    let mut counted = 0usize;

    loop {
        if counted >= header.section_count as usize {
            break;
        }
        let Some(sec_header) = try_read_section_header(r)? else {
            break;
        };
        let mut compressed = vec![0u8; sec_header.csize as usize];
        r.read_exact(&mut compressed)?;

        let is_signature_candidate = counted == 1 && signature.is_none();
        if is_signature_candidate
            && SectionType::from_u16(sec_header.section_type) == Some(SectionType::Signature)
        {
            let computed = digest(&compressed);
            if computed != sec_header.hash {
                return Err(ModuleFileError::HashMismatch {
                    scope: "signature",
                    expected: to_hex(&sec_header.hash),
                    actual: to_hex(&computed),
                });
            }
            signature = Some(ParsedSignature { bytes: compressed });
            continue;
        }

        let section_type = SectionType::from_u16(sec_header.section_type)
            .ok_or(ModuleFileError::WrongEventOrder("unknown section type"))?;
        if counted == 0 && section_type != SectionType::ModuleInfo {
            return Err(ModuleFileError::WrongEventOrder(
                "first section must be MODULE_INFO",
            ));
        }

        let compressor = Compressor::from_u16(sec_header.compressor)
            .ok_or(ModuleFileError::WrongEventOrder("unknown compressor"))?;
        let content = codec_for(compressor).decompress(&compressed)?;
        let computed = digest(&content);
        if computed != sec_header.hash {
            return Err(ModuleFileError::HashMismatch {
                scope: "section",
                expected: to_hex(&sec_header.hash),
                actual: to_hex(&computed),
            });
        }

        let subsections = if section_type.is_file_bearing() {
            decode_subsections(&content, sec_header.subsection_count, section_type)?
        } else {
            if sec_header.subsection_count != 0 {
                return Err(ModuleFileError::BadSubsectionCount {
                    section: section_type,
                    count: sec_header.subsection_count,
                });
            }
            Vec::new()
        };

        let mut raw_section_bytes = Vec::with_capacity(compressed.len() + 16);
        sec_header.write(&mut raw_section_bytes)?;
        raw_section_bytes.extend_from_slice(&compressed);
        file_hash_buf.extend_from_slice(&raw_section_bytes);

        sections.push(ParsedSection {
            section_type,
            content,
            subsections,
        });
        counted += 1;
    }

    if counted != header.section_count as usize {
        return Err(ModuleFileError::Truncated {
            context: "fewer sections than section_count declared",
        });
    }

    let computed_file_hash = digest(&file_hash_buf);
    if computed_file_hash != header.hash {
        return Err(ModuleFileError::HashMismatch {
            scope: "file",
            expected: to_hex(&header.hash),
            actual: to_hex(&computed_file_hash),
        });
    }

    Ok(ParsedModuleFile {
        header,
        sections,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Compressor;
    use crate::writer::{build_unsigned, SectionContent, SectionInput};

    fn minimal_sections() -> Vec<SectionInput> {
        vec![SectionInput {
            section_type: SectionType::ModuleInfo,
            compressor: Compressor::None,
            content: SectionContent::Blob(b"widgets@1.0.0".to_vec()),
        }]
    }

    #[test]
    fn rejects_truncated_file() {
        let unsigned = build_unsigned(&minimal_sections()).unwrap();
        let mut buf = Vec::new();
        unsigned.write_unsigned(&mut buf).unwrap();
        buf.truncate(buf.len() - 4);
        assert!(read_module_file(&mut &buf[..]).is_err());
    }

    #[test]
    fn rejects_tampered_section_content() {
        let unsigned = build_unsigned(&minimal_sections()).unwrap();
        let mut buf = Vec::new();
        unsigned.write_unsigned(&mut buf).unwrap();
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;
        let err = read_module_file(&mut &buf[..]).unwrap_err();
        assert!(matches!(err, ModuleFileError::HashMismatch { .. }));
    }
}
