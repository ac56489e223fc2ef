//! The module-file writer (`spec.md` §4.5 "Writer"): builds the counted
//! sections and their hashes in a first pass, then either streams the
//! unsigned file directly or hands the caller a signing payload to produce
//! the `SIGNATURE` section for a second, final pass.

use crate::error::{ModuleFileError, Result};
use crate::format::{Compressor, SectionType, FILE_TYPE, HASH_TYPE_SHA256, MAJOR, MINOR};
use crate::hash::{digest, hashes_for_signing};
use crate::header::FileHeader;
use crate::section::{encode_subsections, SectionHeader, Subsection};
use std::io::{self, Write};

#[derive(Debug, Clone)]
pub enum SectionContent {
    Blob(Vec<u8>),
    Files(Vec<Subsection>),
}

#[derive(Debug, Clone)]
pub struct SectionInput {
    pub section_type: SectionType,
    pub compressor: Compressor,
    pub content: SectionContent,
}

/// The file's counted sections, fully encoded and hashed, ready to be
/// streamed with or without a `SIGNATURE` section.
#[derive(Debug)]
pub struct UnsignedFile {
    header: FileHeader,
    encoded_sections: Vec<Vec<u8>>,
    header_hash: Vec<u8>,
    section_hashes: Vec<Vec<u8>>,
    file_hash: Vec<u8>,
}

impl UnsignedFile {
    #[must_use]
    pub fn file_hash(&self) -> &[u8] {
        &self.file_hash
    }

    /// The payload `modlink-sign` should sign to authenticate this file.
    #[must_use]
    pub fn signing_payload(&self) -> Vec<u8> {
        hashes_for_signing(
            &self.header_hash,
            &self.section_hashes[0],
            &self.section_hashes[1..],
            &self.file_hash,
        )
    }

    pub fn write_unsigned(&self, w: &mut impl Write) -> io::Result<()> {
        self.header.write(w)?;
        for bytes in &self.encoded_sections {
            w.write_all(bytes)?;
        }
        Ok(())
    }

    /// Write the file with a `SIGNATURE` section, built from
    /// `signature_bytes`, spliced in immediately after `MODULE_INFO`. The
    /// header itself is unchanged from the unsigned layout: the signature
    /// section is never counted and never hashed.
    pub fn write_signed(&self, w: &mut impl Write, signature_bytes: &[u8]) -> Result<()> {
        self.header.write(w)?;
        w.write_all(&self.encoded_sections[0])?;

        let sig_header = SectionHeader {
            section_type: SectionType::Signature.as_u16(),
            compressor: Compressor::None.as_u16(),
            csize: u32::try_from(signature_bytes.len())
                .map_err(|_| ModuleFileError::Truncated {
                    context: "signature too large for a u32 section size",
                })?,
            subsection_count: 0,
            hash: digest(signature_bytes),
        };
        sig_header.write(w)?;
        w.write_all(signature_bytes)?;

        for bytes in &self.encoded_sections[1..] {
            w.write_all(bytes)?;
        }
        Ok(())
    }
}

/// Encode and hash every counted section, computing everything a
/// [`UnsignedFile`] needs to be streamed either plain or signed.
pub fn build_unsigned(sections: &[SectionInput]) -> Result<UnsignedFile> {
    match sections.first() {
        Some(first) if first.section_type == SectionType::ModuleInfo => {}
        _ => {
            return Err(ModuleFileError::WrongEventOrder(
                "MODULE_INFO must be the first section",
            ))
        }
    }

    let mut encoded_sections = Vec::with_capacity(sections.len());
    let mut section_hashes = Vec::with_capacity(sections.len());
    let mut total_compressed: u64 = 0;
    let mut total_uncompressed: u64 = 0;

    for input in sections {
        if let Some(mandated) = input.section_type.mandated_compressor() {
            if input.compressor != mandated {
                return Err(ModuleFileError::WrongCompressor {
                    section: input.section_type,
                    expected: mandated,
                    found: input.compressor,
                });
            }
        }

        let raw = match &input.content {
            SectionContent::Blob(bytes) => bytes.clone(),
            SectionContent::Files(subs) => encode_subsections(subs),
        };
        let subsection_count = match &input.content {
            SectionContent::Blob(_) => 0,
            SectionContent::Files(subs) => u16::try_from(subs.len()).unwrap_or(u16::MAX),
        };
        let compressed = crate::compressors::codec_for(input.compressor).compress(&raw)?;
        let hash = digest(&raw);

        let section_header = SectionHeader {
            section_type: input.section_type.as_u16(),
            compressor: input.compressor.as_u16(),
            csize: u32::try_from(compressed.len()).map_err(|_| ModuleFileError::Truncated {
                context: "section too large for a u32 size",
            })?,
            subsection_count,
            hash: hash.clone(),
        };

        let mut bytes = Vec::with_capacity(compressed.len() + 64);
        section_header.write(&mut bytes)?;
        bytes.extend_from_slice(&compressed);

        total_compressed += bytes.len() as u64;
        total_uncompressed += raw.len() as u64;
        section_hashes.push(hash);
        encoded_sections.push(bytes);
    }

    let mut header = FileHeader {
        file_type: FILE_TYPE,
        major: MAJOR,
        minor: MINOR,
        compressed_size: total_compressed,
        uncompressed_size: total_uncompressed,
        section_count: u16::try_from(sections.len()).map_err(|_| ModuleFileError::Truncated {
            context: "too many sections for a u16 count",
        })?,
        hash_type: HASH_TYPE_SHA256,
        hash: vec![0u8; 32],
    };

    let mut header_hash_buf = Vec::new();
    header.write_zeroed_hash(&mut header_hash_buf)?;
    let header_hash = digest(&header_hash_buf);

    let mut file_hash_buf = header_hash_buf;
    for bytes in &encoded_sections {
        file_hash_buf.extend_from_slice(bytes);
    }
    let file_hash = digest(&file_hash_buf);
    header.hash = file_hash.clone();

    Ok(UnsignedFile {
        header,
        encoded_sections,
        header_hash,
        section_hashes,
        file_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module_info_section(name: &str) -> SectionInput {
        SectionInput {
            section_type: SectionType::ModuleInfo,
            compressor: Compressor::None,
            content: SectionContent::Blob(name.as_bytes().to_vec()),
        }
    }

    #[test]
    fn unsigned_file_round_trips_through_reader() {
        let sections = vec![
            module_info_section("widgets@1.0.0"),
            SectionInput {
                section_type: SectionType::Classes,
                compressor: Compressor::Pack200Gzip,
                content: SectionContent::Files(vec![Subsection {
                    path: "com/example/Widget.class".into(),
                    content: b"classbytes".to_vec(),
                }]),
            },
        ];
        let unsigned = build_unsigned(&sections).unwrap();
        let mut buf = Vec::new();
        unsigned.write_unsigned(&mut buf).unwrap();

        let parsed = crate::reader::read_module_file(&mut &buf[..]).unwrap();
        assert_eq!(parsed.sections.len(), 2);
        assert!(parsed.signature.is_none());
        assert_eq!(parsed.sections[1].subsections[0].path, "com/example/Widget.class");
    }

    #[test]
    fn first_section_must_be_module_info() {
        let sections = vec![SectionInput {
            section_type: SectionType::Resources,
            compressor: Compressor::None,
            content: SectionContent::Files(vec![]),
        }];
        assert!(build_unsigned(&sections).is_err());
    }

    #[test]
    fn classes_section_rejects_non_mandated_compressor() {
        let sections = vec![
            module_info_section("widgets@1.0.0"),
            SectionInput {
                section_type: SectionType::Classes,
                compressor: Compressor::Gzip,
                content: SectionContent::Files(vec![]),
            },
        ];
        let err = build_unsigned(&sections).unwrap_err();
        assert!(matches!(
            err,
            ModuleFileError::WrongCompressor {
                section: SectionType::Classes,
                expected: Compressor::Pack200Gzip,
                found: Compressor::Gzip,
            }
        ));
    }

    #[test]
    fn module_info_section_rejects_non_none_compressor() {
        let sections = vec![SectionInput {
            section_type: SectionType::ModuleInfo,
            compressor: Compressor::Gzip,
            content: SectionContent::Blob(b"widgets@1.0.0".to_vec()),
        }];
        let err = build_unsigned(&sections).unwrap_err();
        assert!(matches!(
            err,
            ModuleFileError::WrongCompressor {
                section: SectionType::ModuleInfo,
                expected: Compressor::None,
                found: Compressor::Gzip,
            }
        ));
    }
}
