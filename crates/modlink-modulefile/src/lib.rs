//! The module-file binary container format: a typed-section archive that
//! ships a module's descriptor, classes, resources, native artifacts,
//! config, and an optional signature in a single hashed, streamable file.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod compressors;
mod error;
mod format;
mod hash;
mod header;
mod path_safety;
mod reader;
mod section;
mod wire;
mod writer;

pub use compressors::{codec_for, GzipCodec, NoneCodec, Pack200GzipCodec, SectionCodec};
pub use error::{ModuleFileError, Result};
pub use format::{Compressor, SectionType, FILE_TYPE, HASH_TYPE_SHA256, MAGIC, MAJOR, MINOR};
pub use hash::{digest, hashes_for_signing, parse_framed_hashes, to_hex};
pub use header::FileHeader;
pub use path_safety::sanitize_subsection_path;
pub use reader::{read_module_file, ParsedModuleFile, ParsedSection, ParsedSignature};
pub use section::{decode_subsections, encode_subsections, SectionHeader, Subsection};
pub use writer::{build_unsigned, SectionContent, SectionInput, UnsignedFile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_round_trip_detects_tamper() {
        let sections = vec![
            SectionInput {
                section_type: SectionType::ModuleInfo,
                compressor: Compressor::None,
                content: SectionContent::Blob(b"widgets@1.0.0".to_vec()),
            },
            SectionInput {
                section_type: SectionType::Resources,
                compressor: Compressor::Gzip,
                content: SectionContent::Files(vec![Subsection {
                    path: "widgets.properties".into(),
                    content: b"key=value".to_vec(),
                }]),
            },
        ];

        let unsigned = build_unsigned(&sections).unwrap();
        let payload = unsigned.signing_payload();
        let fake_signature = digest(&payload); // stand-in for a real signature blob

        let mut signed = Vec::new();
        unsigned.write_signed(&mut signed, &fake_signature).unwrap();

        let parsed = read_module_file(&mut &signed[..]).unwrap();
        assert_eq!(parsed.signature.unwrap().bytes, fake_signature);
        assert_eq!(parsed.sections.len(), 2);

        // Flip a byte inside the resources section; the file hash no longer
        // matches the header's recorded hash.
        let tamper_at = signed.len() - 1;
        signed[tamper_at] ^= 0xFF;
        assert!(read_module_file(&mut &signed[..]).is_err());
    }
}
