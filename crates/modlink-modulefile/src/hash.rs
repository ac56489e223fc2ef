//! The hashing contract (`spec.md` §4.5 "Hashing"): section hashes, the
//! header hash, the file hash, and the framed hash-list signed by
//! `modlink-sign`.

use crate::error::{ModuleFileError, Result};
use sha2::{Digest, Sha256};

#[must_use]
pub fn digest(bytes: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().to_vec()
}

#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Append one hash with its 2-byte big-endian length prefix.
pub fn frame_hash(out: &mut Vec<u8>, hash: &[u8]) {
    let len = u16::try_from(hash.len()).expect("sha256 digests fit in u16");
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(hash);
}

/// Build the payload `modlink-sign` signs: header hash, `MODULE_INFO`
/// section hash, every other counted section's hash in file order, then
/// the file hash.
#[must_use]
pub fn hashes_for_signing(
    header_hash: &[u8],
    module_info_hash: &[u8],
    other_section_hashes: &[Vec<u8>],
    file_hash: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    frame_hash(&mut out, header_hash);
    frame_hash(&mut out, module_info_hash);
    for h in other_section_hashes {
        frame_hash(&mut out, h);
    }
    frame_hash(&mut out, file_hash);
    out
}

/// Recover the individual hashes from a payload built by
/// [`hashes_for_signing`], in the same order.
pub fn parse_framed_hashes(mut bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut hashes = Vec::new();
    while !bytes.is_empty() {
        if bytes.len() < 2 {
            return Err(ModuleFileError::Truncated {
                context: "framed hash length",
            });
        }
        let len = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        bytes = &bytes[2..];
        if bytes.len() < len {
            return Err(ModuleFileError::Truncated {
                context: "framed hash bytes",
            });
        }
        hashes.push(bytes[..len].to_vec());
        bytes = &bytes[len..];
    }
    Ok(hashes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framed_hashes_round_trip() {
        let header_hash = digest(b"header");
        let module_info_hash = digest(b"module-info");
        let others = vec![digest(b"classes"), digest(b"resources")];
        let file_hash = digest(b"file");

        let payload = hashes_for_signing(&header_hash, &module_info_hash, &others, &file_hash);
        let parsed = parse_framed_hashes(&payload).unwrap();

        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0], header_hash);
        assert_eq!(parsed[1], module_info_hash);
        assert_eq!(parsed[2], others[0]);
        assert_eq!(parsed[3], others[1]);
        assert_eq!(parsed[4], file_hash);
    }
}
