//! Verifies a parsed module-file's `SIGNATURE` section against a trust
//! policy and the file's own hash chain (`spec.md` §4.6 "Verification").

use crate::envelope::decode_envelope;
use crate::error::{Result, SignError};
use crate::trust::TrustPolicy;
use chrono::{DateTime, Utc};
use ed25519_dalek::{Signature, VerifyingKey};
use modlink_modulefile::ParsedModuleFile;

/// Recompute this file's hash chain in the same order
/// [`hashes_for_signing`](modlink_modulefile::hashes_for_signing) framed it:
/// header hash, `MODULE_INFO` hash, every other section hash, file hash.
/// The reader has already checked the file hash against the header on
/// parse, so this only needs to redo the header hash and re-digest each
/// section's content.
fn recompute_hash_chain(parsed: &ParsedModuleFile) -> Result<Vec<Vec<u8>>> {
    let mut header_buf = Vec::new();
    parsed.header.write_zeroed_hash(&mut header_buf)?;
    let header_hash = modlink_modulefile::digest(&header_buf);

    let mut chain = vec![header_hash];
    for section in &parsed.sections {
        chain.push(modlink_modulefile::digest(&section.content));
    }
    chain.push(parsed.header.hash.clone());
    Ok(chain)
}

/// Verify `parsed`'s signature: the envelope decodes, its certificate chain
/// is trusted as of `at`, the signature validates against the claimed
/// hash-list payload, and that payload matches this file's actual hashes.
pub fn verify_module_file(
    parsed: &ParsedModuleFile,
    trust: &dyn TrustPolicy,
    at: DateTime<Utc>,
) -> Result<()> {
    let signature_section = parsed
        .signature
        .as_ref()
        .ok_or_else(|| SignError::BadEnvelope("module-file carries no SIGNATURE section".into()))?;
    let envelope = decode_envelope(&signature_section.bytes)?;

    trust.verify_chain(&envelope.certificates, at, envelope.timestamp.as_ref())?;

    let leaf_der = envelope
        .certificates
        .first()
        .ok_or_else(|| SignError::BadEnvelope("envelope has no certificates".into()))?;
    let (_, leaf_cert) = x509_parser::parse_x509_certificate(leaf_der)
        .map_err(|e| SignError::UntrustedChain(e.to_string()))?;
    let raw_key = leaf_cert.public_key().subject_public_key.data.as_ref();
    let key_bytes: [u8; 32] = raw_key.try_into().map_err(|_| SignError::BadSignature)?;
    let verifying_key = VerifyingKey::from_bytes(&key_bytes).map_err(|_| SignError::BadSignature)?;
    let signature =
        Signature::from_slice(&envelope.signature).map_err(|_| SignError::BadSignature)?;
    verifying_key
        .verify_strict(&envelope.hash_list_payload, &signature)
        .map_err(|_| SignError::BadSignature)?;

    let recomputed = recompute_hash_chain(parsed)?;
    let claimed = modlink_modulefile::parse_framed_hashes(&envelope.hash_list_payload)?;
    if recomputed != claimed {
        return Err(SignError::HashMismatch {
            expected: modlink_modulefile::to_hex(claimed.last().map_or(&[][..], Vec::as_slice)),
            actual: modlink_modulefile::to_hex(recomputed.last().map_or(&[][..], Vec::as_slice)),
        });
    }

    Ok(())
}
