//! Builds the enveloped signed-data bytes for a module-file's `SIGNATURE`
//! section from the hash-list payload computed by the writer
//! (`spec.md` §4.6 "Signing").

use crate::envelope::{encode_envelope, Timestamp};
use ed25519_dalek::{Signer, SigningKey};

/// The key and certificate chain (leaf first, root last, DER-encoded) used
/// to sign a module-file.
pub struct SigningParams<'a> {
    pub signing_key: &'a SigningKey,
    pub certificate_chain: Vec<Vec<u8>>,
    /// Timestamping-authority URI recorded at signing time (`spec.md`
    /// §4.6), for callers that contact a TSA out-of-band; this crate never
    /// performs the network fetch itself.
    pub timestamp_authority_uri: Option<String>,
    /// The TSA's own attestation, once obtained, embedded in the envelope
    /// so a later verifier can fall back on it if the signer cert expires.
    pub timestamp: Option<Timestamp>,
}

impl std::fmt::Debug for SigningParams<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningParams")
            .field("certificate_chain_len", &self.certificate_chain.len())
            .field("timestamp_authority_uri", &self.timestamp_authority_uri)
            .field("has_timestamp", &self.timestamp.is_some())
            .finish_non_exhaustive()
    }
}

/// Sign `payload` (a module-file's
/// [`signing_payload`](modlink_modulefile::UnsignedFile::signing_payload))
/// and wrap the signature, certificate chain, and any timestamp into the
/// bytes that become the `SIGNATURE` section's content.
#[must_use]
pub fn sign_payload(payload: &[u8], params: &SigningParams<'_>) -> Vec<u8> {
    let signature = params.signing_key.sign(payload);
    encode_envelope(
        &params.certificate_chain,
        &signature.to_bytes(),
        payload,
        params.timestamp.as_ref(),
    )
}
