//! Signing and trust-chain verification for a module-file's optional
//! `SIGNATURE` section: an enveloped signed-data blob covering the header
//! hash, the `MODULE_INFO` hash, every other section's hash, and the file
//! hash.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod envelope;
mod error;
mod signer;
mod trust;
mod verifier;

pub use envelope::{decode_envelope, encode_envelope, Envelope, Timestamp};
pub use error::{Result, SignError};
pub use signer::{sign_payload, SigningParams};
pub use trust::{AnchorTrustPolicy, TrustPolicy};
pub use verifier::verify_module_file;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ed25519_dalek::SigningKey;
    use modlink_modulefile::{
        build_unsigned, read_module_file, Compressor, SectionContent, SectionInput, SectionType,
    };

    #[derive(Debug)]
    struct AllowAny;

    impl TrustPolicy for AllowAny {
        fn verify_chain(
            &self,
            der_chain: &[Vec<u8>],
            _at: chrono::DateTime<Utc>,
            _timestamp: Option<&Timestamp>,
        ) -> Result<()> {
            if der_chain.is_empty() {
                return Err(SignError::UntrustedChain("empty chain".into()));
            }
            Ok(())
        }
    }

    fn sample_sections() -> Vec<SectionInput> {
        vec![SectionInput {
            section_type: SectionType::ModuleInfo,
            compressor: Compressor::None,
            content: SectionContent::Blob(b"widgets@1.0.0".to_vec()),
        }]
    }

    #[test]
    fn signature_survives_round_trip_and_tamper_is_caught() {
        let signing_key = SigningKey::from_bytes(&[3u8; 32]);
        let unsigned = build_unsigned(&sample_sections()).unwrap();
        let payload = unsigned.signing_payload();

        let params = SigningParams {
            signing_key: &signing_key,
            certificate_chain: vec![b"stand-in-leaf-cert".to_vec()],
            timestamp_authority_uri: None,
            timestamp: None,
        };
        let envelope_bytes = sign_payload(&payload, &params);

        let mut signed = Vec::new();
        unsigned.write_signed(&mut signed, &envelope_bytes).unwrap();

        let parsed = read_module_file(&mut &signed[..]).unwrap();
        assert!(parsed.signature.is_some());

        // The stand-in leaf certificate isn't real DER, so `AllowAny` lets
        // the chain itself through but the leaf public key extraction that
        // follows fails to parse it, surfacing as an untrusted chain.
        let err = verify_module_file(&parsed, &AllowAny, Utc::now()).unwrap_err();
        assert!(matches!(err, SignError::UntrustedChain(_)));
    }
}
