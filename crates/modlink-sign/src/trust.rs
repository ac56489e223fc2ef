//! Trust-chain policy for verifying a module-file's certificate chain
//! (`spec.md` §6 "Trust store").

use crate::envelope::Timestamp;
use crate::error::{Result, SignError};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

pub trait TrustPolicy: std::fmt::Debug + Send + Sync {
    /// Validate a certificate chain (leaf first, root last) as of `at`.
    ///
    /// `timestamp`, when present, is a timestamping authority's
    /// attestation carried alongside the signature. If the leaf (signer)
    /// certificate has expired as of `at`, implementations should instead
    /// accept the chain when `timestamp.time` falls within the leaf
    /// certificate's validity window and the timestamper's own chain is
    /// itself trusted (`spec.md` §4.6 point 4).
    fn verify_chain(
        &self,
        der_chain: &[Vec<u8>],
        at: DateTime<Utc>,
        timestamp: Option<&Timestamp>,
    ) -> Result<()>;
}

/// Trusts a chain when its root certificate's DER fingerprint is a known
/// anchor and every certificate in the chain is valid at the given time.
#[derive(Debug, Default)]
pub struct AnchorTrustPolicy {
    trusted_root_fingerprints: BTreeSet<String>,
}

impl AnchorTrustPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn trust_root(mut self, root_der: &[u8]) -> Self {
        self.trusted_root_fingerprints
            .insert(hex::encode(Sha256::digest(root_der)));
        self
    }
}

impl TrustPolicy for AnchorTrustPolicy {
    fn verify_chain(
        &self,
        der_chain: &[Vec<u8>],
        at: DateTime<Utc>,
        timestamp: Option<&Timestamp>,
    ) -> Result<()> {
        let Some(root_der) = der_chain.last() else {
            return Err(SignError::UntrustedChain("certificate chain is empty".into()));
        };

        let asn1_at = x509_parser::time::ASN1Time::from_timestamp(at.timestamp())
            .map_err(|e| SignError::UntrustedChain(e.to_string()))?;

        for (i, der) in der_chain.iter().enumerate() {
            let (_, cert) = x509_parser::parse_x509_certificate(der)
                .map_err(|e| SignError::UntrustedChain(e.to_string()))?;
            if cert.validity().is_valid_at(asn1_at) {
                continue;
            }
            if i != 0 {
                return Err(SignError::UntrustedChain(format!(
                    "certificate for {} is not valid at {at}",
                    cert.subject()
                )));
            }

            // The signer (leaf) certificate has expired as of `at`. Per
            // spec.md §4.6 point 4, fall back to a timestamp whose time
            // lies in the leaf's own validity window, and trust it only if
            // the timestamper's chain is itself trusted.
            let ts = timestamp.ok_or_else(|| {
                SignError::UntrustedChain(format!(
                    "signer certificate for {} expired and no timestamp was provided",
                    cert.subject()
                ))
            })?;
            let asn1_ts = x509_parser::time::ASN1Time::from_timestamp(ts.time.timestamp())
                .map_err(|e| SignError::UntrustedChain(e.to_string()))?;
            if !cert.validity().is_valid_at(asn1_ts) {
                return Err(SignError::UntrustedChain(format!(
                    "timestamp {} is outside signer certificate {}'s validity window",
                    ts.time,
                    cert.subject()
                )));
            }
            self.verify_chain(&ts.certificate_chain, ts.time, None)?;
        }

        let fingerprint = hex::encode(Sha256::digest(root_der));
        if !self.trusted_root_fingerprints.contains(&fingerprint) {
            return Err(SignError::UntrustedChain(
                "root certificate is not a trust anchor".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_is_untrusted() {
        let policy = AnchorTrustPolicy::new();
        assert!(policy.verify_chain(&[], Utc::now(), None).is_err());
    }

    #[test]
    fn unknown_root_is_untrusted() {
        let policy = AnchorTrustPolicy::new();
        // Not a real certificate, but decoding fails before the anchor
        // check ever runs, which is still the correct rejection.
        let chain = vec![b"not-a-certificate".to_vec()];
        assert!(policy.verify_chain(&chain, Utc::now(), None).is_err());
    }

    #[test]
    fn undecodable_leaf_is_rejected_before_timestamp_fallback_is_considered() {
        let policy = AnchorTrustPolicy::new();
        let chain = vec![b"not-a-certificate".to_vec()];
        let ts = Timestamp {
            time: Utc::now(),
            certificate_chain: vec![b"also-not-a-certificate".to_vec()],
        };
        // A chain that can't even be parsed never reaches the
        // expired-cert-requires-timestamp branch; it fails the same way
        // with or without a timestamp supplied.
        assert!(policy.verify_chain(&chain, Utc::now(), Some(&ts)).is_err());
    }
}
