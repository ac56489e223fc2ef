//! The enveloped signed-data layout carried inside a module-file's
//! `SIGNATURE` section (`spec.md` §4.6): a certificate chain (leaf first),
//! a signature over the hash-list payload, and the payload itself, each
//! framed with a 4-byte big-endian length, preceded by a 2-byte count of
//! entries. A well-formed envelope always has at least 3 entries: one
//! certificate, the signature, and the payload.
//!
//! An envelope may also carry a timestamp: the time a timestamping
//! authority attested the signature at, plus that authority's own
//! certificate chain (`spec.md` §4.6 point 4, "require a timestamp... and
//! validate the timestamper's chain"). It is framed after the entry list
//! as a single optional marker byte (`0` = absent, `1` = present) so that
//! an envelope with no timestamp round-trips to byte-identical output.

use crate::error::{Result, SignError};
use chrono::{DateTime, TimeZone, Utc};

/// A timestamping authority's attestation: the time it vouches for, and its
/// own certificate chain (leaf first, root last), which must itself be
/// validated against the trust policy.
#[derive(Debug, Clone)]
pub struct Timestamp {
    pub time: DateTime<Utc>,
    pub certificate_chain: Vec<Vec<u8>>,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    pub certificates: Vec<Vec<u8>>,
    pub signature: Vec<u8>,
    pub hash_list_payload: Vec<u8>,
    pub timestamp: Option<Timestamp>,
}

fn write_blob(out: &mut Vec<u8>, blob: &[u8]) {
    out.extend_from_slice(&(blob.len() as u32).to_be_bytes());
    out.extend_from_slice(blob);
}

#[must_use]
pub fn encode_envelope(
    certificates: &[Vec<u8>],
    signature: &[u8],
    payload: &[u8],
    timestamp: Option<&Timestamp>,
) -> Vec<u8> {
    let count = certificates.len() as u16 + 2;
    let mut out = Vec::new();
    out.extend_from_slice(&count.to_be_bytes());
    for cert in certificates {
        write_blob(&mut out, cert);
    }
    write_blob(&mut out, signature);
    write_blob(&mut out, payload);

    if let Some(ts) = timestamp {
        out.push(1);
        out.extend_from_slice(&ts.time.timestamp().to_be_bytes());
        out.extend_from_slice(&(ts.certificate_chain.len() as u16).to_be_bytes());
        for cert in &ts.certificate_chain {
            write_blob(&mut out, cert);
        }
    }
    out
}

pub fn decode_envelope(bytes: &[u8]) -> Result<Envelope> {
    let mut cursor = bytes;
    if cursor.len() < 2 {
        return Err(SignError::BadEnvelope("truncated entry count".into()));
    }
    let count = u16::from_be_bytes([cursor[0], cursor[1]]) as usize;
    cursor = &cursor[2..];
    if count < 3 {
        return Err(SignError::BadEnvelope(format!(
            "envelope has {count} entries, need at least 3"
        )));
    }

    let mut blobs = Vec::with_capacity(count);
    for _ in 0..count {
        if cursor.len() < 4 {
            return Err(SignError::BadEnvelope("truncated blob length".into()));
        }
        let len = u32::from_be_bytes([cursor[0], cursor[1], cursor[2], cursor[3]]) as usize;
        cursor = &cursor[4..];
        if cursor.len() < len {
            return Err(SignError::BadEnvelope("truncated blob".into()));
        }
        blobs.push(cursor[..len].to_vec());
        cursor = &cursor[len..];
    }

    let timestamp = if cursor.is_empty() {
        None
    } else {
        let marker = cursor[0];
        cursor = &cursor[1..];
        match marker {
            0 => None,
            1 => {
                if cursor.len() < 10 {
                    return Err(SignError::BadEnvelope("truncated timestamp".into()));
                }
                let secs = i64::from_be_bytes(cursor[0..8].try_into().unwrap());
                let time = Utc
                    .timestamp_opt(secs, 0)
                    .single()
                    .ok_or_else(|| SignError::BadEnvelope("invalid timestamp time".into()))?;
                let cert_count = u16::from_be_bytes([cursor[8], cursor[9]]) as usize;
                cursor = &cursor[10..];
                let mut certificate_chain = Vec::with_capacity(cert_count);
                for _ in 0..cert_count {
                    if cursor.len() < 4 {
                        return Err(SignError::BadEnvelope(
                            "truncated timestamp certificate length".into(),
                        ));
                    }
                    let len = u32::from_be_bytes(cursor[0..4].try_into().unwrap()) as usize;
                    cursor = &cursor[4..];
                    if cursor.len() < len {
                        return Err(SignError::BadEnvelope(
                            "truncated timestamp certificate".into(),
                        ));
                    }
                    certificate_chain.push(cursor[..len].to_vec());
                    cursor = &cursor[len..];
                }
                Some(Timestamp { time, certificate_chain })
            }
            _ => return Err(SignError::BadEnvelope("bad timestamp marker".into())),
        }
    };

    if !cursor.is_empty() {
        return Err(SignError::BadEnvelope("trailing bytes after envelope".into()));
    }

    let hash_list_payload = blobs.pop().expect("count >= 3 checked above");
    let signature = blobs.pop().expect("count >= 3 checked above");
    Ok(Envelope {
        certificates: blobs,
        signature,
        hash_list_payload,
        timestamp,
    })
}
