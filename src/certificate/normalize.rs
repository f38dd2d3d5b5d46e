//! Conversion of raw certificates into [`CertificateRecord`]s

use crate::certificate::info::{decode_alt_names, CertificateRecord};
use crate::certificate::raw::RawCertificate;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Upper bound on issuer links followed while normalizing
pub const MAX_CHAIN_DEPTH: usize = 10;

/// Normalize against the current time
pub fn normalize(raw: &RawCertificate) -> CertificateRecord {
    normalize_at(raw, Utc::now())
}

/// Normalize against a fixed "now"
pub fn normalize_at(raw: &RawCertificate, now: DateTime<Utc>) -> CertificateRecord {
    normalize_link(raw, now, 0)
}

fn normalize_link(raw: &RawCertificate, now: DateTime<Utc>, depth: usize) -> CertificateRecord {
    let (subject_alt_names, alt_names) = decode_alt_names(raw.subject_alt_name.as_deref());

    // A self-issued certificate is a chain root even if a link was attached.
    let issuer_certificate = match &raw.issuer_certificate {
        Some(issuer) if !raw.is_self_issued() && depth + 1 < MAX_CHAIN_DEPTH => {
            Some(Box::new(normalize_link(issuer, now, depth + 1)))
        }
        _ => None,
    };

    let raw_extensions = if raw.extensions.is_empty() {
        None
    } else {
        Some(
            raw.extensions
                .iter()
                .map(|(oid, value)| (oid.clone(), STANDARD.encode(value)))
                .collect(),
        )
    };

    CertificateRecord {
        valid_from: raw.valid_from,
        valid_to: raw.valid_to,
        days_total: days_total(raw.valid_from, raw.valid_to),
        days_left: days_left(raw.valid_to, now),
        expired: raw.valid_to < now,
        subject_alt_names,
        alt_names,
        subject: raw.subject.clone(),
        issuer: raw.issuer.clone(),
        serial_number: raw.serial_number.clone(),
        signature_algorithm: raw.signature_algorithm.clone(),
        fingerprint256: raw.fingerprint256.clone(),
        modulus: raw.modulus.clone(),
        exponent: raw.exponent.clone(),
        public_key_base64: raw.public_key.as_ref().map(|key| STANDARD.encode(key)),
        raw_base64: raw.raw.as_ref().map(|der| STANDARD.encode(der)),
        raw_extensions,
        issuer_certificate,
    }
}

/// `ceil(|to - from|)` in days
pub fn days_total(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let span_ms = (to - from).num_milliseconds().abs();
    (span_ms as f64 / MS_PER_DAY).ceil() as i64
}

/// `ceil(to - now)` in days; negative once `to` has passed
pub fn days_left(to: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let remaining_ms = (to - now).num_milliseconds();
    (remaining_ms as f64 / MS_PER_DAY).ceil() as i64
}
