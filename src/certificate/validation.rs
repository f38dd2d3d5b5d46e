//! Certificate evaluation rules
//!
//! Every rule runs on every call so the report is always complete. Errors make
//! the certificate invalid; warnings are informational.

use crate::certificate::hostname::verify_hostname;
use crate::certificate::info::CertificateRecord;
use crate::config::EvaluationSettings;
use crate::models::EvaluationReport;
use chrono::{DateTime, Utc};

/// Signature algorithms considered weak, in both OpenSSL naming forms
const WEAK_SIGNATURE_ALGORITHMS: [&str; 4] = [
    "md5WithRSAEncryption",
    "sha1WithRSAEncryption",
    "RSA-MD5",
    "RSA-SHA1",
];

/// Rule-based certificate evaluator
#[derive(Debug, Clone, Default)]
pub struct CertificateEvaluator {
    settings: EvaluationSettings,
}

impl CertificateEvaluator {
    pub fn new(settings: EvaluationSettings) -> Self {
        Self { settings }
    }

    /// Evaluate against the current time
    pub fn evaluate(&self, record: &CertificateRecord, host: Option<&str>) -> EvaluationReport {
        self.evaluate_at(record, host, Utc::now())
    }

    /// Evaluate against a fixed "now"
    pub fn evaluate_at(
        &self,
        record: &CertificateRecord,
        host: Option<&str>,
        now: DateTime<Utc>,
    ) -> EvaluationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if now < record.valid_from {
            errors.push(format!(
                "Certificate is not yet valid (valid from {})",
                record.valid_from.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        let expired = now > record.valid_to;
        if expired {
            errors.push(format!(
                "Certificate has expired (expired on {})",
                record.valid_to.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        if let Some(host) = host {
            if !verify_hostname(host, record) {
                errors.push(format!(
                    "Hostname {} does not match certificate subject/SAN",
                    host
                ));
            }
        }

        if is_self_signed(record) {
            errors.push("Certificate is self-signed".to_string());
        }

        if !expired
            && record.days_left > 0
            && record.days_left <= self.settings.expiry_warning_days
        {
            warnings.push(format!("Certificate expires in {} days", record.days_left));
        }

        if record.subject.common_name.is_none() {
            warnings.push("Certificate is missing Common Name".to_string());
        }

        if record.issuer.is_empty() {
            warnings.push("Certificate is missing issuer information".to_string());
        }

        if record.subject_alt_names.is_empty() {
            warnings.push("Certificate is missing Subject Alternative Names".to_string());
        }

        if record.days_total < self.settings.min_validity_days {
            warnings.push("Certificate has an unusually short validity period".to_string());
        }

        if record.days_total > self.settings.max_validity_days {
            warnings.push(format!(
                "Certificate has an unusually long validity period ({} days)",
                record.days_total
            ));
        }

        if let Some(algorithm) = record.signature_algorithm.as_deref() {
            if is_weak_signature_algorithm(algorithm) {
                warnings.push(format!(
                    "Certificate uses a weak signature algorithm ({})",
                    algorithm
                ));
            }
        }

        if let Some(bits) = record.rsa_key_bits() {
            if bits < self.settings.min_rsa_key_bits {
                warnings.push(format!(
                    "Certificate uses a weak RSA key size ({} bits)",
                    bits
                ));
            }
        }

        EvaluationReport::new(errors, warnings)
    }
}

/// Evaluate with the default thresholds
pub fn evaluate(record: &CertificateRecord, host: Option<&str>) -> EvaluationReport {
    CertificateEvaluator::default().evaluate(record, host)
}

/// Heuristic self-signature check.
///
/// Equal Common Names count as self-signed. When either side lacks a CN the
/// full field sets are compared instead; an empty issuer never matches.
pub fn is_self_signed(record: &CertificateRecord) -> bool {
    match (
        record.subject.common_name.as_deref(),
        record.issuer.common_name.as_deref(),
    ) {
        (Some(subject_cn), Some(issuer_cn)) => subject_cn == issuer_cn,
        _ => !record.issuer.is_empty() && record.subject == record.issuer,
    }
}

fn is_weak_signature_algorithm(algorithm: &str) -> bool {
    WEAK_SIGNATURE_ALGORITHMS
        .iter()
        .any(|weak| weak.eq_ignore_ascii_case(algorithm))
}
