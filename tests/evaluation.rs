//! Evaluation rules over synthetic certificate records

mod common;

use cert_inspector::{
    CertificateEvaluator, CertificateReport, DistinguishedName, EvaluationSettings,
    RawCertificate,
};
use chrono::Duration;
use common::{dn, healthy_raw, now, record};

fn evaluator() -> CertificateEvaluator {
    CertificateEvaluator::default()
}

#[test]
fn test_healthy_certificate_is_clean() {
    let cert = record(&healthy_raw("example.com", "DNS:example.com, DNS:www.example.com"));
    let report = evaluator().evaluate_at(&cert, Some("www.example.com"), now());

    assert!(report.valid);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn test_all_errors_are_collected() {
    let raw = RawCertificate {
        subject: dn("self.example"),
        issuer: dn("self.example"),
        valid_from: now() - Duration::days(400),
        valid_to: now() - Duration::days(35),
        subject_alt_name: Some("DNS:self.example".to_string()),
        ..Default::default()
    };
    let cert = record(&raw);
    let report = evaluator().evaluate_at(&cert, Some("other.example"), now());

    assert!(!report.valid);
    assert_eq!(report.errors.len(), 3, "{:?}", report.errors);
    assert!(report.errors[0].contains("expired"));
    assert!(report.errors[1].contains("other.example"));
    assert!(report.errors[2].contains("self-signed"));
    assert!(cert.expired);
    assert_eq!(cert.days_left, -35);
}

#[test]
fn test_not_yet_valid() {
    let mut raw = healthy_raw("example.com", "DNS:example.com");
    raw.valid_from = now() + Duration::days(2);
    raw.valid_to = now() + Duration::days(92);

    let report = evaluator().evaluate_at(&record(&raw), Some("example.com"), now());

    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("not yet valid"));
}

#[test]
fn test_hostname_is_optional() {
    let cert = record(&healthy_raw("example.com", "DNS:example.com"));
    let report = evaluator().evaluate_at(&cert, None, now());
    assert!(report.valid);
}

#[test]
fn test_expiry_warning_boundary() {
    let mut raw = healthy_raw("example.com", "DNS:example.com");

    raw.valid_to = now() + Duration::days(30);
    let report = evaluator().evaluate_at(&record(&raw), None, now());
    assert!(report.valid);
    assert_eq!(report.warnings, vec!["Certificate expires in 30 days"]);

    raw.valid_to = now() + Duration::days(31);
    let report = evaluator().evaluate_at(&record(&raw), None, now());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_expired_certificate_gets_no_expiry_warning() {
    let mut raw = healthy_raw("example.com", "DNS:example.com");
    raw.valid_to = now() - Duration::days(1);

    let report = evaluator().evaluate_at(&record(&raw), None, now());
    assert!(!report.valid);
    assert!(report.warnings.iter().all(|w| !w.contains("expires in")));
}

#[test]
fn test_structural_warnings() {
    let raw = RawCertificate {
        subject: DistinguishedName {
            organization: Some("No CN Inc".to_string()),
            ..Default::default()
        },
        valid_from: now() - Duration::days(30),
        valid_to: now() + Duration::days(60),
        ..Default::default()
    };
    let report = evaluator().evaluate_at(&record(&raw), None, now());

    // Missing fields are warnings, never errors
    assert!(report.valid);
    assert_eq!(
        report.warnings,
        vec![
            "Certificate is missing Common Name",
            "Certificate is missing issuer information",
            "Certificate is missing Subject Alternative Names",
        ]
    );
}

#[test]
fn test_validity_period_warnings() {
    let mut raw = healthy_raw("example.com", "DNS:example.com");
    raw.valid_from = now() - Duration::days(500);
    raw.valid_to = now() + Duration::days(100);

    let report = evaluator().evaluate_at(&record(&raw), None, now());
    assert_eq!(
        report.warnings,
        vec!["Certificate has an unusually long validity period (600 days)"]
    );

    raw.valid_from = now() + Duration::days(1);
    raw.valid_to = raw.valid_from;
    let report = evaluator().evaluate_at(&record(&raw), None, now());
    assert!(report
        .warnings
        .contains(&"Certificate has an unusually short validity period".to_string()));
}

#[test]
fn test_weak_crypto_warnings() {
    let mut raw = healthy_raw("example.com", "DNS:example.com");
    raw.signature_algorithm = Some("sha1WithRSAEncryption".to_string());
    raw.modulus = Some("A".repeat(256));

    let report = evaluator().evaluate_at(&record(&raw), Some("example.com"), now());

    assert!(report.valid);
    assert_eq!(
        report.warnings,
        vec![
            "Certificate uses a weak signature algorithm (sha1WithRSAEncryption)",
            "Certificate uses a weak RSA key size (1024 bits)",
        ]
    );
}

#[test]
fn test_non_rsa_key_skips_key_size_rule() {
    let mut raw = healthy_raw("example.com", "DNS:example.com");
    raw.modulus = None;
    raw.exponent = None;
    raw.signature_algorithm = Some("ecdsa-with-SHA256".to_string());

    let report = evaluator().evaluate_at(&record(&raw), None, now());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_custom_thresholds() {
    let evaluator = CertificateEvaluator::new(EvaluationSettings {
        expiry_warning_days: 90,
        min_rsa_key_bits: 4096,
        ..Default::default()
    });
    let cert = record(&healthy_raw("example.com", "DNS:example.com"));
    let report = evaluator.evaluate_at(&cert, None, now());

    assert_eq!(
        report.warnings,
        vec![
            "Certificate expires in 60 days",
            "Certificate uses a weak RSA key size (2048 bits)",
        ]
    );
}

#[test]
fn test_evaluated_report_json() {
    let cert = record(&healthy_raw("example.com", "DNS:example.com"));
    let evaluation = evaluator().evaluate_at(&cert, Some("example.com"), now());
    let report = CertificateReport::evaluated(cert, evaluation);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["daysLeft"], 60);
    assert_eq!(json["daysTotal"], 90);
    assert_eq!(json["subject"]["commonName"], "example.com");
    assert_eq!(json["subjectAltNames"][0], "example.com");
    assert!(json.get("code").is_none());
    assert!(json.get("errors").is_none());
}
