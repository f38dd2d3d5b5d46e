//! Live endpoint scenarios
//!
//! These need outbound network access. Run with `cargo test -- --ignored`.

use cert_inspector::{fetch_certificate, get_certificate_info, ErrorKind, FetchSettings};

fn settings() -> FetchSettings {
    FetchSettings::default().with_timeout_ms(10_000)
}

#[tokio::test]
#[ignore]
async fn test_public_site_is_valid() {
    let report = get_certificate_info("google.com", &settings()).await;

    assert!(report.valid, "{:?} {:?}", report.errors, report.error);
    let cert = report.certificate.as_ref().unwrap();
    assert!(cert.days_left > 0);
    assert!(cert.issuer_certificate.is_some());
}

#[tokio::test]
#[ignore]
async fn test_expired_site() {
    let report = get_certificate_info("expired.badssl.com", &settings()).await;

    assert!(!report.valid);
    assert!(report.expired());
    assert!(report.errors.iter().any(|e| e.contains("expired")));
}

#[tokio::test]
#[ignore]
async fn test_wrong_host_site() {
    let report = get_certificate_info("wrong.host.badssl.com", &settings()).await;

    assert!(!report.valid);
    assert!(report
        .errors
        .iter()
        .any(|e| e.contains("wrong.host.badssl.com")));
}

#[tokio::test]
#[ignore]
async fn test_self_signed_site() {
    let report = get_certificate_info("self-signed.badssl.com", &settings()).await;

    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e.contains("self-signed")));
}

#[tokio::test]
#[ignore]
async fn test_trust_verification_reports_expiry_code() {
    let report = get_certificate_info(
        "expired.badssl.com",
        &settings().with_verify_trust(true),
    )
    .await;

    assert!(!report.valid);
    assert_eq!(report.code, Some(ErrorKind::CertHasExpired));
}

#[tokio::test]
#[ignore]
async fn test_unresolvable_host() {
    let report = get_certificate_info("does-not-exist.invalid", &settings()).await;

    assert!(!report.valid);
    assert_eq!(report.code, Some(ErrorKind::CertError));
}

#[tokio::test]
#[ignore]
async fn test_one_millisecond_timeout() {
    let err = fetch_certificate("google.com", &FetchSettings::default().with_timeout_ms(1))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Timeout);
}
