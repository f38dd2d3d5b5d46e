//! Shared helpers for integration tests

#![allow(dead_code)]

use cert_inspector::{normalize_at, CertificateRecord, DistinguishedName, RawCertificate};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rcgen::{BasicConstraints, CertificateParams, CertifiedKey, DnType, IsCa, KeyPair};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn dn(common_name: &str) -> DistinguishedName {
    DistinguishedName {
        common_name: Some(common_name.to_string()),
        organization: Some("Example Org".to_string()),
        ..Default::default()
    }
}

/// A healthy CA-issued leaf: 90 day validity, 60 days left
pub fn healthy_raw(common_name: &str, san: &str) -> RawCertificate {
    RawCertificate {
        subject: dn(common_name),
        issuer: dn("Example Issuing CA"),
        valid_from: now() - Duration::days(30),
        valid_to: now() + Duration::days(60),
        subject_alt_name: Some(san.to_string()),
        serial_number: Some("0A1B2C".to_string()),
        signature_algorithm: Some("sha256WithRSAEncryption".to_string()),
        modulus: Some("C".repeat(512)),
        exponent: Some("0x10001".to_string()),
        ..Default::default()
    }
}

pub fn record(raw: &RawCertificate) -> CertificateRecord {
    normalize_at(raw, now())
}

/// Self-signed certificate for the given names
pub fn self_signed(names: &[&str]) -> (CertificateDer<'static>, PrivateKeyDer<'static>) {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let CertifiedKey { cert, key_pair } = rcgen::generate_simple_self_signed(names).unwrap();
    (
        cert.der().clone(),
        PrivatePkcs8KeyDer::from(key_pair.serialize_der()).into(),
    )
}

/// Leaf signed by a throwaway root, returned as `[leaf, root]` plus the leaf key
pub fn ca_signed(names: &[&str]) -> (Vec<CertificateDer<'static>>, PrivateKeyDer<'static>) {
    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params
        .distinguished_name
        .push(DnType::CommonName, "Inspector Test Root");
    let ca = ca_params.self_signed(&ca_key).unwrap();

    let leaf_key = KeyPair::generate().unwrap();
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let mut leaf_params = CertificateParams::new(names.clone()).unwrap();
    leaf_params
        .distinguished_name
        .push(DnType::CommonName, names[0].as_str());
    let leaf = leaf_params.signed_by(&leaf_key, &ca, &ca_key).unwrap();

    (
        vec![leaf.der().clone(), ca.der().clone()],
        PrivatePkcs8KeyDer::from(leaf_key.serialize_der()).into(),
    )
}

/// Serve `chain` over TLS on an ephemeral loopback port until the test ends
pub async fn spawn_tls_server(
    chain: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
) -> SocketAddr {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let mut buf = [0u8; 64];
                    let _ = tls.read(&mut buf).await;
                }
            });
        }
    });

    addr
}

/// Accept TCP connections and never answer
pub async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    addr
}

/// A loopback port with nothing listening on it
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}
