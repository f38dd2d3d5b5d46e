//! Raw certificate data as retrieved from the TLS handshake
//!
//! Parses DER certificates with x509-parser into the loosely-derived
//! [`RawCertificate`] structure that the normalizer consumes.

use crate::certificate::info::DistinguishedName;
use crate::utils::CertificateError;
use chrono::{DateTime, TimeZone, Utc};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

/// Certificate fields as presented by the peer, before normalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawCertificate {
    pub subject: DistinguishedName,
    pub issuer: DistinguishedName,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    /// Comma-separated typed entries, e.g. `DNS:a.com, IP Address:10.0.0.1`
    pub subject_alt_name: Option<String>,
    pub serial_number: Option<String>,
    pub signature_algorithm: Option<String>,
    pub fingerprint256: Option<String>,
    /// RSA modulus as uppercase hex
    pub modulus: Option<String>,
    /// RSA public exponent, e.g. `0x10001`
    pub exponent: Option<String>,
    /// DER SubjectPublicKeyInfo
    pub public_key: Option<Vec<u8>>,
    /// DER certificate
    pub raw: Option<Vec<u8>>,
    /// Extension OID to raw extension value
    pub extensions: BTreeMap<String, Vec<u8>>,
    pub issuer_certificate: Option<Box<RawCertificate>>,
}

impl RawCertificate {
    /// Parse a single DER-encoded certificate
    pub fn from_der(der: &[u8]) -> Result<Self, CertificateError> {
        let (_, cert) = X509Certificate::from_der(der).map_err(|e| {
            CertificateError::cert_error(format!("Failed to parse certificate: {:?}", e))
        })?;

        let valid_from = asn1_time_to_datetime(cert.validity().not_before)?;
        let valid_to = asn1_time_to_datetime(cert.validity().not_after)?;

        let (modulus, exponent) = extract_rsa_components(&cert);

        let extensions = cert
            .extensions()
            .iter()
            .map(|ext| (ext.oid.to_id_string(), ext.value.to_vec()))
            .collect();

        Ok(RawCertificate {
            subject: extract_distinguished_name(cert.subject()),
            issuer: extract_distinguished_name(cert.issuer()),
            valid_from,
            valid_to,
            subject_alt_name: extract_san(&cert),
            serial_number: Some(hex::encode_upper(cert.raw_serial())),
            signature_algorithm: Some(oid_to_signature_name(
                &cert.signature_algorithm.algorithm.to_id_string(),
            )),
            fingerprint256: Some(fingerprint(der)),
            modulus,
            exponent,
            public_key: Some(cert.public_key().raw.to_vec()),
            raw: Some(der.to_vec()),
            extensions,
            issuer_certificate: None,
        })
    }

    /// Parse a leaf-first chain and link each certificate to its issuer.
    ///
    /// Only the leaf must parse. Linking stops at the first self-issued or
    /// unparseable issuer.
    pub fn from_der_chain<D: AsRef<[u8]>>(chain: &[D]) -> Result<Option<Self>, CertificateError> {
        let Some((leaf, issuers)) = chain.split_first() else {
            return Ok(None);
        };

        let leaf = Self::from_der(leaf.as_ref())?;
        let mut done = leaf.is_self_issued();
        let mut parsed = vec![leaf];
        for (depth, der) in issuers.iter().enumerate() {
            if done {
                break;
            }
            match Self::from_der(der.as_ref()) {
                Ok(cert) => {
                    done = cert.is_self_issued();
                    parsed.push(cert);
                }
                Err(e) => {
                    tracing::debug!("Dropping chain from depth {}: {}", depth + 1, e);
                    break;
                }
            }
        }

        let mut linked: Option<RawCertificate> = None;
        while let Some(mut cert) = parsed.pop() {
            cert.issuer_certificate = linked.map(Box::new);
            linked = Some(cert);
        }
        Ok(linked)
    }

    /// Subject identity equals issuer identity
    pub fn is_self_issued(&self) -> bool {
        !self.subject.is_empty() && self.subject == self.issuer
    }

    /// True when the peer handed over nothing usable
    pub fn is_empty(&self) -> bool {
        self.subject.is_empty()
            && self.issuer.is_empty()
            && self.subject_alt_name.is_none()
            && self.raw.as_ref().map_or(true, |r| r.is_empty())
    }
}

fn extract_distinguished_name(name: &X509Name) -> DistinguishedName {
    DistinguishedName {
        common_name: name.iter_common_name().find_map(attr_string),
        country: name.iter_country().find_map(attr_string),
        state: name.iter_state_or_province().find_map(attr_string),
        locality: name.iter_locality().find_map(attr_string),
        organization: name.iter_organization().find_map(attr_string),
        organizational_unit: name.iter_organizational_unit().find_map(attr_string),
    }
}

fn attr_string(attr: &AttributeTypeAndValue) -> Option<String> {
    attr.as_str().ok().map(|s| s.to_string())
}

fn extract_san(cert: &X509Certificate) -> Option<String> {
    let san_ext = match cert.subject_alternative_name() {
        Ok(Some(ext)) => ext,
        _ => return None,
    };

    let entries: Vec<String> = san_ext
        .value
        .general_names
        .iter()
        .filter_map(|name| match name {
            GeneralName::DNSName(dns) => Some(format!("DNS:{}", dns)),
            GeneralName::IPAddress(ip) => format_ip(ip).map(|ip| format!("IP Address:{}", ip)),
            GeneralName::RFC822Name(email) => Some(format!("email:{}", email)),
            GeneralName::URI(uri) => Some(format!("URI:{}", uri)),
            GeneralName::DirectoryName(dn) => Some(format!("DirName:{}", dn)),
            _ => None,
        })
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(entries.join(", "))
    }
}

fn format_ip(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

fn extract_rsa_components(cert: &X509Certificate) -> (Option<String>, Option<String>) {
    match cert.public_key().parsed() {
        Ok(PublicKey::RSA(rsa)) => {
            let start = rsa
                .modulus
                .iter()
                .position(|b| *b != 0)
                .unwrap_or(rsa.modulus.len());
            let modulus = hex::encode_upper(&rsa.modulus[start..]);
            let exponent = rsa.try_exponent().ok().map(|e| format!("0x{:x}", e));
            (Some(modulus), exponent)
        }
        _ => (None, None),
    }
}

/// Convert signature algorithm OID to its OpenSSL long name
fn oid_to_signature_name(oid: &str) -> String {
    match oid {
        "1.2.840.113549.1.1.2" => "md2WithRSAEncryption",
        "1.2.840.113549.1.1.4" => "md5WithRSAEncryption",
        "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption",
        "1.2.840.113549.1.1.10" => "rsassaPss",
        "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption",
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption",
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption",
        "1.2.840.10045.4.1" => "ecdsa-with-SHA1",
        "1.2.840.10045.4.3.2" => "ecdsa-with-SHA256",
        "1.2.840.10045.4.3.3" => "ecdsa-with-SHA384",
        "1.2.840.10045.4.3.4" => "ecdsa-with-SHA512",
        "1.3.101.112" => "ED25519",
        "1.3.101.113" => "ED448",
        other => return other.to_string(),
    }
    .to_string()
}

fn fingerprint(der: &[u8]) -> String {
    Sha256::digest(der)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, CertificateError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| CertificateError::cert_error("Invalid timestamp in certificate"))
}
