//! Certificate information structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Distinguished Name components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DistinguishedName {
    pub common_name: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "stateOrProvince")]
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
}

impl DistinguishedName {
    /// True when none of the six fields is populated
    pub fn is_empty(&self) -> bool {
        self.common_name.is_none()
            && self.country.is_none()
            && self.state.is_none()
            && self.locality.is_none()
            && self.organization.is_none()
            && self.organizational_unit.is_none()
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(cn) = &self.common_name {
            parts.push(format!("CN={}", cn));
        }
        if let Some(o) = &self.organization {
            parts.push(format!("O={}", o));
        }
        if let Some(ou) = &self.organizational_unit {
            parts.push(format!("OU={}", ou));
        }
        if let Some(c) = &self.country {
            parts.push(format!("C={}", c));
        }
        if let Some(st) = &self.state {
            parts.push(format!("ST={}", st));
        }
        if let Some(l) = &self.locality {
            parts.push(format!("L={}", l));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// A typed Subject Alternative Name entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum SubjectAltName {
    Dns(String),
    IpAddress(String),
}

impl SubjectAltName {
    const DNS_PREFIX: &'static str = "DNS:";
    const IP_PREFIX: &'static str = "IP Address:";

    /// Parse one `DNS:`/`IP Address:` entry; other entry types yield `None`
    pub fn parse(entry: &str) -> Option<Self> {
        if let Some(name) = entry.strip_prefix(Self::DNS_PREFIX) {
            Some(SubjectAltName::Dns(name.trim_start().to_string()))
        } else {
            entry
                .strip_prefix(Self::IP_PREFIX)
                .map(|ip| SubjectAltName::IpAddress(ip.trim_start().to_string()))
        }
    }

    pub fn value(&self) -> &str {
        match self {
            SubjectAltName::Dns(name) => name,
            SubjectAltName::IpAddress(ip) => ip,
        }
    }
}

impl fmt::Display for SubjectAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectAltName::Dns(name) => write!(f, "{}{}", Self::DNS_PREFIX, name),
            SubjectAltName::IpAddress(ip) => write!(f, "{}{}", Self::IP_PREFIX, ip),
        }
    }
}

/// Decode a raw SAN string such as `DNS:a.com, IP Address:10.0.0.1`.
///
/// Returns the display list (recognized prefixes stripped, other entries kept
/// verbatim) and the typed list (recognized entries only).
pub fn decode_alt_names(raw: Option<&str>) -> (Vec<String>, Vec<SubjectAltName>) {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return (Vec::new(), Vec::new()),
    };

    let mut display = Vec::new();
    let mut typed = Vec::new();
    for entry in raw.split(", ") {
        match SubjectAltName::parse(entry) {
            Some(san) => {
                display.push(san.value().to_string());
                typed.push(san);
            }
            None => display.push(entry.to_string()),
        }
    }

    (display, typed)
}

/// Normalized snapshot of a certificate.
///
/// Built by [`crate::certificate::normalize`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    /// Ceiling of the day span between `valid_from` and `valid_to`
    pub days_total: i64,
    /// Ceiling of the days remaining; negative once expired
    pub days_left: i64,
    pub expired: bool,
    pub subject_alt_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub alt_names: Vec<SubjectAltName>,
    pub subject: DistinguishedName,
    pub issuer: DistinguishedName,
    pub serial_number: Option<String>,
    pub signature_algorithm: Option<String>,
    pub fingerprint256: Option<String>,
    pub modulus: Option<String>,
    pub exponent: Option<String>,
    pub public_key_base64: Option<String>,
    pub raw_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub raw_extensions: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub issuer_certificate: Option<Box<CertificateRecord>>,
}

impl CertificateRecord {
    /// The certificate and its issuers, leaf first
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Estimated RSA key size in bits, from the hex length of the modulus
    pub fn rsa_key_bits(&self) -> Option<usize> {
        match (&self.modulus, &self.exponent) {
            (Some(modulus), Some(_)) => Some(modulus.len() * 4),
            _ => None,
        }
    }
}

/// Iterator over a record's issuer links
pub struct Chain<'a> {
    next: Option<&'a CertificateRecord>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a CertificateRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.issuer_certificate.as_deref();
        Some(current)
    }
}
