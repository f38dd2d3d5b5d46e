//! Hostname verification against a certificate's identity claims
//!
//! Matches a host (domain name or IP literal) against the subject Common Name
//! and the DNS/IP Subject Alternative Names.

use crate::certificate::info::{decode_alt_names, CertificateRecord, SubjectAltName};
use crate::certificate::raw::RawCertificate;
use std::borrow::Cow;

/// Anything that carries a Common Name and typed SAN entries
pub trait CertificateIdentity {
    fn common_name(&self) -> Option<&str>;
    fn alt_names(&self) -> Cow<'_, [SubjectAltName]>;
}

impl CertificateIdentity for CertificateRecord {
    fn common_name(&self) -> Option<&str> {
        self.subject.common_name.as_deref()
    }

    fn alt_names(&self) -> Cow<'_, [SubjectAltName]> {
        Cow::Borrowed(&self.alt_names)
    }
}

impl CertificateIdentity for RawCertificate {
    fn common_name(&self) -> Option<&str> {
        self.subject.common_name.as_deref()
    }

    fn alt_names(&self) -> Cow<'_, [SubjectAltName]> {
        let (_, typed) = decode_alt_names(self.subject_alt_name.as_deref());
        Cow::Owned(typed)
    }
}

/// How a host string is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Ipv4,
    Ipv6,
    Domain,
}

impl HostKind {
    pub fn classify(host: &str) -> Self {
        if is_ipv4_literal(host) {
            HostKind::Ipv4
        } else if is_ipv6_literal(host) {
            HostKind::Ipv6
        } else {
            HostKind::Domain
        }
    }

    pub fn is_ip(&self) -> bool {
        matches!(self, HostKind::Ipv4 | HostKind::Ipv6)
    }
}

/// Check whether `host` is covered by the certificate's CN or SANs
pub fn verify_hostname<C: CertificateIdentity + ?Sized>(host: &str, cert: &C) -> bool {
    let kind = HostKind::classify(host);

    if let Some(cn) = cert.common_name() {
        if cn == host {
            return true;
        }
        if !kind.is_ip() && wildcard_matches(cn, host) {
            return true;
        }
    }

    cert.alt_names().iter().any(|san| match (san, kind.is_ip()) {
        (SubjectAltName::IpAddress(ip), true) => ip == host,
        (SubjectAltName::Dns(name), false) => name == host || wildcard_matches(name, host),
        _ => false,
    })
}

/// `*.example.com` covers exactly one extra label in front of `example.com`.
///
/// Shared by the Common Name and DNS SAN checks.
fn wildcard_matches(pattern: &str, host: &str) -> bool {
    let Some(base) = pattern.strip_prefix("*.") else {
        return false;
    };
    if base.is_empty() || label_count(pattern) != label_count(host) {
        return false;
    }
    strip_leftmost_label(host) == Some(base)
}

fn label_count(name: &str) -> usize {
    name.split('.').count()
}

fn strip_leftmost_label(host: &str) -> Option<&str> {
    match host.split_once('.') {
        Some((label, rest)) if !label.is_empty() => Some(rest),
        _ => None,
    }
}

/// Four dot-separated decimal octets, each 0-255
fn is_ipv4_literal(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            !octet.is_empty()
                && octet.len() <= 3
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u8>().is_ok()
        })
}

/// Canonical eight-group form, or any hex/colon form using `::` compression.
///
/// Deliberately permissive; this is not a full RFC 4291 validator.
fn is_ipv6_literal(host: &str) -> bool {
    if host.contains("::") {
        return host
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.');
    }

    let groups: Vec<&str> = host.split(':').collect();
    groups.len() == 8
        && groups
            .iter()
            .all(|g| (1..=4).contains(&g.len()) && g.chars().all(|c| c.is_ascii_hexdigit()))
}
