//! Certificate handling module
//!
//! This module provides functionality for:
//! - Parsing raw certificates presented during the handshake
//! - Normalizing them into stable records with expiry metrics
//! - Hostname verification against CN and SANs
//! - Rule-based health evaluation

pub mod hostname;
pub mod info;
pub mod normalize;
pub mod raw;
pub mod validation;

pub use hostname::{verify_hostname, CertificateIdentity, HostKind};
pub use info::{decode_alt_names, CertificateRecord, DistinguishedName, SubjectAltName};
pub use normalize::{normalize, normalize_at};
pub use raw::RawCertificate;
pub use validation::{evaluate, is_self_signed, CertificateEvaluator};
