//! cert-inspector
//!
//! Retrieves the certificate presented by a TLS endpoint and answers "is this
//! certificate OK":
//! - Minimal TLS handshake with a timeout, trust verification optional
//! - Normalized certificate records with validity metrics and decoded SANs
//! - Hostname matching (exact, single-label wildcard, IP literal)
//! - Rule-based evaluation producing errors and warnings
//!
//! # Usage
//!
//! ```rust,ignore
//! use cert_inspector::{get_certificate_info, FetchSettings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let report = get_certificate_info("example.com", &FetchSettings::default()).await;
//!     if !report.valid {
//!         eprintln!("{:?} {:?}", report.errors, report.error);
//!     }
//! }
//! ```

pub mod certificate;
pub mod checks;
pub mod config;
pub mod models;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use certificate::{
    evaluate, normalize, normalize_at, verify_hostname, CertificateEvaluator,
    CertificateIdentity, CertificateRecord, DistinguishedName, RawCertificate, SubjectAltName,
};
pub use checks::{fetch_certificate, CertificateFetcher};
pub use config::{EvaluationSettings, FetchSettings, Settings};
pub use models::{CertificateReport, EvaluationReport};
pub use runner::{get_certificate_info, CertificateInspector};
pub use utils::{CertificateError, ErrorKind, Result, ToolkitError};
