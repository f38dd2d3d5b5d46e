//! Data models for cert-inspector
//!
//! Result types returned by the evaluation engine and the facade.

pub mod report;

pub use report::{CertificateReport, EvaluationReport};
