//! Evaluation and inspection result types

use crate::certificate::CertificateRecord;
use crate::utils::{CertificateError, ErrorKind};
use serde::Serialize;

/// Outcome of running the rule set over one certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    /// True iff no error rule fired
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl EvaluationReport {
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// Result of [`crate::runner::get_certificate_info`].
///
/// On success the normalized certificate is flattened next to the evaluation;
/// on failure only `valid`, `error` and (for fetch failures) `code` are set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(flatten)]
    pub certificate: Option<CertificateRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorKind>,
}

impl CertificateReport {
    pub fn evaluated(certificate: CertificateRecord, evaluation: EvaluationReport) -> Self {
        Self {
            valid: evaluation.valid,
            errors: evaluation.errors,
            warnings: evaluation.warnings,
            certificate: Some(certificate),
            error: None,
            code: None,
        }
    }

    pub fn failed(message: impl Into<String>, code: Option<ErrorKind>) -> Self {
        Self {
            valid: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            certificate: None,
            error: Some(message.into()),
            code,
        }
    }

    /// True when the certificate has expired; false if none was retrieved
    pub fn expired(&self) -> bool {
        self.certificate.as_ref().map_or(false, |c| c.expired)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<CertificateError> for CertificateReport {
    fn from(err: CertificateError) -> Self {
        Self::failed(err.message, Some(err.kind))
    }
}
