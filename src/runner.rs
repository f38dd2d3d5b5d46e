//! Inspection pipeline
//!
//! Composes fetch, normalization and evaluation into one call that always
//! resolves to a [`CertificateReport`], whatever happens on the wire.

use crate::certificate::{normalize, CertificateEvaluator};
use crate::checks::CertificateFetcher;
use crate::config::{FetchSettings, Settings};
use crate::models::CertificateReport;
use crate::utils::Result;
use std::path::Path;

const UNEXPECTED_FAILURE: &str = "Unexpected error while retrieving certificate";

/// Fetches, normalizes and evaluates certificates with fixed settings
#[derive(Debug, Clone, Default)]
pub struct CertificateInspector {
    settings: Settings,
}

impl CertificateInspector {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Build an inspector from a TOML settings file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Settings::load_from_file(path)?))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Inspect `host` with the configured fetch settings
    pub async fn inspect(&self, host: &str) -> CertificateReport {
        self.inspect_with(host, &self.settings.fetch).await
    }

    /// Inspect `host` with per-call fetch settings.
    ///
    /// Never fails: fetch errors carry their code, anything else is reported
    /// with a generic message and no code.
    pub async fn inspect_with(&self, host: &str, fetch: &FetchSettings) -> CertificateReport {
        let fetcher = CertificateFetcher::new(fetch.clone());
        let evaluator = CertificateEvaluator::new(self.settings.evaluation.clone());
        let target = host.to_string();

        let pipeline =
            tokio::spawn(async move { run_pipeline(&fetcher, &evaluator, &target).await });

        match pipeline.await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Inspection of {} aborted: {}", host, e);
                CertificateReport::failed(UNEXPECTED_FAILURE, None)
            }
        }
    }
}

async fn run_pipeline(
    fetcher: &CertificateFetcher,
    evaluator: &CertificateEvaluator,
    host: &str,
) -> CertificateReport {
    let raw = match fetcher.fetch(host).await {
        Ok(raw) => raw,
        Err(e) => return e.into(),
    };

    let record = normalize(&raw);
    let evaluation = evaluator.evaluate(&record, Some(host));
    tracing::debug!(
        "{}: valid={} errors={} warnings={}",
        host,
        evaluation.valid,
        evaluation.errors.len(),
        evaluation.warnings.len()
    );

    CertificateReport::evaluated(record, evaluation)
}

/// Fetch and evaluate the certificate of `host`; never fails
pub async fn get_certificate_info(host: &str, options: &FetchSettings) -> CertificateReport {
    let settings = Settings {
        fetch: options.clone(),
        ..Default::default()
    };
    CertificateInspector::new(settings).inspect(host).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{ConfigError, ErrorKind, ToolkitError};

    #[tokio::test]
    async fn test_invalid_port_is_reported_not_raised() {
        let report = get_certificate_info("example.com", &FetchSettings::default().with_port(0)).await;

        assert!(!report.valid);
        assert_eq!(report.code, Some(ErrorKind::InvalidPort));
        assert!(report.error.is_some());
        assert!(report.certificate.is_none());
    }

    #[test]
    fn test_missing_config_file() {
        let result = CertificateInspector::from_config_file("missing/inspector.toml");
        assert!(matches!(
            result,
            Err(ToolkitError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
