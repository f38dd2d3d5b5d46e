//! Custom error types for cert-inspector
//!
//! The fetcher is the only component that fails. Its failures are reported as
//! a [`CertificateError`] carrying a machine-readable [`ErrorKind`] next to a
//! human-readable message.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Top-level error type for cert-inspector
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Certificate error: {0}")]
    Certificate(#[from] CertificateError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Error codes reported by the certificate fetcher.
///
/// Besides the four codes produced by this crate, the X.509/TLS codes are
/// passed through when the handshake reports one of them (chiefly when trust
/// verification is enabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidPort,
    Timeout,
    MissingCertificate,
    CertError,

    UnableToGetIssuerCert,
    UnableToGetCrl,
    UnableToDecryptCertSignature,
    UnableToDecryptCrlSignature,
    UnableToDecodeIssuerPublicKey,
    CertSignatureFailure,
    CrlSignatureFailure,
    CertNotYetValid,
    CertHasExpired,
    CrlNotYetValid,
    CrlHasExpired,
    ErrorInCertNotBeforeField,
    ErrorInCertNotAfterField,
    ErrorInCrlLastUpdateField,
    ErrorInCrlNextUpdateField,
    OutOfMem,
    DepthZeroSelfSignedCert,
    SelfSignedCertInChain,
    UnableToGetIssuerCertLocally,
    UnableToVerifyLeafSignature,
    CertChainTooLong,
    CertRevoked,
    InvalidCa,
    PathLengthExceeded,
    InvalidPurpose,
    CertUntrusted,
    CertRejected,
    HostnameMismatch,
    ErrTlsCertAltnameInvalid,
}

impl ErrorKind {
    /// Every known code, in catalog order
    pub const ALL: [ErrorKind; 33] = [
        ErrorKind::InvalidPort,
        ErrorKind::Timeout,
        ErrorKind::MissingCertificate,
        ErrorKind::CertError,
        ErrorKind::UnableToGetIssuerCert,
        ErrorKind::UnableToGetCrl,
        ErrorKind::UnableToDecryptCertSignature,
        ErrorKind::UnableToDecryptCrlSignature,
        ErrorKind::UnableToDecodeIssuerPublicKey,
        ErrorKind::CertSignatureFailure,
        ErrorKind::CrlSignatureFailure,
        ErrorKind::CertNotYetValid,
        ErrorKind::CertHasExpired,
        ErrorKind::CrlNotYetValid,
        ErrorKind::CrlHasExpired,
        ErrorKind::ErrorInCertNotBeforeField,
        ErrorKind::ErrorInCertNotAfterField,
        ErrorKind::ErrorInCrlLastUpdateField,
        ErrorKind::ErrorInCrlNextUpdateField,
        ErrorKind::OutOfMem,
        ErrorKind::DepthZeroSelfSignedCert,
        ErrorKind::SelfSignedCertInChain,
        ErrorKind::UnableToGetIssuerCertLocally,
        ErrorKind::UnableToVerifyLeafSignature,
        ErrorKind::CertChainTooLong,
        ErrorKind::CertRevoked,
        ErrorKind::InvalidCa,
        ErrorKind::PathLengthExceeded,
        ErrorKind::InvalidPurpose,
        ErrorKind::CertUntrusted,
        ErrorKind::CertRejected,
        ErrorKind::HostnameMismatch,
        ErrorKind::ErrTlsCertAltnameInvalid,
    ];

    /// The wire form of the code, e.g. `CERT_HAS_EXPIRED`
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidPort => "INVALID_PORT",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::MissingCertificate => "MISSING_CERTIFICATE",
            ErrorKind::CertError => "CERT_ERROR",
            ErrorKind::UnableToGetIssuerCert => "UNABLE_TO_GET_ISSUER_CERT",
            ErrorKind::UnableToGetCrl => "UNABLE_TO_GET_CRL",
            ErrorKind::UnableToDecryptCertSignature => "UNABLE_TO_DECRYPT_CERT_SIGNATURE",
            ErrorKind::UnableToDecryptCrlSignature => "UNABLE_TO_DECRYPT_CRL_SIGNATURE",
            ErrorKind::UnableToDecodeIssuerPublicKey => "UNABLE_TO_DECODE_ISSUER_PUBLIC_KEY",
            ErrorKind::CertSignatureFailure => "CERT_SIGNATURE_FAILURE",
            ErrorKind::CrlSignatureFailure => "CRL_SIGNATURE_FAILURE",
            ErrorKind::CertNotYetValid => "CERT_NOT_YET_VALID",
            ErrorKind::CertHasExpired => "CERT_HAS_EXPIRED",
            ErrorKind::CrlNotYetValid => "CRL_NOT_YET_VALID",
            ErrorKind::CrlHasExpired => "CRL_HAS_EXPIRED",
            ErrorKind::ErrorInCertNotBeforeField => "ERROR_IN_CERT_NOT_BEFORE_FIELD",
            ErrorKind::ErrorInCertNotAfterField => "ERROR_IN_CERT_NOT_AFTER_FIELD",
            ErrorKind::ErrorInCrlLastUpdateField => "ERROR_IN_CRL_LAST_UPDATE_FIELD",
            ErrorKind::ErrorInCrlNextUpdateField => "ERROR_IN_CRL_NEXT_UPDATE_FIELD",
            ErrorKind::OutOfMem => "OUT_OF_MEM",
            ErrorKind::DepthZeroSelfSignedCert => "DEPTH_ZERO_SELF_SIGNED_CERT",
            ErrorKind::SelfSignedCertInChain => "SELF_SIGNED_CERT_IN_CHAIN",
            ErrorKind::UnableToGetIssuerCertLocally => "UNABLE_TO_GET_ISSUER_CERT_LOCALLY",
            ErrorKind::UnableToVerifyLeafSignature => "UNABLE_TO_VERIFY_LEAF_SIGNATURE",
            ErrorKind::CertChainTooLong => "CERT_CHAIN_TOO_LONG",
            ErrorKind::CertRevoked => "CERT_REVOKED",
            ErrorKind::InvalidCa => "INVALID_CA",
            ErrorKind::PathLengthExceeded => "PATH_LENGTH_EXCEEDED",
            ErrorKind::InvalidPurpose => "INVALID_PURPOSE",
            ErrorKind::CertUntrusted => "CERT_UNTRUSTED",
            ErrorKind::CertRejected => "CERT_REJECTED",
            ErrorKind::HostnameMismatch => "HOSTNAME_MISMATCH",
            ErrorKind::ErrTlsCertAltnameInvalid => "ERR_TLS_CERT_ALTNAME_INVALID",
        }
    }

    /// Map a code string reported by a TLS stack onto the catalog.
    ///
    /// Unrecognized codes collapse into [`ErrorKind::CertError`].
    pub fn from_code(code: &str) -> Self {
        code.parse().unwrap_or(ErrorKind::CertError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ErrorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// Returned when a code string is not part of the catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown certificate error code: {0}")]
pub struct UnknownErrorCode(pub String);

/// Failure to obtain a certificate from a remote endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct CertificateError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CertificateError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_port(port: u32) -> Self {
        Self::new(
            ErrorKind::InvalidPort,
            format!("Invalid port {}: must be between 1 and 65535", port),
        )
    }

    pub fn timeout(host: &str, port: u16, timeout_ms: u64) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!(
                "Connection to {}:{} timed out after {}ms",
                host, port, timeout_ms
            ),
        )
    }

    pub fn missing_certificate(host: &str, port: u16) -> Self {
        Self::new(
            ErrorKind::MissingCertificate,
            format!("No certificate was presented by {}:{}", host, port),
        )
    }

    pub fn cert_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CertError, message)
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;
