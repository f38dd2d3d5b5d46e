//! Utility modules for cert-inspector
//!
//! This module contains the error types shared by every component.

pub mod error;

pub use error::{CertificateError, ConfigError, ErrorKind, Result, ToolkitError, UnknownErrorCode};
