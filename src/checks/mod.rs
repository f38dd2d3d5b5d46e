//! Check modules for cert-inspector
//!
//! This module contains the network-facing certificate fetcher.

pub mod ssl;

pub use ssl::{fetch_certificate, CertificateFetcher};
