//! Certificate fetcher
//!
//! Performs a TLS handshake against a remote endpoint and captures the
//! certificate it presents. Trust verification is disabled by default so that
//! expired, self-signed and otherwise untrusted certificates can be analyzed.

use crate::certificate::RawCertificate;
use crate::config::FetchSettings;
use crate::utils::{CertificateError, ErrorKind};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{
    CertificateError as TlsCertificateError, ClientConfig, DigitallySignedStruct,
    Error as RustlsError, RootCertStore, SignatureScheme,
};
use std::io;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// A certificate verifier that accepts any certificate.
/// Used when trust verification is off so untrusted certs can be inspected.
#[derive(Debug)]
struct AcceptAnyCertVerifier;

impl ServerCertVerifier for AcceptAnyCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA1,
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_SHA1_Legacy,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

/// Fetches the certificate presented by a TLS endpoint
#[derive(Debug, Clone, Default)]
pub struct CertificateFetcher {
    settings: FetchSettings,
}

impl CertificateFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Connect to `host`, complete a handshake and return the peer certificate.
    ///
    /// Exactly one connection is opened; no retries are attempted.
    pub async fn fetch(&self, host: &str) -> Result<RawCertificate, CertificateError> {
        let port = u16::try_from(self.settings.port)
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| CertificateError::invalid_port(self.settings.port))?;

        let connector = TlsConnector::from(Arc::new(self.client_config()?));
        let server_name = ServerName::try_from(host.to_string()).map_err(|_| {
            CertificateError::cert_error(format!("Invalid server name: {}", host))
        })?;

        tracing::debug!(
            "Connecting to {}:{} (timeout {}ms, verify_trust {})",
            host,
            port,
            self.settings.timeout_ms,
            self.settings.verify_trust
        );

        // Dropping the handshake future on timeout closes the socket.
        let handshake = async {
            let stream = TcpStream::connect((host, port)).await?;
            connector.connect(server_name, stream).await
        };

        let mut tls_stream = match tokio::time::timeout(self.settings.timeout(), handshake).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                let err = map_connection_error(host, port, &e);
                tracing::warn!("Handshake with {}:{} failed: {}", host, port, err);
                return Err(err);
            }
            Err(_) => {
                tracing::warn!("Handshake with {}:{} timed out", host, port);
                return Err(CertificateError::timeout(
                    host,
                    port,
                    self.settings.timeout_ms,
                ));
            }
        };

        let chain: Vec<Vec<u8>> = {
            let (_, connection) = tls_stream.get_ref();
            let presented = connection.peer_certificates().unwrap_or_default();
            let wanted = if self.settings.detailed {
                presented.len()
            } else {
                presented.len().min(1)
            };
            presented[..wanted]
                .iter()
                .map(|c| c.as_ref().to_vec())
                .collect()
        };

        // Half-close; nothing else is exchanged on this connection.
        if let Err(e) = tls_stream.shutdown().await {
            tracing::debug!("Shutdown of {}:{} failed: {}", host, port, e);
        }
        drop(tls_stream);

        tracing::debug!("{}:{} presented {} certificate(s)", host, port, chain.len());

        match RawCertificate::from_der_chain(&chain)? {
            Some(cert) if !cert.is_empty() => Ok(cert),
            _ => Err(CertificateError::missing_certificate(host, port)),
        }
    }

    fn client_config(&self) -> Result<ClientConfig, CertificateError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let verifier: Arc<dyn ServerCertVerifier> = if self.settings.verify_trust {
            trusted_verifier(Arc::clone(&provider))?
        } else {
            Arc::new(AcceptAnyCertVerifier)
        };

        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| CertificateError::cert_error(format!("TLS configuration error: {}", e)))?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();

        Ok(config)
    }
}

fn trusted_verifier(
    provider: Arc<CryptoProvider>,
) -> Result<Arc<dyn ServerCertVerifier>, CertificateError> {
    let root_store = RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let verifier: Arc<dyn ServerCertVerifier> =
        WebPkiServerVerifier::builder_with_provider(Arc::new(root_store), provider)
            .build()
            .map_err(|e| {
                CertificateError::cert_error(format!("Failed to build verifier: {}", e))
            })?;
    Ok(verifier)
}

/// Fetch the certificate presented by `host` with the given options
pub async fn fetch_certificate(
    host: &str,
    options: &FetchSettings,
) -> Result<RawCertificate, CertificateError> {
    CertificateFetcher::new(options.clone()).fetch(host).await
}

fn map_connection_error(host: &str, port: u16, err: &io::Error) -> CertificateError {
    let kind = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<RustlsError>())
        .map(classify_tls_error)
        .unwrap_or(ErrorKind::CertError);

    CertificateError::new(
        kind,
        format!("Failed to retrieve certificate from {}:{}: {}", host, port, err),
    )
}

fn classify_tls_error(err: &RustlsError) -> ErrorKind {
    match err {
        RustlsError::InvalidCertificate(cert_err) => classify_certificate_error(cert_err),
        _ => ErrorKind::CertError,
    }
}

fn classify_certificate_error(err: &TlsCertificateError) -> ErrorKind {
    match err {
        TlsCertificateError::Expired | TlsCertificateError::ExpiredContext { .. } => {
            ErrorKind::CertHasExpired
        }
        TlsCertificateError::NotValidYet | TlsCertificateError::NotValidYetContext { .. } => {
            ErrorKind::CertNotYetValid
        }
        TlsCertificateError::NotValidForName
        | TlsCertificateError::NotValidForNameContext { .. } => {
            ErrorKind::ErrTlsCertAltnameInvalid
        }
        TlsCertificateError::InvalidPurpose
        | TlsCertificateError::InvalidPurposeContext { .. } => ErrorKind::InvalidPurpose,
        TlsCertificateError::Revoked => ErrorKind::CertRevoked,
        TlsCertificateError::UnknownIssuer => ErrorKind::UnableToGetIssuerCertLocally,
        TlsCertificateError::BadSignature => ErrorKind::CertSignatureFailure,
        _ => ErrorKind::CertError,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_certificate_errors_map_to_codes() {
        assert_eq!(
            classify_certificate_error(&TlsCertificateError::Expired),
            ErrorKind::CertHasExpired
        );
        assert_eq!(
            classify_certificate_error(&TlsCertificateError::NotValidForName),
            ErrorKind::ErrTlsCertAltnameInvalid
        );
        assert_eq!(
            classify_certificate_error(&TlsCertificateError::UnknownIssuer),
            ErrorKind::UnableToGetIssuerCertLocally
        );
        assert_eq!(
            classify_certificate_error(&TlsCertificateError::BadEncoding),
            ErrorKind::CertError
        );
    }

    #[test]
    fn test_context_variants_map_like_plain_ones() {
        let now = UnixTime::since_unix_epoch(Duration::from_secs(1_700_000_000));
        let earlier = UnixTime::since_unix_epoch(Duration::from_secs(1_600_000_000));

        assert_eq!(
            classify_certificate_error(&TlsCertificateError::ExpiredContext {
                time: now,
                not_after: earlier,
            }),
            ErrorKind::CertHasExpired
        );
        assert_eq!(
            classify_certificate_error(&TlsCertificateError::NotValidYetContext {
                time: earlier,
                not_before: now,
            }),
            ErrorKind::CertNotYetValid
        );
    }

    #[test]
    fn test_plain_io_errors_are_cert_error() {
        let err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let mapped = map_connection_error("localhost", 1, &err);
        assert_eq!(mapped.kind, ErrorKind::CertError);
        assert!(mapped.message.contains("localhost:1"));
    }

    #[test]
    fn test_wrapped_rustls_error_is_classified() {
        let err = io::Error::new(
            io::ErrorKind::InvalidData,
            RustlsError::InvalidCertificate(TlsCertificateError::NotValidYet),
        );
        let mapped = map_connection_error("example.com", 443, &err);
        assert_eq!(mapped.kind, ErrorKind::CertNotYetValid);
    }

    #[tokio::test]
    async fn test_invalid_ports_fail_without_io() {
        for port in [0u32, 65536, 100_000] {
            let settings = FetchSettings {
                port,
                ..Default::default()
            };
            let err = CertificateFetcher::new(settings)
                .fetch("example.invalid")
                .await
                .unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidPort);
        }
    }
}
