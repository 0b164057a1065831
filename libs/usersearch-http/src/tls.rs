//! rustls roots and crypto provider.

use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::CertificateDer;
use std::sync::{Arc, OnceLock};

use crate::error::HttpError;

/// Reading the OS store is slow on some platforms; do it once.
fn native_roots() -> &'static [CertificateDer<'static>] {
    static ROOTS: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();
    ROOTS.get_or_init(|| {
        let loaded = rustls_native_certs::load_native_certs();
        for err in &loaded.errors {
            tracing::warn!(error = %err, "skipping unreadable native root certificate");
        }
        tracing::debug!(count = loaded.certs.len(), "native root certificates loaded");
        loaded.certs
    })
}

/// Process default provider if one is installed, otherwise aws-lc-rs.
pub fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

/// Client config trusting the OS root store.
///
/// # Errors
/// `Tls` when no usable root certificate is found.
pub fn native_roots_client_config() -> Result<ClientConfig, HttpError> {
    let tls_error = |message: String| HttpError::Tls(message.into());

    let mut store = RootCertStore::empty();
    let (added, ignored) = store.add_parsable_certificates(native_roots().iter().cloned());
    if ignored > 0 {
        tracing::warn!(added, ignored, "ignored unparsable native root certificates");
    }
    if added == 0 {
        return Err(tls_error("no usable root certificates in the OS store".to_owned()));
    }

    let config = ClientConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()
        .map_err(|err| tls_error(format!("unsupported protocol versions: {err}")))?
        .with_root_certificates(store)
        .with_no_client_auth();
    Ok(config)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn native_roots_are_loaded_once() {
        assert!(std::ptr::eq(native_roots(), native_roots()));
    }

    #[test]
    fn native_config_either_builds_or_reports_tls() {
        // Minimal containers may have no OS store.
        match native_roots_client_config() {
            Ok(_) | Err(HttpError::Tls(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}
