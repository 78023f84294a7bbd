use std::sync::{Arc, OnceLock};

use rustls::{ClientConfig, KeyLogFile, RootCertStore};

static TLS_CONFIG: OnceLock<Arc<ClientConfig>> = OnceLock::new();

/// Process-wide TLS client configuration, built lazily once and shared by
/// the HTTP and WebSocket stacks.
///
/// Key logging goes to `SSLKEYLOGFILE` when that variable is set, which
/// makes proxied captures decryptable offline.
pub fn client_config() -> Arc<ClientConfig> {
    TLS_CONFIG
        .get_or_init(|| {
            let _ = rustls::crypto::CryptoProvider::install_default(
                rustls::crypto::ring::default_provider(),
            );
            let mut roots = RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            let mut config = ClientConfig::builder()
                .with_root_certificates(roots)
                .with_no_client_auth();
            config.key_log = Arc::new(KeyLogFile::new());
            Arc::new(config)
        })
        .clone()
}
