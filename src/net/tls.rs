//! TLS configuration and certificate loading.

use std::path::Path;
use axum_server::tls_rustls::RustlsConfig;

use crate::config::schema::TlsConfig;

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, std::io::Error> {
    for (kind, path) in [("Certificate", cert_path), ("Private key", key_path)] {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} file not found: {:?}", kind, path),
            ));
        }
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

/// Load the listener's TLS settings.
pub async fn load_listener_tls(tls: &TlsConfig) -> Result<RustlsConfig, std::io::Error> {
    load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await
}
