//! CLI command implementations

pub mod cert;
pub mod config;
pub mod key;

pub use cert::execute as cert;
pub use config::execute as config;
pub use key::execute as key;

use crate::config::{self as settings, Config};
use crate::error::{SecretsError, SecretsResult};
use crate::random::SharedRng;
use crate::service::SecretService;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Build the secret service described by `config`
async fn service(config: &Config) -> SecretsResult<SecretService> {
    let start = Utc::now();
    let rng = SharedRng::resolve(Some(config.random.seed), start);
    info!("Random seed {}", rng.seed());

    match (&config.tls.issuer_cert, &config.tls.issuer_key) {
        (Some(cert_path), Some(key_path)) => {
            let (issuer, key) = settings::load_issuer(cert_path, key_path).await?;
            SecretService::with_issuer(rng, start, &issuer, Arc::new(key))
        }
        (None, None) => Ok(SecretService::new(rng, start)),
        _ => Err(SecretsError::IssuerInvalid(
            "tls.issuer_cert and tls.issuer_key must be set together".to_string(),
        )),
    }
}

/// Run CPU-bound generation off the async runtime
async fn blocking<T, F>(f: F) -> SecretsResult<T>
where
    F: FnOnce() -> SecretsResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SecretsError::Internal(format!("generation task failed: {}", e)))?
}
