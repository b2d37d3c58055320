//! Configuration management for fake-secrets

pub mod schema;

pub use schema::Config;

use crate::crypto::{pem, PrivateKey};
use crate::error::{SecretsError, SecretsResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fake-secrets")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> SecretsResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> SecretsResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SecretsError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| SecretsError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> SecretsResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            SecretsError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> SecretsResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SecretsError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the PEM issuer certificate at `cert_path` and its PKCS#8 PEM
/// private key at `key_path`
pub async fn load_issuer(
    cert_path: &Path,
    key_path: &Path,
) -> SecretsResult<(Vec<u8>, PrivateKey)> {
    let cert = read_issuer_file(cert_path).await?;
    let der = pem::decode("CERTIFICATE", &cert)
        .map_err(|e| SecretsError::IssuerInvalid(format!("{}: {}", cert_path.display(), e)))?;

    let key = read_issuer_file(key_path).await?;
    let key = PrivateKey::from_pkcs8_pem(&key)
        .map_err(|e| SecretsError::IssuerInvalid(format!("{}: {}", key_path.display(), e)))?;

    debug!("Loaded issuer {} with {} key", cert_path.display(), key.algorithm());
    Ok((der, key))
}

async fn read_issuer_file(path: &Path) -> SecretsResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| SecretsError::io(format!("reading issuer from {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EcdsaCache;
    use crate::crypto::{Algorithm, Curve};
    use crate::random::SharedRng;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.tls.organization, "Acme Co");
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.random.seed = 1234;
        config.keys.algorithm = Algorithm::Ed25519;

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.random.seed, 1234);
        assert_eq!(loaded.keys.algorithm, Algorithm::Ed25519);
    }

    #[tokio::test]
    async fn invalid_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[random]\nseed = \"abc\"\n").unwrap();

        let err = ConfigManager::with_path(path).load().await.unwrap_err();
        assert!(matches!(err, SecretsError::ConfigInvalid { .. }));
        assert!(err.hint().is_some());
    }

    #[tokio::test]
    async fn issuer_must_be_a_certificate_and_key() {
        let temp = TempDir::new().unwrap();
        let cert_path = temp.path().join("issuer.pem");
        let key_path = temp.path().join("issuer.key");

        let rng = SharedRng::from_seed(3);
        let key = EcdsaCache::new(rng).load("issuer.example", Curve::P256).unwrap();
        let key_pem = key.to_pkcs8_pem().unwrap();
        std::fs::write(&key_path, &key_pem).unwrap();

        std::fs::write(&cert_path, pem::encode("PRIVATE KEY", &[1, 2, 3]).unwrap()).unwrap();
        let err = load_issuer(&cert_path, &key_path).await.unwrap_err();
        assert!(matches!(err, SecretsError::IssuerInvalid(_)));

        std::fs::write(&cert_path, pem::encode("CERTIFICATE", &[1, 2, 3]).unwrap()).unwrap();
        let (der, loaded) = load_issuer(&cert_path, &key_path).await.unwrap();
        assert_eq!(der, vec![1, 2, 3]);
        assert_eq!(loaded.to_pkcs8_der().unwrap(), key.to_pkcs8_der().unwrap());

        std::fs::write(&key_path, pem::encode("CERTIFICATE", &[1, 2, 3]).unwrap()).unwrap();
        let err = load_issuer(&cert_path, &key_path).await.unwrap_err();
        assert!(matches!(err, SecretsError::IssuerInvalid(_)));

        let missing = load_issuer(&temp.path().join("missing.pem"), &key_path)
            .await
            .unwrap_err();
        assert!(matches!(missing, SecretsError::Io { .. }));
    }
}
