//! Configuration schema for fake-secrets
//!
//! Configuration is stored at `~/.config/fake-secrets/config.toml`

use crate::crypto::{Algorithm, Curve};
use crate::service::{
    KeyRequest, TlsRequest, DEFAULT_ORGANIZATION, DEFAULT_RSA_BITS, DEFAULT_VALID_FOR_SECS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Randomness source
    pub random: RandomConfig,

    /// Key generation defaults
    pub keys: KeysConfig,

    /// TLS certificate defaults
    pub tls: TlsConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level when no -v flag is given
    pub log_level: String,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: "text".to_string(),
        }
    }
}

/// Randomness settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Generator seed (0 = seed from the start time)
    pub seed: u64,
}

/// Key defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Key family
    pub algorithm: Algorithm,

    /// RSA modulus length in bits
    pub rsa_length: usize,

    /// ECDSA curve
    pub curve: Curve,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            rsa_length: DEFAULT_RSA_BITS,
            curve: Curve::default(),
        }
    }
}

impl KeysConfig {
    /// Key request for `subject` using these defaults
    pub fn request(&self, subject: impl Into<String>) -> KeyRequest {
        KeyRequest::new(subject)
            .with_algorithm(self.algorithm)
            .with_length(self.rsa_length)
            .with_curve(self.curve)
    }
}

/// TLS certificate defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Subject organization
    pub organization: String,

    /// Certificate lifetime in seconds
    pub valid_for_secs: i64,

    /// PEM certificate named as issuer instead of self-signing
    pub issuer_cert: Option<PathBuf>,

    /// PKCS#8 PEM private key of `issuer_cert`, used to sign leaves
    pub issuer_key: Option<PathBuf>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            organization: DEFAULT_ORGANIZATION.to_string(),
            valid_for_secs: DEFAULT_VALID_FOR_SECS,
            issuer_cert: None,
            issuer_key: None,
        }
    }
}

impl TlsConfig {
    /// TLS request for `key` using these defaults
    pub fn request(&self, key: KeyRequest) -> TlsRequest {
        TlsRequest::new(key)
            .with_organization(self.organization.as_str())
            .with_valid_for(self.valid_for_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[keys]"));
        assert!(toml.contains("algorithm = \"RSA\""));
        assert!(toml.contains("curve = \"P-256\""));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.random.seed, 0);
        assert_eq!(config.keys.rsa_length, 4096);
        assert_eq!(config.tls.organization, "Acme Co");
        assert!(config.tls.issuer_cert.is_none());
        assert!(config.tls.issuer_key.is_none());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [keys]
            algorithm = "ed25519"
            curve = "secp384r1"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.keys.algorithm, Algorithm::Ed25519);
        assert_eq!(config.keys.curve, Curve::P384);
        assert_eq!(config.keys.rsa_length, 4096); // default preserved
    }

    #[test]
    fn config_rejects_unknown_algorithm() {
        let toml = r#"
            [keys]
            algorithm = "dsa"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn requests_carry_defaults() {
        let config: Config = toml::from_str(
            r#"
            [keys]
            algorithm = "ECDSA"
            curve = "P-521"

            [tls]
            organization = "Test Org"
            valid_for_secs = 3600
        "#,
        )
        .unwrap();

        let key = config.keys.request("example.com");
        assert_eq!(key.algorithm, Algorithm::Ecdsa);
        assert_eq!(key.curve, Curve::P521);

        let tls = config.tls.request(key);
        assert_eq!(tls.organization, "Test Org");
        assert_eq!(tls.valid_for, 3600);
        assert_eq!(tls.valid_at, None);
    }
}
