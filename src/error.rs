//! Error types for fake-secrets
//!
//! All modules use `SecretsResult<T>` as their return type.

use crate::crypto::{Algorithm, Curve};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fake-secrets operations
pub type SecretsResult<T> = Result<T, SecretsError>;

/// All errors that can occur in fake-secrets
#[derive(Error, Debug)]
pub enum SecretsError {
    // Registry errors
    #[error("invalid crypto algorithm {0:?}")]
    InvalidAlgorithm(String),

    #[error("invalid ECDSA curve {0:?}")]
    InvalidCurve(String),

    // Generation errors
    #[error("invalid {parameter}: {reason}")]
    InvalidParameter { parameter: String, reason: String },

    #[error("ECDSA curve {0} is not supported for this operation")]
    UnsupportedCurve(Curve),

    #[error("{algorithm} key generation failed: {reason}")]
    KeyGeneration { algorithm: Algorithm, reason: String },

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("certificate generation failed: {0}")]
    CertificateGeneration(#[from] rcgen::Error),

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("issuer certificate is unusable: {0}")]
    IssuerInvalid(String),

    #[error("generation cache lock poisoned")]
    LockPoisoned,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SecretsError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a key generation error for the given family
    pub fn key_generation(algorithm: Algorithm, reason: impl ToString) -> Self {
        Self::KeyGeneration {
            algorithm,
            reason: reason.to_string(),
        }
    }

    /// Check if error is retryable
    ///
    /// Nothing is cached on failure, so primitive failures may succeed on a
    /// later call. Input and configuration errors never will.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::KeyGeneration { .. } | Self::Signing(_) | Self::CertificateGeneration(_)
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidAlgorithm(_) => Some("Supported algorithms: RSA, ECDSA, ED25519"),
            Self::InvalidCurve(_) => Some("Supported curves: P-224, P-256, P-384, P-521"),
            Self::UnsupportedCurve(Curve::P224) => {
                Some("P-224 keys cannot sign; use P-256, P-384 or P-521")
            }
            Self::ConfigInvalid { .. } => Some("Run: fake-secrets config init --force"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SecretsError::InvalidAlgorithm("DSA".to_string());
        assert_eq!(err.to_string(), "invalid crypto algorithm \"DSA\"");

        let err = SecretsError::invalid_parameter("RSA key length", "must be at least 1024 bits");
        assert_eq!(
            err.to_string(),
            "invalid RSA key length: must be at least 1024 bits"
        );
    }

    #[test]
    fn error_hint() {
        let err = SecretsError::UnsupportedCurve(Curve::P224);
        assert!(err.hint().unwrap().contains("P-224"));
        assert_eq!(SecretsError::LockPoisoned.hint(), None);
    }

    #[test]
    fn error_retryable() {
        assert!(SecretsError::key_generation(Algorithm::Rsa, "entropy").is_retryable());
        assert!(!SecretsError::invalid_parameter("length", "zero").is_retryable());
        assert!(!SecretsError::UnsupportedCurve(Curve::P224).is_retryable());
    }
}
