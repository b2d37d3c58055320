//! Asymmetric key families

use crate::error::{SecretsError, SecretsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asymmetric algorithm family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    /// RSA with a caller-chosen modulus length
    #[default]
    Rsa,
    /// ECDSA over one of the NIST prime curves
    Ecdsa,
    /// EdDSA over Curve25519
    Ed25519,
}

impl Algorithm {
    /// Parse an algorithm name, case-insensitively.
    ///
    /// Empty input selects the default (RSA). Both `EDDSA` and `ED25519`
    /// name the Ed25519 family.
    pub fn parse(text: &str) -> SecretsResult<Self> {
        if text.is_empty() {
            return Ok(Self::default());
        }

        match text.to_ascii_uppercase().as_str() {
            "RSA" => Ok(Self::Rsa),
            "ECDSA" => Ok(Self::Ecdsa),
            "EDDSA" | "ED25519" => Ok(Self::Ed25519),
            _ => Err(SecretsError::InvalidAlgorithm(text.to_string())),
        }
    }

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Ecdsa => "ECDSA",
            Self::Ed25519 => "ED25519",
        }
    }

    /// Lower-case prefix used in cache keys
    pub(crate) fn key_prefix(&self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Ecdsa => "ecdsa",
            Self::Ed25519 => "ed25519",
        }
    }

    /// All families in declaration order
    pub fn all() -> &'static [Self] {
        &[Self::Rsa, Self::Ecdsa, Self::Ed25519]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SecretsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Algorithm {
    type Error = SecretsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.as_str().to_string()
    }
}
