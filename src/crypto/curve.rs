//! ECDSA curve selection

use crate::error::{SecretsError, SecretsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// NIST prime curve used for ECDSA keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Curve {
    P224,
    #[default]
    P256,
    P384,
    P521,
}

/// Domain parameters of a named curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParameters {
    /// Canonical curve name
    pub name: &'static str,
    /// Size of the underlying prime field in bits
    pub field_bits: usize,
    /// Named-curve object identifier (dotted form)
    pub oid: &'static str,
}

impl Curve {
    /// Parse a curve name, case-insensitively.
    ///
    /// Empty input selects P-256. Each curve is accepted in its `P256`,
    /// `P-256` and `SECP256R1` spellings.
    pub fn parse(text: &str) -> SecretsResult<Self> {
        if text.is_empty() {
            return Ok(Self::default());
        }

        match text.to_ascii_uppercase().as_str() {
            "P224" | "P-224" | "SECP224R1" => Ok(Self::P224),
            "P256" | "P-256" | "SECP256R1" => Ok(Self::P256),
            "P384" | "P-384" | "SECP384R1" => Ok(Self::P384),
            "P521" | "P-521" | "SECP521R1" => Ok(Self::P521),
            _ => Err(SecretsError::InvalidCurve(text.to_string())),
        }
    }

    /// Canonical curve name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P224 => "P-224",
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }

    /// Domain parameters for key generation
    pub fn parameters(&self) -> Option<CurveParameters> {
        let (field_bits, oid) = match self {
            Self::P224 => (224, "1.3.132.0.33"),
            Self::P256 => (256, "1.2.840.10045.3.1.7"),
            Self::P384 => (384, "1.3.132.0.34"),
            Self::P521 => (521, "1.3.132.0.35"),
        };

        Some(CurveParameters {
            name: self.as_str(),
            field_bits,
            oid,
        })
    }

    /// Curve whose named-curve OID is `oid` (dotted form)
    pub fn from_oid(oid: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|curve| curve.parameters().is_some_and(|p| p.oid == oid))
    }

    /// Length of an uncompressed SEC1 public point on this curve
    pub fn uncompressed_point_len(&self) -> Option<usize> {
        self.parameters()
            .map(|p| 1 + 2 * p.field_bits.div_ceil(8))
    }

    /// X.509 signature algorithm for certificates signed with this curve.
    ///
    /// There is no SHA-224 based signer, so P-224 keys can be generated but
    /// never sign.
    pub fn signature_algorithm(&self) -> Option<&'static rcgen::SignatureAlgorithm> {
        match self {
            Self::P224 => None,
            Self::P256 => Some(&rcgen::PKCS_ECDSA_P256_SHA256),
            Self::P384 => Some(&rcgen::PKCS_ECDSA_P384_SHA384),
            Self::P521 => Some(&rcgen::PKCS_ECDSA_P521_SHA512),
        }
    }

    /// JWS `alg` value for tokens signed with this curve
    pub fn jws_algorithm(&self) -> Option<&'static str> {
        match self {
            Self::P224 => None,
            Self::P256 => Some("ES256"),
            Self::P384 => Some("ES384"),
            Self::P521 => Some("ES512"),
        }
    }

    /// All curves, smallest first
    pub fn all() -> &'static [Self] {
        &[Self::P224, Self::P256, Self::P384, Self::P521]
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Curve {
    type Err = SecretsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Curve {
    type Error = SecretsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Curve> for String {
    fn from(value: Curve) -> Self {
        value.as_str().to_string()
    }
}
