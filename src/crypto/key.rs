//! Private key material for the supported families

use super::{Algorithm, Curve};
use crate::error::{SecretsError, SecretsResult};
use ed25519_dalek::SigningKey as Ed25519Key;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pkcs8::{DecodePrivateKey, EncodePrivateKey, EncodePublicKey, PrivateKeyInfo};
use rand::rngs::StdRng;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use sha2::{Digest, Sha256};
use std::fmt;

const RSA_ENCRYPTION_OID: &str = "1.2.840.113549.1.1.1";
const EC_PUBLIC_KEY_OID: &str = "1.2.840.10045.2.1";
const ED25519_OID: &str = "1.3.101.112";

/// ECDSA secret key, tagged with its curve
#[derive(Clone)]
pub enum EcdsaKey {
    P224(p224::SecretKey),
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

impl EcdsaKey {
    /// Draw a fresh secret scalar for `curve`
    pub fn generate(curve: Curve, rng: &mut StdRng) -> Self {
        match curve {
            Curve::P224 => Self::P224(p224::SecretKey::random(rng)),
            Curve::P256 => Self::P256(p256::SecretKey::random(rng)),
            Curve::P384 => Self::P384(p384::SecretKey::random(rng)),
            Curve::P521 => Self::P521(p521::SecretKey::random(rng)),
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            Self::P224(_) => Curve::P224,
            Self::P256(_) => Curve::P256,
            Self::P384(_) => Curve::P384,
            Self::P521(_) => Curve::P521,
        }
    }

    /// Uncompressed SEC1 encoding of the public point
    pub fn public_point(&self) -> Vec<u8> {
        match self {
            Self::P224(k) => k.public_key().to_encoded_point(false).as_bytes().to_vec(),
            Self::P256(k) => k.public_key().to_encoded_point(false).as_bytes().to_vec(),
            Self::P384(k) => k.public_key().to_encoded_point(false).as_bytes().to_vec(),
            Self::P521(k) => k.public_key().to_encoded_point(false).as_bytes().to_vec(),
        }
    }

    /// DER-encoded ECDSA signature with the curve's matching digest.
    ///
    /// Nonces are derived per RFC 6979, so equal input yields equal output.
    fn sign(&self, msg: &[u8]) -> SecretsResult<Vec<u8>> {
        let der = match self {
            Self::P224(_) => return Err(SecretsError::UnsupportedCurve(Curve::P224)),
            Self::P256(k) => {
                let signer = p256::ecdsa::SigningKey::from(k.clone());
                let signature: p256::ecdsa::Signature = signer.try_sign(msg).map_err(signing)?;
                signature.to_der().as_bytes().to_vec()
            }
            Self::P384(k) => {
                let signer = p384::ecdsa::SigningKey::from(k.clone());
                let signature: p384::ecdsa::Signature = signer.try_sign(msg).map_err(signing)?;
                signature.to_der().as_bytes().to_vec()
            }
            Self::P521(k) => {
                let signer = p521::ecdsa::SigningKey::from_bytes(&k.to_bytes()).map_err(signing)?;
                let signature: p521::ecdsa::Signature = signer.try_sign(msg).map_err(signing)?;
                signature.to_der().as_bytes().to_vec()
            }
        };
        Ok(der)
    }

    fn from_pkcs8_der(curve: Curve, der: &[u8]) -> pkcs8::Result<Self> {
        Ok(match curve {
            Curve::P224 => Self::P224(p224::SecretKey::from_pkcs8_der(der)?),
            Curve::P256 => Self::P256(p256::SecretKey::from_pkcs8_der(der)?),
            Curve::P384 => Self::P384(p384::SecretKey::from_pkcs8_der(der)?),
            Curve::P521 => Self::P521(p521::SecretKey::from_pkcs8_der(der)?),
        })
    }

    fn to_pkcs8_der(&self) -> pkcs8::Result<pkcs8::SecretDocument> {
        match self {
            Self::P224(k) => k.to_pkcs8_der(),
            Self::P256(k) => k.to_pkcs8_der(),
            Self::P384(k) => k.to_pkcs8_der(),
            Self::P521(k) => k.to_pkcs8_der(),
        }
    }

    fn to_public_key_der(&self) -> pkcs8::spki::Result<pkcs8::Document> {
        match self {
            Self::P224(k) => k.public_key().to_public_key_der(),
            Self::P256(k) => k.public_key().to_public_key_der(),
            Self::P384(k) => k.public_key().to_public_key_der(),
            Self::P521(k) => k.public_key().to_public_key_der(),
        }
    }
}

/// A generated private key of one of the supported families
#[derive(Clone)]
pub enum PrivateKey {
    Rsa(RsaPrivateKey),
    Ecdsa(EcdsaKey),
    Ed25519(Ed25519Key),
}

impl PrivateKey {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Rsa(_) => Algorithm::Rsa,
            Self::Ecdsa(_) => Algorithm::Ecdsa,
            Self::Ed25519(_) => Algorithm::Ed25519,
        }
    }

    /// Curve of an ECDSA key, `None` for the other families
    pub fn curve(&self) -> Option<Curve> {
        match self {
            Self::Ecdsa(k) => Some(k.curve()),
            _ => None,
        }
    }

    pub fn as_rsa(&self) -> Option<&RsaPrivateKey> {
        match self {
            Self::Rsa(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_ecdsa(&self) -> Option<&EcdsaKey> {
        match self {
            Self::Ecdsa(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_ed25519(&self) -> Option<&Ed25519Key> {
        match self {
            Self::Ed25519(k) => Some(k),
            _ => None,
        }
    }

    /// Decode a PKCS#8 `PrivateKeyInfo`, dispatching on its algorithm OID
    pub fn from_pkcs8_der(der: &[u8]) -> SecretsResult<Self> {
        let info = PrivateKeyInfo::try_from(der).map_err(encoding)?;
        let algorithm = info.algorithm.oid.to_string();

        match algorithm.as_str() {
            RSA_ENCRYPTION_OID => Ok(RsaPrivateKey::from_pkcs8_der(der)
                .map_err(encoding)?
                .into()),
            EC_PUBLIC_KEY_OID => {
                let named = info.algorithm.parameters_oid().map_err(encoding)?.to_string();
                let curve = Curve::from_oid(&named).ok_or_else(|| {
                    SecretsError::Encoding(format!("unknown named curve {named}"))
                })?;
                Ok(EcdsaKey::from_pkcs8_der(curve, der)
                    .map_err(encoding)?
                    .into())
            }
            ED25519_OID => Ok(Ed25519Key::from_pkcs8_der(der).map_err(encoding)?.into()),
            other => Err(SecretsError::Encoding(format!(
                "unsupported private key algorithm {other}"
            ))),
        }
    }

    /// Decode a PKCS#8 `PRIVATE KEY` PEM block
    pub fn from_pkcs8_pem(text: &str) -> SecretsResult<Self> {
        let der = super::pem::decode("PRIVATE KEY", text)?;
        Self::from_pkcs8_der(&der)
    }

    /// PKCS#8 `PrivateKeyInfo` DER
    pub fn to_pkcs8_der(&self) -> SecretsResult<Vec<u8>> {
        let document = match self {
            Self::Rsa(k) => k.to_pkcs8_der(),
            Self::Ecdsa(k) => k.to_pkcs8_der(),
            Self::Ed25519(k) => k.to_pkcs8_der(),
        }
        .map_err(encoding)?;
        Ok(document.as_bytes().to_vec())
    }

    /// PKCS#8 PEM with a `PRIVATE KEY` label
    pub fn to_pkcs8_pem(&self) -> SecretsResult<String> {
        let der = self.to_pkcs8_der()?;
        super::pem::encode("PRIVATE KEY", &der)
    }

    /// `SubjectPublicKeyInfo` DER of the matching public key
    pub fn public_key_der(&self) -> SecretsResult<Vec<u8>> {
        let document = match self {
            Self::Rsa(k) => k.to_public_key().to_public_key_der(),
            Self::Ecdsa(k) => k.to_public_key_der(),
            Self::Ed25519(k) => k.verifying_key().to_public_key_der(),
        }
        .map_err(encoding)?;
        Ok(document.as_bytes().to_vec())
    }

    /// Hex SHA-256 over the public key info, for logs and display
    pub fn fingerprint(&self) -> SecretsResult<String> {
        let spki = self.public_key_der()?;
        Ok(hex::encode(Sha256::digest(&spki)))
    }

    /// Public key bytes as carried in a certificate's `subjectPublicKey`
    pub(crate) fn subject_public_key(&self) -> SecretsResult<Vec<u8>> {
        match self {
            Self::Rsa(k) => Ok(k
                .to_public_key()
                .to_pkcs1_der()
                .map_err(encoding)?
                .as_bytes()
                .to_vec()),
            Self::Ecdsa(k) => Ok(k.public_point()),
            Self::Ed25519(k) => Ok(k.verifying_key().to_bytes().to_vec()),
        }
    }

    /// Deterministic signature over `msg` in X.509 encoding
    pub(crate) fn sign(&self, msg: &[u8]) -> SecretsResult<Vec<u8>> {
        match self {
            Self::Rsa(k) => {
                let signer = rsa::pkcs1v15::SigningKey::<Sha256>::new(k.clone());
                let signature = signer.try_sign(msg).map_err(signing)?;
                Ok(signature.to_vec())
            }
            Self::Ecdsa(k) => k.sign(msg),
            Self::Ed25519(k) => {
                let signature = k.try_sign(msg).map_err(signing)?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsa(k) => write!(f, "PrivateKey::Rsa({} bits)", k.size() * 8),
            Self::Ecdsa(k) => write!(f, "PrivateKey::Ecdsa({})", k.curve()),
            Self::Ed25519(_) => f.write_str("PrivateKey::Ed25519"),
        }
    }
}

impl From<RsaPrivateKey> for PrivateKey {
    fn from(value: RsaPrivateKey) -> Self {
        Self::Rsa(value)
    }
}

impl From<EcdsaKey> for PrivateKey {
    fn from(value: EcdsaKey) -> Self {
        Self::Ecdsa(value)
    }
}

impl From<Ed25519Key> for PrivateKey {
    fn from(value: Ed25519Key) -> Self {
        Self::Ed25519(value)
    }
}

fn encoding(e: impl fmt::Display) -> SecretsError {
    SecretsError::Encoding(e.to_string())
}

fn signing(e: impl fmt::Display) -> SecretsError {
    SecretsError::Signing(e.to_string())
}
