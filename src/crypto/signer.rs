//! Bridges `PrivateKey` into rcgen's signing traits

use super::PrivateKey;
use crate::error::{SecretsError, SecretsResult};
use rcgen::{PublicKeyData, SignatureAlgorithm, SigningKey};
use std::sync::Arc;
use tracing::warn;

/// A private key as seen by the certificate builder
#[derive(Clone)]
pub(crate) struct CertSigner {
    key: Arc<PrivateKey>,
    public: Vec<u8>,
    algorithm: &'static SignatureAlgorithm,
}

impl CertSigner {
    /// Pick the X.509 signature algorithm for `key`.
    ///
    /// Fails with `UnsupportedCurve` for ECDSA curves that have no signer.
    pub(crate) fn new(key: Arc<PrivateKey>) -> SecretsResult<Self> {
        let algorithm = match key.as_ref() {
            PrivateKey::Rsa(_) => &rcgen::PKCS_RSA_SHA256,
            PrivateKey::Ecdsa(k) => k
                .curve()
                .signature_algorithm()
                .ok_or(SecretsError::UnsupportedCurve(k.curve()))?,
            PrivateKey::Ed25519(_) => &rcgen::PKCS_ED25519,
        };
        let public = key.subject_public_key()?;

        Ok(Self {
            key,
            public,
            algorithm,
        })
    }
}

impl PublicKeyData for CertSigner {
    fn der_bytes(&self) -> &[u8] {
        &self.public
    }

    fn algorithm(&self) -> &'static SignatureAlgorithm {
        self.algorithm
    }
}

impl SigningKey for CertSigner {
    fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, rcgen::Error> {
        self.key.sign(msg).map_err(|e| {
            warn!("certificate signing failed: {}", e);
            rcgen::Error::RemoteKeyError
        })
    }
}
