//! Secret service: request descriptors resolved through the caches
//!
//! One service owns a key cache per family, a certificate cache and the
//! randomness source they share. Callers describe what they want with a
//! [`KeyRequest`] or [`TlsRequest`] and get cached material back.

use crate::cache::{CertCache, EcdsaCache, Ed25519Cache, RsaCache};
use crate::crypto::{
    pem, Algorithm, CertificateTemplate, Curve, DistinguishedName, DnAttribute,
    ExtendedKeyUsage, KeyUsage, PrivateKey,
};
use crate::error::{SecretsError, SecretsResult};
use crate::random::SharedRng;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Default RSA modulus length in bits
pub const DEFAULT_RSA_BITS: usize = 4096;

/// Default certificate subject organization
pub const DEFAULT_ORGANIZATION: &str = "Acme Co";

/// Default certificate lifetime: 90 days
pub const DEFAULT_VALID_FOR_SECS: i64 = 60 * 60 * 24 * 90;

/// Description of a private key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRequest {
    pub subject: String,
    pub algorithm: Algorithm,
    /// RSA modulus length; ignored by other families
    pub length: usize,
    /// ECDSA curve; ignored by other families
    pub curve: Curve,
}

impl KeyRequest {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            algorithm: Algorithm::default(),
            length: DEFAULT_RSA_BITS,
            curve: Curve::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }
}

/// Description of a TLS server certificate and its key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsRequest {
    pub key: KeyRequest,
    pub organization: String,
    /// Start of validity as a Unix timestamp; the service start time if unset
    pub valid_at: Option<i64>,
    /// Validity length in seconds
    pub valid_for: i64,
}

impl TlsRequest {
    pub fn new(key: KeyRequest) -> Self {
        Self {
            key,
            organization: DEFAULT_ORGANIZATION.to_string(),
            valid_at: None,
            valid_for: DEFAULT_VALID_FOR_SECS,
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = organization.into();
        self
    }

    pub fn with_valid_at(mut self, valid_at: i64) -> Self {
        self.valid_at = Some(valid_at);
        self
    }

    pub fn with_valid_for(mut self, valid_for: i64) -> Self {
        self.valid_for = valid_for;
        self
    }
}

/// A certificate together with the key it was issued for
#[derive(Debug, Clone)]
pub struct IssuedCertificate {
    pub key: Arc<PrivateKey>,
    pub der: Arc<[u8]>,
}

impl IssuedCertificate {
    pub fn certificate_pem(&self) -> SecretsResult<String> {
        pem::certificate(&self.der)
    }

    pub fn key_pem(&self) -> SecretsResult<String> {
        self.key.to_pkcs8_pem()
    }
}

/// Caches and randomness behind every generated secret
#[derive(Debug)]
pub struct SecretService {
    rsa: RsaCache,
    ecdsa: EcdsaCache,
    ed25519: Ed25519Cache,
    cert: CertCache,
    rng: SharedRng,
    start: DateTime<Utc>,
}

impl SecretService {
    /// Service whose certificates are self-signed
    pub fn new(rng: SharedRng, start: DateTime<Utc>) -> Self {
        let cert = CertCache::new(rng.clone());
        Self::with_cert_cache(rng, start, cert)
    }

    /// Service whose certificates are signed by `issuer_key` under the
    /// issuer certificate `issuer_der`
    pub fn with_issuer(
        rng: SharedRng,
        start: DateTime<Utc>,
        issuer_der: &[u8],
        issuer_key: Arc<PrivateKey>,
    ) -> SecretsResult<Self> {
        let cert = CertCache::with_issuer(rng.clone(), issuer_der, issuer_key)?;
        Ok(Self::with_cert_cache(rng, start, cert))
    }

    fn with_cert_cache(rng: SharedRng, start: DateTime<Utc>, cert: CertCache) -> Self {
        Self {
            rsa: RsaCache::new(rng.clone()),
            ecdsa: EcdsaCache::new(rng.clone()),
            ed25519: Ed25519Cache::new(rng.clone()),
            cert,
            rng,
            start,
        }
    }

    pub fn rsa_cache(&self) -> &RsaCache {
        &self.rsa
    }

    pub fn ecdsa_cache(&self) -> &EcdsaCache {
        &self.ecdsa
    }

    pub fn ed25519_cache(&self) -> &Ed25519Cache {
        &self.ed25519
    }

    pub fn cert_cache(&self) -> &CertCache {
        &self.cert
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Load the key described by `request` from its family cache
    pub fn load_key(&self, request: &KeyRequest) -> SecretsResult<Arc<PrivateKey>> {
        debug!(
            "Loading {} key for {}",
            request.algorithm, request.subject
        );

        match request.algorithm {
            Algorithm::Rsa => self.rsa.load(&request.subject, request.length),
            Algorithm::Ecdsa => self.ecdsa.load(&request.subject, request.curve),
            Algorithm::Ed25519 => self.ed25519.load(&request.subject, ()),
        }
    }

    /// Derive the server certificate template for `request`.
    ///
    /// The subject is `O=<organization>` and the requested subject becomes
    /// the only SAN, as an IP address when it parses as one.
    pub fn tls_template(&self, request: &TlsRequest) -> SecretsResult<CertificateTemplate> {
        let valid_at = request.valid_at.unwrap_or_else(|| self.start.timestamp());
        let valid_until = valid_at
            .checked_add(request.valid_for)
            .ok_or_else(|| SecretsError::invalid_parameter("valid_for", "validity overflows"))?;

        let not_before = timestamp("valid_at", valid_at)?;
        let not_after = timestamp("valid_for", valid_until)?;

        let key_usage = match request.key.algorithm {
            Algorithm::Rsa => KeyUsage::DigitalSignature | KeyUsage::KeyEncipherment,
            _ => KeyUsage::DigitalSignature.into(),
        };

        let subject =
            DistinguishedName::new().with(DnAttribute::Organization, request.organization.as_str());

        Ok(CertificateTemplate::new(subject, not_before, not_after)
            .with_key_usage(key_usage)
            .with_extended_key_usage(ExtendedKeyUsage::ServerAuth)
            .with_host(&request.key.subject))
    }

    /// Issue (or fetch) the server certificate described by `request`
    pub fn tls_certificate(&self, request: &TlsRequest) -> SecretsResult<IssuedCertificate> {
        let template = self.tls_template(request)?;
        let key = self.load_key(&request.key)?;
        let der = self.cert.load(&template, &key)?;

        Ok(IssuedCertificate { key, der })
    }
}

fn timestamp(parameter: &str, secs: i64) -> SecretsResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        SecretsError::invalid_parameter(parameter, format!("{secs} is not a representable time"))
    })
}
