//! Certificate cache keyed by template and key fingerprint

use super::fingerprint::Fingerprinter;
use super::store::GenerationStore;
use crate::crypto::{CertSigner, CertificateTemplate, PrivateKey};
use crate::error::{SecretsError, SecretsResult};
use crate::random::SharedRng;
use rand::Rng;
use rcgen::{CertificateParams, Issuer, SerialNumber};
use rustls_pki_types::CertificateDer;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use x509_parser::prelude::{FromDer, X509Certificate};

/// Lazily populated certificate cache.
///
/// Requests with a structurally identical template and the same public key
/// share one DER encoding, serial number included. Certificates are
/// self-signed unless the cache was built with a fixed issuer.
pub struct CertCache {
    store: GenerationStore<u64, Arc<[u8]>>,
    fingerprinter: Fingerprinter,
    rng: SharedRng,
    issuer: Option<Issuer<'static, CertSigner>>,
}

impl CertCache {
    /// Cache that self-signs every certificate
    pub fn new(rng: SharedRng) -> Self {
        Self {
            store: GenerationStore::new(),
            fingerprinter: Fingerprinter::new(),
            rng,
            issuer: None,
        }
    }

    /// Cache that signs every certificate with `issuer_key` under the
    /// issuer certificate `issuer_der`.
    ///
    /// `issuer_key` must be the private half of the key certified by
    /// `issuer_der`, otherwise issued chains would not verify.
    pub fn with_issuer(
        rng: SharedRng,
        issuer_der: &[u8],
        issuer_key: Arc<PrivateKey>,
    ) -> SecretsResult<Self> {
        let (_, parsed) = X509Certificate::from_der(issuer_der)
            .map_err(|e| SecretsError::IssuerInvalid(e.to_string()))?;
        if parsed.public_key().raw != issuer_key.public_key_der()?.as_slice() {
            return Err(SecretsError::IssuerInvalid(
                "issuer key does not match the issuer certificate".to_string(),
            ));
        }

        let der = CertificateDer::from(issuer_der.to_vec());
        let issuer = Issuer::from_ca_cert_der(&der, CertSigner::new(issuer_key)?)
            .map_err(|e| SecretsError::IssuerInvalid(e.to_string()))?;

        Ok(Self {
            issuer: Some(issuer),
            ..Self::new(rng)
        })
    }

    pub fn is_self_signing(&self) -> bool {
        self.issuer.is_none()
    }

    /// Return the DER certificate binding `key` to `template`, issuing it on
    /// first request.
    ///
    /// Inputs are checked before a serial is drawn, so a rejected request
    /// leaves the randomness stream untouched.
    pub fn load(
        &self,
        template: &CertificateTemplate,
        key: &Arc<PrivateKey>,
    ) -> SecretsResult<Arc<[u8]>> {
        let public_key = key.public_key_der()?;
        let fingerprint = self.fingerprinter.fingerprint(template, &public_key);

        self.store.get_or_try_insert_with(fingerprint, || {
            let subject = CertSigner::new(Arc::clone(key))?;
            let mut params = template.to_params()?;

            let serial: u128 = self.rng.with(|rng| rng.gen())?;
            params.serial_number = Some(SerialNumber::from_slice(&serial.to_be_bytes()));

            let der = self.issue(params, &subject)?;
            debug!(
                "Issued certificate {:016x} for {} (serial {:x})",
                fingerprint, template.subject, serial
            );
            Ok(Arc::from(der))
        })
    }

    fn issue(&self, params: CertificateParams, subject: &CertSigner) -> SecretsResult<Vec<u8>> {
        let cert = match &self.issuer {
            Some(issuer) => params.signed_by(subject, issuer)?,
            None => params.self_signed(subject)?,
        };

        Ok(cert.der().to_vec())
    }

    /// Number of certificates issued so far
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl fmt::Debug for CertCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertCache")
            .field("entries", &self.len())
            .field("self_signing", &self.is_self_signing())
            .finish()
    }
}
