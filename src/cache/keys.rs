//! Per-family key caches

use super::store::GenerationStore;
use crate::crypto::{Algorithm, Curve, EcdsaKey, PrivateKey};
use crate::error::{SecretsError, SecretsResult};
use crate::random::SharedRng;
use ed25519_dalek::SigningKey as Ed25519Key;
use rand::rngs::StdRng;
use rsa::RsaPrivateKey;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Smallest RSA modulus the generator accepts, in bits
pub const RSA_MIN_BITS: usize = 1024;

/// Largest RSA modulus the generator accepts, in bits
pub const RSA_MAX_BITS: usize = 16384;

/// Family-specific parameter of a key request (length, curve, or none)
pub trait KeyParameter: Clone + Eq + Hash + fmt::Debug + Send + Sync {
    /// Text appended to the cache key, if any
    fn label(&self) -> Option<String>;
}

impl KeyParameter for usize {
    fn label(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl KeyParameter for Curve {
    fn label(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl KeyParameter for () {
    fn label(&self) -> Option<String> {
        None
    }
}

/// One asymmetric key family and its generation routine
pub trait KeyFamily {
    type Parameter: KeyParameter;

    const ALGORITHM: Algorithm;

    /// Generate a key, drawing all randomness from `rng`
    fn generate(parameter: &Self::Parameter, rng: &mut StdRng) -> SecretsResult<PrivateKey>;
}

/// RSA keys, parameterised by modulus length in bits
#[derive(Debug)]
pub struct RsaFamily;

impl KeyFamily for RsaFamily {
    type Parameter = usize;

    const ALGORITHM: Algorithm = Algorithm::Rsa;

    fn generate(bits: &usize, rng: &mut StdRng) -> SecretsResult<PrivateKey> {
        if !(RSA_MIN_BITS..=RSA_MAX_BITS).contains(bits) {
            return Err(SecretsError::invalid_parameter(
                "RSA key length",
                format!("{bits} bits is outside {RSA_MIN_BITS}..={RSA_MAX_BITS}"),
            ));
        }

        let key = RsaPrivateKey::new(rng, *bits)
            .map_err(|e| SecretsError::key_generation(Algorithm::Rsa, e))?;
        key.validate()
            .map_err(|e| SecretsError::key_generation(Algorithm::Rsa, e))?;

        Ok(key.into())
    }
}

/// ECDSA keys, parameterised by curve
#[derive(Debug)]
pub struct EcdsaFamily;

impl KeyFamily for EcdsaFamily {
    type Parameter = Curve;

    const ALGORITHM: Algorithm = Algorithm::Ecdsa;

    fn generate(curve: &Curve, rng: &mut StdRng) -> SecretsResult<PrivateKey> {
        let expected = curve
            .uncompressed_point_len()
            .ok_or(SecretsError::UnsupportedCurve(*curve))?;

        let key = EcdsaKey::generate(*curve, rng);
        let point = key.public_point();
        if point.len() != expected {
            return Err(SecretsError::key_generation(
                Algorithm::Ecdsa,
                format!(
                    "{} public point is {} bytes, expected {}",
                    curve,
                    point.len(),
                    expected
                ),
            ));
        }

        Ok(key.into())
    }
}

/// Ed25519 keys; the family has no parameter
#[derive(Debug)]
pub struct Ed25519Family;

impl KeyFamily for Ed25519Family {
    type Parameter = ();

    const ALGORITHM: Algorithm = Algorithm::Ed25519;

    fn generate(_: &(), rng: &mut StdRng) -> SecretsResult<PrivateKey> {
        Ok(Ed25519Key::generate(rng).into())
    }
}

/// Identity of a cached key: family, subject and family parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey<P> {
    pub family: Algorithm,
    pub subject: String,
    pub parameter: P,
}

impl<P: KeyParameter> fmt::Display for CacheKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.family.key_prefix(), self.subject)?;
        if let Some(label) = self.parameter.label() {
            write!(f, "-{}", label)?;
        }
        Ok(())
    }
}

/// Lazily populated key cache for one family
pub struct KeyCache<F: KeyFamily> {
    store: GenerationStore<CacheKey<F::Parameter>, Arc<PrivateKey>>,
    rng: SharedRng,
    _family: PhantomData<fn() -> F>,
}

/// RSA key cache, keyed by subject and modulus length
pub type RsaCache = KeyCache<RsaFamily>;

/// ECDSA key cache, keyed by subject and curve
pub type EcdsaCache = KeyCache<EcdsaFamily>;

/// Ed25519 key cache, keyed by subject
pub type Ed25519Cache = KeyCache<Ed25519Family>;

impl<F: KeyFamily> KeyCache<F> {
    pub fn new(rng: SharedRng) -> Self {
        Self {
            store: GenerationStore::new(),
            rng,
            _family: PhantomData,
        }
    }

    /// Return the key for `subject`, generating it on first request.
    ///
    /// Equal arguments always yield the same key for the lifetime of the
    /// cache. Failures are returned as-is and leave nothing behind.
    pub fn load(&self, subject: &str, parameter: F::Parameter) -> SecretsResult<Arc<PrivateKey>> {
        let key = CacheKey {
            family: F::ALGORITHM,
            subject: subject.to_string(),
            parameter,
        };

        self.store.get_or_try_insert_with(key.clone(), || {
            let started = Instant::now();
            let generated = self.rng.with(|rng| F::generate(&key.parameter, rng))??;
            debug!("Generated {} in {:?}", key, started.elapsed());
            Ok(Arc::new(generated))
        })
    }

    /// Number of keys generated so far
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<F: KeyFamily> fmt::Debug for KeyCache<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCache")
            .field("family", &F::ALGORITHM)
            .field("entries", &self.len())
            .finish()
    }
}
