//! Generation caches for synthetic credentials
//!
//! Every credential is generated on first request and then served from
//! memory for the lifetime of the cache. Nothing is evicted or persisted.
//!
//! # Cache Keys
//!
//! | Cache | Keyed by | Value |
//! |-------|----------|-------|
//! | `RsaCache` | subject, modulus length | `Arc<PrivateKey>` |
//! | `EcdsaCache` | subject, curve | `Arc<PrivateKey>` |
//! | `Ed25519Cache` | subject | `Arc<PrivateKey>` |
//! | `CertCache` | template fingerprint | `Arc<[u8]>` (DER) |
//!
//! # Concurrency
//!
//! Hits take a shared lock only. Misses take the exclusive lock and check
//! again before generating, so generation runs at most once per key even
//! when many cold callers race. Failures are returned and never stored.

pub mod cert;
pub mod fingerprint;
pub mod keys;
pub mod store;

pub use cert::CertCache;
pub use fingerprint::Fingerprinter;
pub use keys::{
    CacheKey, EcdsaCache, EcdsaFamily, Ed25519Cache, Ed25519Family, KeyCache, KeyFamily,
    KeyParameter, RsaCache, RsaFamily, RSA_MAX_BITS, RSA_MIN_BITS,
};
pub use store::GenerationStore;
