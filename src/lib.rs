//! fake-secrets - Synthetic keys and certificates
//!
//! Deterministic, concurrency-safe generation caches for development and
//! test credentials: RSA, ECDSA and Ed25519 keys plus X.509 certificates.

pub mod cache;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod random;
pub mod service;

pub use error::{SecretsError, SecretsResult};
pub use random::SharedRng;
pub use service::{KeyRequest, SecretService, TlsRequest};
