//! Key material, algorithm registry and certificate building blocks

pub mod algorithm;
pub mod curve;
pub mod key;
pub mod pem;
mod signer;
pub mod template;

pub use algorithm::Algorithm;
pub use curve::{Curve, CurveParameters};
pub use key::{EcdsaKey, PrivateKey};
pub(crate) use signer::CertSigner;
pub use template::{
    CertificateTemplate, DistinguishedName, DnAttribute, ExtendedKeyUsage, KeyUsage, KeyUsages,
};
