//! Certificate template fingerprints

use crate::crypto::CertificateTemplate;
use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};
use std::net::IpAddr;

/// Keyed 64-bit hash over a certificate template and the key it certifies.
///
/// Keys are drawn at construction, so values differ between instances and
/// between process runs. Not collision resistant against an adversary.
#[derive(Debug, Clone, Default)]
pub struct Fingerprinter {
    state: RandomState,
}

impl Fingerprinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fingerprint of everything in `template` except the serial number,
    /// bound to the DER SubjectPublicKeyInfo of the certified key.
    ///
    /// Strings hash with a terminator and lists with a length prefix, so
    /// shifting bytes between fields or list elements changes the result.
    pub fn fingerprint(&self, template: &CertificateTemplate, public_key: &[u8]) -> u64 {
        let mut h = self.state.build_hasher();

        h.write_usize(public_key.len());
        h.write(public_key);

        template.subject.to_string().hash(&mut h);
        template.not_before.to_rfc3339().hash(&mut h);
        template.not_after.to_rfc3339().hash(&mut h);
        template.key_usage.bits().hash(&mut h);

        h.write_usize(template.extended_key_usage.len());
        for usage in &template.extended_key_usage {
            usage.as_str().hash(&mut h);
        }

        template.dns_names.hash(&mut h);
        template.email_addresses.hash(&mut h);

        h.write_usize(template.ip_addresses.len());
        for ip in &template.ip_addresses {
            octets(ip).hash(&mut h);
        }

        template.uris.hash(&mut h);

        h.finish()
    }
}

fn octets(ip: &IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}
