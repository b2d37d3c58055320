//! Certificate templates
//!
//! A template carries every field that determines certificate content
//! except the serial number, which the certificate cache assigns.

use crate::error::{SecretsError, SecretsResult};
use chrono::{DateTime, Utc};
use rcgen::string::Ia5String;
use rcgen::{
    CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa, KeyUsagePurpose, SanType,
};
use std::fmt;
use std::net::IpAddr;
use std::ops::BitOr;
use time::OffsetDateTime;

/// Attribute types allowed in a subject name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnAttribute {
    CommonName,
    Organization,
    OrganizationalUnit,
    Country,
    Locality,
    Province,
}

impl DnAttribute {
    /// Short attribute label as used in RFC 4514 strings
    pub fn label(&self) -> &'static str {
        match self {
            Self::CommonName => "CN",
            Self::Organization => "O",
            Self::OrganizationalUnit => "OU",
            Self::Country => "C",
            Self::Locality => "L",
            Self::Province => "ST",
        }
    }

    fn dn_type(&self) -> DnType {
        match self {
            Self::CommonName => DnType::CommonName,
            Self::Organization => DnType::OrganizationName,
            Self::OrganizationalUnit => DnType::OrganizationalUnitName,
            Self::Country => DnType::CountryName,
            Self::Locality => DnType::LocalityName,
            Self::Province => DnType::StateOrProvinceName,
        }
    }
}

/// Ordered subject distinguished name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DistinguishedName {
    entries: Vec<(DnAttribute, String)>,
}

impl DistinguishedName {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute, keeping insertion order
    pub fn with(mut self, attribute: DnAttribute, value: impl Into<String>) -> Self {
        self.entries.push((attribute, value.into()));
        self
    }

    pub fn entries(&self) -> &[(DnAttribute, String)] {
        &self.entries
    }

    /// First value of the given attribute
    pub fn get(&self, attribute: DnAttribute) -> Option<&str> {
        self.entries
            .iter()
            .find(|(a, _)| *a == attribute)
            .map(|(_, v)| v.as_str())
    }

    fn to_rcgen(&self) -> rcgen::DistinguishedName {
        let mut dn = rcgen::DistinguishedName::new();
        for (attribute, value) in &self.entries {
            dn.push(attribute.dn_type(), value.as_str());
        }
        dn
    }
}

impl fmt::Display for DistinguishedName {
    /// Renders `CN=a,O=b` with `,`, `+`, `=` and `\` escaped, so distinct
    /// names never render alike.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (attribute, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}=", attribute.label())?;
            for c in value.chars() {
                if matches!(c, ',' | '+' | '=' | '\\') {
                    f.write_str("\\")?;
                }
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

/// X.509 key usage bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    DigitalSignature,
    ContentCommitment,
    KeyEncipherment,
    DataEncipherment,
    KeyAgreement,
    KeyCertSign,
    CrlSign,
    EncipherOnly,
    DecipherOnly,
}

impl KeyUsage {
    const ALL: [Self; 9] = [
        Self::DigitalSignature,
        Self::ContentCommitment,
        Self::KeyEncipherment,
        Self::DataEncipherment,
        Self::KeyAgreement,
        Self::KeyCertSign,
        Self::CrlSign,
        Self::EncipherOnly,
        Self::DecipherOnly,
    ];

    fn bit(&self) -> u16 {
        1 << (*self as u16)
    }

    fn to_rcgen(self) -> KeyUsagePurpose {
        match self {
            Self::DigitalSignature => KeyUsagePurpose::DigitalSignature,
            Self::ContentCommitment => KeyUsagePurpose::ContentCommitment,
            Self::KeyEncipherment => KeyUsagePurpose::KeyEncipherment,
            Self::DataEncipherment => KeyUsagePurpose::DataEncipherment,
            Self::KeyAgreement => KeyUsagePurpose::KeyAgreement,
            Self::KeyCertSign => KeyUsagePurpose::KeyCertSign,
            Self::CrlSign => KeyUsagePurpose::CrlSign,
            Self::EncipherOnly => KeyUsagePurpose::EncipherOnly,
            Self::DecipherOnly => KeyUsagePurpose::DecipherOnly,
        }
    }
}

/// Set of key usage bits, numbered as in RFC 5280
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyUsages(u16);

impl KeyUsages {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn contains(&self, usage: KeyUsage) -> bool {
        self.0 & usage.bit() != 0
    }

    pub fn insert(&mut self, usage: KeyUsage) {
        self.0 |= usage.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in bit order
    pub fn iter(&self) -> impl Iterator<Item = KeyUsage> + '_ {
        KeyUsage::ALL.into_iter().filter(|u| self.contains(*u))
    }
}

impl From<KeyUsage> for KeyUsages {
    fn from(value: KeyUsage) -> Self {
        Self(value.bit())
    }
}

impl BitOr for KeyUsage {
    type Output = KeyUsages;

    fn bitor(self, rhs: Self) -> KeyUsages {
        KeyUsages(self.bit() | rhs.bit())
    }
}

impl BitOr<KeyUsage> for KeyUsages {
    type Output = KeyUsages;

    fn bitor(self, rhs: KeyUsage) -> KeyUsages {
        KeyUsages(self.0 | rhs.bit())
    }
}

impl FromIterator<KeyUsage> for KeyUsages {
    fn from_iter<T: IntoIterator<Item = KeyUsage>>(iter: T) -> Self {
        let mut usages = Self::empty();
        for usage in iter {
            usages.insert(usage);
        }
        usages
    }
}

/// Extended key usage purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedKeyUsage {
    Any,
    ServerAuth,
    ClientAuth,
    CodeSigning,
    EmailProtection,
    TimeStamping,
    OcspSigning,
}

impl ExtendedKeyUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::ServerAuth => "serverAuth",
            Self::ClientAuth => "clientAuth",
            Self::CodeSigning => "codeSigning",
            Self::EmailProtection => "emailProtection",
            Self::TimeStamping => "timeStamping",
            Self::OcspSigning => "OCSPSigning",
        }
    }

    fn to_rcgen(self) -> ExtendedKeyUsagePurpose {
        match self {
            Self::Any => ExtendedKeyUsagePurpose::Any,
            Self::ServerAuth => ExtendedKeyUsagePurpose::ServerAuth,
            Self::ClientAuth => ExtendedKeyUsagePurpose::ClientAuth,
            Self::CodeSigning => ExtendedKeyUsagePurpose::CodeSigning,
            Self::EmailProtection => ExtendedKeyUsagePurpose::EmailProtection,
            Self::TimeStamping => ExtendedKeyUsagePurpose::TimeStamping,
            Self::OcspSigning => ExtendedKeyUsagePurpose::OcspSigning,
        }
    }
}

impl fmt::Display for ExtendedKeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Certificate content, minus the serial number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateTemplate {
    pub subject: DistinguishedName,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
    pub key_usage: KeyUsages,
    pub extended_key_usage: Vec<ExtendedKeyUsage>,
    pub dns_names: Vec<String>,
    pub email_addresses: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
    pub uris: Vec<String>,
}

impl CertificateTemplate {
    /// Template with a subject and validity window and nothing else
    pub fn new(
        subject: DistinguishedName,
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            not_before,
            not_after,
            key_usage: KeyUsages::empty(),
            extended_key_usage: Vec::new(),
            dns_names: Vec::new(),
            email_addresses: Vec::new(),
            ip_addresses: Vec::new(),
            uris: Vec::new(),
        }
    }

    pub fn with_key_usage(mut self, usage: impl Into<KeyUsages>) -> Self {
        self.key_usage = usage.into();
        self
    }

    pub fn with_extended_key_usage(mut self, usage: ExtendedKeyUsage) -> Self {
        self.extended_key_usage.push(usage);
        self
    }

    pub fn with_dns_name(mut self, name: impl Into<String>) -> Self {
        self.dns_names.push(name.into());
        self
    }

    pub fn with_email_address(mut self, address: impl Into<String>) -> Self {
        self.email_addresses.push(address.into());
        self
    }

    pub fn with_ip_address(mut self, address: IpAddr) -> Self {
        self.ip_addresses.push(address);
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uris.push(uri.into());
        self
    }

    /// Add a subject alternative name, as an IP address when it parses as
    /// one and as a DNS name otherwise
    pub fn with_host(self, host: &str) -> Self {
        match host.parse::<IpAddr>() {
            Ok(ip) => self.with_ip_address(ip),
            Err(_) => self.with_dns_name(host),
        }
    }

    /// Build rcgen parameters for this template, without a serial number.
    ///
    /// Certificates are always end-entity: basic constraints are present
    /// with the CA flag cleared.
    pub(crate) fn to_params(&self) -> SecretsResult<CertificateParams> {
        if self.not_after < self.not_before {
            return Err(SecretsError::invalid_parameter(
                "validity window",
                "not_after precedes not_before",
            ));
        }

        let mut params = CertificateParams::default();
        params.distinguished_name = self.subject.to_rcgen();
        params.not_before = offset_date_time(self.not_before)?;
        params.not_after = offset_date_time(self.not_after)?;
        params.is_ca = IsCa::ExplicitNoCa;
        params.key_usages = self.key_usage.iter().map(KeyUsage::to_rcgen).collect();
        params.extended_key_usages = self
            .extended_key_usage
            .iter()
            .map(|u| u.to_rcgen())
            .collect();

        let mut sans = Vec::new();
        for name in &self.dns_names {
            sans.push(SanType::DnsName(ia5("DNS name", name)?));
        }
        for address in &self.email_addresses {
            sans.push(SanType::Rfc822Name(ia5("email address", address)?));
        }
        for ip in &self.ip_addresses {
            sans.push(SanType::IpAddress(*ip));
        }
        for uri in &self.uris {
            sans.push(SanType::URI(ia5("URI", uri)?));
        }
        params.subject_alt_names = sans;

        Ok(params)
    }
}

fn offset_date_time(at: DateTime<Utc>) -> SecretsResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(at.timestamp())
        .map_err(|e| SecretsError::invalid_parameter("certificate validity", e.to_string()))
}

fn ia5(kind: &str, value: &str) -> SecretsResult<Ia5String> {
    Ia5String::try_from(value.to_string())
        .map_err(|e| SecretsError::invalid_parameter(kind, format!("{value:?}: {e}")))
}
