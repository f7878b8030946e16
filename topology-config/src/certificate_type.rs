//! Certificate role classification.
//!
//! Every certificate in a topology document carries a `type` tag naming its
//! structural role. The set of roles is closed: a new role needs a new
//! [`CertificateType`] variant and a new row below, never a configuration
//! change.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::error::{Result, TopologyError};

/// Structural role of a certificate in the issuer hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateType {
    /// Self-signed authority at the top of a chain
    RootAuthority,
    /// Authority issued by another authority
    IntermediateAuthority,
    /// Delegated OCSP response signer
    OcspSigning,
    /// TLS server leaf
    Server,
    /// TLS client leaf
    Client,
}

/// One row of the role table.
#[derive(Debug)]
struct TypeRow {
    cert_type: CertificateType,
    tag: &'static str,
    is_authority: bool,
    is_self_signed: bool,
}

static ROOT_AUTHORITY: TypeRow = TypeRow {
    cert_type: CertificateType::RootAuthority,
    tag: "rootCA",
    is_authority: true,
    is_self_signed: true,
};

static INTERMEDIATE_AUTHORITY: TypeRow = TypeRow {
    cert_type: CertificateType::IntermediateAuthority,
    tag: "intermediateCA",
    is_authority: true,
    is_self_signed: false,
};

static OCSP_SIGNING: TypeRow = TypeRow {
    cert_type: CertificateType::OcspSigning,
    tag: "OCSPSigning",
    is_authority: false,
    is_self_signed: false,
};

static SERVER: TypeRow = TypeRow {
    cert_type: CertificateType::Server,
    tag: "server",
    is_authority: false,
    is_self_signed: false,
};

static CLIENT: TypeRow = TypeRow {
    cert_type: CertificateType::Client,
    tag: "client",
    is_authority: false,
    is_self_signed: false,
};

/// Every role row, searched when parsing a tag.
static TYPE_TABLE: [&TypeRow; 5] = [
    &ROOT_AUTHORITY,
    &INTERMEDIATE_AUTHORITY,
    &OCSP_SIGNING,
    &SERVER,
    &CLIENT,
];

impl CertificateType {
    pub const ALL: [CertificateType; 5] = [
        CertificateType::RootAuthority,
        CertificateType::IntermediateAuthority,
        CertificateType::OcspSigning,
        CertificateType::Server,
        CertificateType::Client,
    ];

    fn row(self) -> &'static TypeRow {
        match self {
            CertificateType::RootAuthority => &ROOT_AUTHORITY,
            CertificateType::IntermediateAuthority => &INTERMEDIATE_AUTHORITY,
            CertificateType::OcspSigning => &OCSP_SIGNING,
            CertificateType::Server => &SERVER,
            CertificateType::Client => &CLIENT,
        }
    }

    /// Tag used for this role in configuration documents.
    pub fn tag(self) -> &'static str {
        self.row().tag
    }

    /// Whether certificates of this role may issue other certificates.
    pub fn is_authority(self) -> bool {
        self.row().is_authority
    }

    /// Whether certificates of this role are their own issuer.
    pub fn is_self_signed(self) -> bool {
        self.row().is_self_signed
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown certificate type '{0}'")]
pub struct UnknownTypeTag(pub String);

impl FromStr for CertificateType {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TYPE_TABLE
            .iter()
            .find(|row| row.tag == s)
            .map(|row| row.cert_type)
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for CertificateType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Resolved structural facts for one certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub cert_type: CertificateType,
    pub is_authority: bool,
    pub is_self_signed: bool,
}

/// Classify the `tag` declared by `certificate`.
pub fn classify(certificate: &str, tag: &str) -> Result<Classification> {
    let cert_type: CertificateType =
        tag.parse()
            .map_err(|UnknownTypeTag(tag)| TopologyError::InvalidCertificateType {
                certificate: certificate.to_string(),
                tag,
            })?;

    Ok(Classification {
        cert_type,
        is_authority: cert_type.is_authority(),
        is_self_signed: cert_type.is_self_signed(),
    })
}
