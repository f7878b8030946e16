use std::path::PathBuf;

use thiserror::Error;

use crate::codes;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("error reading config file '{}'", .path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config document '{origin}'")]
    DocumentParse {
        origin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid type '{tag}' for certificate {certificate}")]
    InvalidCertificateType { certificate: String, tag: String },

    #[error("invalid entry '{key}' in {section} section of config document")]
    UnrecognizedConfigKey { section: &'static str, key: String },

    #[error("self-signed certificate {certificate} must not have issuer (found '{issuer}')")]
    SelfSignedWithIssuer { certificate: String, issuer: String },

    #[error("certificate {certificate} has missing issuer '{issuer}'")]
    MissingIssuer { certificate: String, issuer: String },

    #[error("certificate {certificate} has issuer {issuer} that is not a CA")]
    IssuerNotAuthority { certificate: String, issuer: String },

    #[error("issuer cycle detected at certificate {certificate}: {}", .cycle.join(" -> "))]
    IssuerCycle {
        certificate: String,
        cycle: Vec<String>,
    },

    #[error("certificate {name} is not defined")]
    UnknownCertificate { name: String },
}

impl TopologyError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DocumentRead { .. } => codes::document::READ_FAILED,
            Self::DocumentParse { .. } => codes::document::PARSE_FAILED,
            Self::InvalidCertificateType { .. } => codes::certificate::INVALID_TYPE,
            Self::UnrecognizedConfigKey { .. } => codes::document::UNRECOGNIZED_KEY,
            Self::SelfSignedWithIssuer { .. } => codes::hierarchy::SELF_SIGNED_WITH_ISSUER,
            Self::MissingIssuer { .. } => codes::hierarchy::MISSING_ISSUER,
            Self::IssuerNotAuthority { .. } => codes::hierarchy::ISSUER_NOT_AUTHORITY,
            Self::IssuerCycle { .. } => codes::hierarchy::ISSUER_CYCLE,
            Self::UnknownCertificate { .. } => codes::certificate::UNKNOWN,
        }
    }
}

pub type Result<T> = std::result::Result<T, TopologyError>;
