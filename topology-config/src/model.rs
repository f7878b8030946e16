//! Resolved, immutable certificate topology.
//!
//! Certificates live in an arena ordered by name. Issuer links are
//! [`CertificateId`] indices into that arena, so the model can be cloned,
//! shared between threads and walked without any lifetime ties between
//! entries.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::certificate_type::CertificateType;
use crate::error::{Result, TopologyError};
use crate::layout::{artifact_path, Directories, Extensions};
use crate::subject::SubjectName;

/// Position of a certificate in a [`ConfigDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CertificateId(pub(crate) usize);

impl CertificateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A fully resolved certificate entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Certificate {
    #[serde(skip)]
    pub(crate) id: CertificateId,
    #[serde(skip)]
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) cert_type: CertificateType,
    pub(crate) is_authority: bool,
    pub(crate) is_self_signed: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) issuer: String,
    #[serde(skip)]
    pub(crate) issuer_id: Option<CertificateId>,
    #[serde(rename = "Subject")]
    pub(crate) subject: SubjectName,
    pub(crate) hosts: Vec<String>,
}

impl Certificate {
    pub fn id(&self) -> CertificateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cert_type(&self) -> CertificateType {
        self.cert_type
    }

    pub fn is_authority(&self) -> bool {
        self.is_authority
    }

    pub fn is_self_signed(&self) -> bool {
        self.is_self_signed
    }

    /// Issuer name as declared; empty for self-signed certificates.
    pub fn issuer_name(&self) -> &str {
        &self.issuer
    }

    /// Arena link to the issuing certificate; `None` for self-signed certificates.
    pub fn issuer_id(&self) -> Option<CertificateId> {
        self.issuer_id
    }

    /// Subject with document defaults already applied.
    pub fn subject(&self) -> &SubjectName {
        &self.subject
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }
}

/// The validated topology produced by [`crate::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    pub(crate) certificates: Vec<Certificate>,
    pub(crate) index: BTreeMap<String, CertificateId>,
    pub(crate) subject: SubjectName,
    pub(crate) directories: Directories,
    pub(crate) extensions: Extensions,
    pub(crate) keyfiles: Vec<String>,
    pub(crate) combos: BTreeMap<String, Vec<String>>,
}

impl ConfigDocument {
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Certificates in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.iter()
    }

    pub fn id_of(&self, name: &str) -> Option<CertificateId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Certificate> {
        self.id_of(name).and_then(|id| self.certificate(id))
    }

    pub fn certificate(&self, id: CertificateId) -> Option<&Certificate> {
        self.certificates.get(id.0)
    }

    pub fn issuer_of(&self, certificate: &Certificate) -> Option<&Certificate> {
        certificate.issuer_id.and_then(|id| self.certificate(id))
    }

    /// Self-signed certificates, in name order.
    pub fn roots(&self) -> impl Iterator<Item = &Certificate> {
        self.certificates.iter().filter(|cert| cert.is_self_signed)
    }

    /// Certificates issued directly by `issuer`, in name order.
    pub fn children(&self, issuer: CertificateId) -> impl Iterator<Item = &Certificate> {
        self.certificates
            .iter()
            .filter(move |cert| cert.issuer_id == Some(issuer))
    }

    /// The issuer chain of `name`, starting at the certificate itself and
    /// ending at its self-signed root.
    pub fn chain(&self, name: &str) -> Result<Vec<&Certificate>> {
        let mut current = self.get(name).ok_or_else(|| TopologyError::UnknownCertificate {
            name: name.to_string(),
        })?;
        let mut chain = vec![current];

        while let Some(issuer) = self.issuer_of(current) {
            if chain.len() > self.certificates.len() {
                return Err(TopologyError::IssuerCycle {
                    certificate: name.to_string(),
                    cycle: chain.iter().map(|cert| cert.name.clone()).collect(),
                });
            }
            chain.push(issuer);
            current = issuer;
        }

        Ok(chain)
    }

    /// Document-wide subject defaults.
    pub fn subject(&self) -> &SubjectName {
        &self.subject
    }

    pub fn directories(&self) -> &Directories {
        &self.directories
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn keyfiles(&self) -> &[String] {
        &self.keyfiles
    }

    pub fn combos(&self) -> &BTreeMap<String, Vec<String>> {
        &self.combos
    }

    /// Where the certificate named `name` is written.
    pub fn certificate_path(&self, name: &str) -> Result<PathBuf> {
        self.require(name)?;
        Ok(artifact_path(
            &self.directories.public,
            name,
            &self.extensions.certificate,
        ))
    }

    /// Where the private key of the certificate named `name` is written.
    pub fn key_path(&self, name: &str) -> Result<PathBuf> {
        self.require(name)?;
        Ok(artifact_path(
            &self.directories.private,
            name,
            &self.extensions.key,
        ))
    }

    fn require(&self, name: &str) -> Result<&Certificate> {
        self.get(name).ok_or_else(|| TopologyError::UnknownCertificate {
            name: name.to_string(),
        })
    }
}

impl<'a> IntoIterator for &'a ConfigDocument {
    type Item = &'a Certificate;
    type IntoIter = std::slice::Iter<'a, Certificate>;

    fn into_iter(self) -> Self::IntoIter {
        self.certificates.iter()
    }
}

struct CertificateMap<'a>(&'a [Certificate]);

impl Serialize for CertificateMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for cert in self.0 {
            map.serialize_entry(&cert.name, cert)?;
        }
        map.end()
    }
}

impl Serialize for ConfigDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ConfigDocument", 6)?;
        state.serialize_field("directories", &self.directories)?;
        state.serialize_field("extensions", &self.extensions)?;
        state.serialize_field("Subject", &self.subject)?;
        state.serialize_field("keyfiles", &self.keyfiles)?;
        state.serialize_field("certificates", &CertificateMap(&self.certificates))?;
        state.serialize_field("combos", &self.combos)?;
        state.end()
    }
}
