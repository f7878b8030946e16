//! Certificate topology resolution for certgen
//!
//! A topology document names a set of certificates, the role each one plays
//! and which certificate issues it. This crate turns such a document into a
//! validated, immutable [`ConfigDocument`]:
//! - every `type` tag is classified into a [`CertificateType`]
//! - subject fields left empty inherit the document-wide `Subject`
//! - output directories and file extensions are merged with their defaults
//! - every non-root certificate is linked to an issuing authority
//! - issuer chains are checked to end at a self-signed root
//!
//! Resolution is a pure function: nothing is cached or shared between calls,
//! and the first violation aborts the whole document.
//!
//! # Document shape
//!
//! ```yaml
//! directories:
//!   public: tls
//!   private: tls/private
//! extensions:
//!   key: key
//!   certificate: pem
//! Subject:
//!   O: Acme
//!   OU: Platform
//!   CN: acme.test
//! certificates:
//!   root:
//!     type: rootCA
//!   web:
//!     type: server
//!     issuer: root
//!     Subject:
//!       CN: www.acme.test
//!     hosts: [www.acme.test]
//! ```
//!
//! # Example
//!
//! ```rust
//! use topology_config::{DocumentSource, StrSource, resolve};
//!
//! let raw = StrSource::yaml(
//!     "certificates:\n  root:\n    type: rootCA\n  web:\n    type: server\n    issuer: root\n",
//! )
//! .load()?;
//! let topology = resolve(raw)?;
//!
//! let chain: Vec<&str> = topology.chain("web")?.iter().map(|c| c.name()).collect();
//! assert_eq!(chain, ["web", "root"]);
//! # Ok::<(), topology_config::TopologyError>(())
//! ```

pub mod certificate_type;
pub mod codes;
pub mod document;
pub mod error;
mod graph;
pub mod layout;
pub mod model;
pub mod providers;
pub mod subject;
pub mod validation;

use std::path::Path;

pub use certificate_type::{classify, CertificateType, Classification, UnknownTypeTag};
pub use document::{RawCertificate, RawDocument};
pub use error::*;
pub use layout::{Directories, Extensions};
pub use model::{Certificate, CertificateId, ConfigDocument};
pub use providers::{DocumentFormat, DocumentSource, FileSource, StrSource};
pub use subject::SubjectName;
pub use validation::{resolve, ConfigValidator, TopologyValidator};

/// Read the document at `path` and resolve it.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigDocument> {
    load_from(&FileSource::new(path))
}

/// Load a document from any source and resolve it.
pub fn load_from(source: &dyn DocumentSource) -> Result<ConfigDocument> {
    resolve(source.load()?)
}
