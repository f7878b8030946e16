// Document validation: turns a raw document into a resolved topology
use tracing::{debug, info};

use crate::document::RawDocument;
use crate::error::Result;
use crate::graph::IssuerGraphBuilder;
use crate::layout::{Directories, Extensions};
use crate::model::ConfigDocument;

/// Validation stage applied to a raw document.
pub trait ConfigValidator {
    fn validate(&self, document: RawDocument) -> Result<ConfigDocument>;
}

/// Runs directories, extensions, then certificate resolution and linking,
/// returning the first error encountered.
#[derive(Debug, Default, Clone, Copy)]
pub struct TopologyValidator;

impl ConfigValidator for TopologyValidator {
    fn validate(&self, document: RawDocument) -> Result<ConfigDocument> {
        let RawDocument {
            directories,
            extensions,
            subject,
            keyfiles,
            certificates,
            combos,
        } = document;

        let directories = Directories::resolve(&directories)?;
        let extensions = Extensions::resolve(&extensions)?;
        let graph = IssuerGraphBuilder::new(&subject).build(certificates)?;

        let resolved = ConfigDocument {
            certificates: graph.certificates,
            index: graph.index,
            subject,
            directories,
            extensions,
            keyfiles,
            combos,
        };

        for authority in resolved.iter().filter(|cert| cert.is_authority()) {
            if resolved.children(authority.id()).next().is_none() {
                debug!(certificate = %authority.name(), "authority issues no certificates");
            }
        }

        info!(
            certificates = resolved.len(),
            roots = resolved.roots().count(),
            "certificate topology resolved"
        );
        Ok(resolved)
    }
}

/// Resolve `document` with the standard validator.
pub fn resolve(document: RawDocument) -> Result<ConfigDocument> {
    TopologyValidator.validate(document)
}
