//! Issuer graph construction.
//!
//! Resolution runs in three passes over the certificates in name order:
//!
//! 1. classify each type tag and apply subject defaults,
//! 2. link every non-self-signed certificate to its issuer and check that the
//!    issuer exists and is an authority,
//! 3. walk each issuer chain and reject loops among intermediates.
//!
//! Every pass stops at the first violation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::certificate_type::classify;
use crate::document::RawCertificate;
use crate::error::{Result, TopologyError};
use crate::model::{Certificate, CertificateId};
use crate::subject::SubjectName;

/// Linked certificate arena plus its name index.
#[derive(Debug)]
pub(crate) struct IssuerGraph {
    pub certificates: Vec<Certificate>,
    pub index: BTreeMap<String, CertificateId>,
}

pub(crate) struct IssuerGraphBuilder<'a> {
    fallback: &'a SubjectName,
}

impl<'a> IssuerGraphBuilder<'a> {
    /// `fallback` supplies subject fields a certificate leaves empty.
    pub(crate) fn new(fallback: &'a SubjectName) -> Self {
        Self { fallback }
    }

    pub(crate) fn build(&self, raw: BTreeMap<String, RawCertificate>) -> Result<IssuerGraph> {
        let mut certificates = self.resolve_entries(raw)?;
        let index: BTreeMap<String, CertificateId> = certificates
            .iter()
            .map(|cert| (cert.name.clone(), cert.id))
            .collect();

        link_issuers(&mut certificates, &index)?;
        detect_cycles(&certificates)?;

        Ok(IssuerGraph {
            certificates,
            index,
        })
    }

    /// Pass 1: classification and subject defaults.
    fn resolve_entries(&self, raw: BTreeMap<String, RawCertificate>) -> Result<Vec<Certificate>> {
        raw.into_iter()
            .enumerate()
            .map(|(position, (name, entry))| {
                let classification = classify(&name, &entry.type_tag)?;
                debug!(
                    certificate = %name,
                    cert_type = %classification.cert_type,
                    "classified certificate"
                );

                Ok(Certificate {
                    id: CertificateId(position),
                    cert_type: classification.cert_type,
                    is_authority: classification.is_authority,
                    is_self_signed: classification.is_self_signed,
                    issuer: entry.issuer,
                    issuer_id: None,
                    subject: entry.subject.resolve(self.fallback),
                    hosts: entry.hosts,
                    name,
                })
            })
            .collect()
    }
}

/// Pass 2: issuer lookup and hierarchy rules.
fn link_issuers(
    certificates: &mut [Certificate],
    index: &BTreeMap<String, CertificateId>,
) -> Result<()> {
    let view: &[Certificate] = certificates;
    let links = view
        .iter()
        .map(|cert| resolve_link(cert, view, index))
        .collect::<Result<Vec<_>>>()?;

    for (cert, link) in certificates.iter_mut().zip(links) {
        cert.issuer_id = link;
    }
    Ok(())
}

fn resolve_link(
    cert: &Certificate,
    certificates: &[Certificate],
    index: &BTreeMap<String, CertificateId>,
) -> Result<Option<CertificateId>> {
    if cert.is_self_signed {
        if !cert.issuer.is_empty() {
            return Err(TopologyError::SelfSignedWithIssuer {
                certificate: cert.name.clone(),
                issuer: cert.issuer.clone(),
            });
        }
        return Ok(None);
    }

    let issuer = index
        .get(&cert.issuer)
        .and_then(|id| certificates.get(id.0))
        .ok_or_else(|| TopologyError::MissingIssuer {
            certificate: cert.name.clone(),
            issuer: cert.issuer.clone(),
        })?;

    if !issuer.is_authority {
        return Err(TopologyError::IssuerNotAuthority {
            certificate: cert.name.clone(),
            issuer: issuer.name.clone(),
        });
    }

    debug!(certificate = %cert.name, issuer = %issuer.name, "linked issuer");
    Ok(Some(issuer.id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unvisited,
    OnPath,
    Done,
}

/// Pass 3: every chain must end at a self-signed root.
fn detect_cycles(certificates: &[Certificate]) -> Result<()> {
    let mut state = vec![Visit::Unvisited; certificates.len()];

    for start in certificates {
        let mut path: Vec<CertificateId> = Vec::new();
        let mut cursor = Some(start.id);

        while let Some(id) = cursor {
            match state.get(id.0).copied() {
                Some(Visit::Unvisited) => {
                    set(&mut state, id, Visit::OnPath);
                    path.push(id);
                    cursor = certificates.get(id.0).and_then(|cert| cert.issuer_id);
                }
                Some(Visit::OnPath) => return Err(cycle_error(certificates, &path, id)),
                Some(Visit::Done) | None => break,
            }
        }

        for id in path {
            set(&mut state, id, Visit::Done);
        }
    }

    Ok(())
}

fn set(state: &mut [Visit], id: CertificateId, visit: Visit) {
    if let Some(slot) = state.get_mut(id.0) {
        *slot = visit;
    }
}

fn cycle_error(
    certificates: &[Certificate],
    path: &[CertificateId],
    entry: CertificateId,
) -> TopologyError {
    let name = |id: &CertificateId| {
        certificates
            .get(id.0)
            .map(|cert| cert.name.clone())
            .unwrap_or_default()
    };

    let mut cycle: Vec<String> = path
        .iter()
        .skip_while(|id| **id != entry)
        .map(name)
        .collect();
    cycle.push(name(&entry));

    TopologyError::IssuerCycle {
        certificate: name(&entry),
        cycle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate_type::CertificateType;

    fn build(entries: &[(&str, &str, &str)]) -> Result<IssuerGraph> {
        let raw = entries
            .iter()
            .map(|(name, tag, issuer)| (name.to_string(), RawCertificate::new(*tag, *issuer)))
            .collect();
        IssuerGraphBuilder::new(&SubjectName::default()).build(raw)
    }

    fn issuer_name(graph: &IssuerGraph, name: &str) -> Option<String> {
        let id = graph.index.get(name)?;
        let cert = graph.certificates.get(id.0)?;
        let issuer = graph.certificates.get(cert.issuer_id?.0)?;
        Some(issuer.name.clone())
    }

    #[test]
    fn test_arena_is_name_ordered() {
        let graph = build(&[("zz", "rootCA", ""), ("aa", "server", "zz")]).unwrap();
        let names: Vec<&str> = graph.certificates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["aa", "zz"]);
        for (position, cert) in graph.certificates.iter().enumerate() {
            assert_eq!(cert.id.index(), position);
            assert_eq!(graph.index[&cert.name], cert.id);
        }
    }

    #[test]
    fn test_links_fan_out_and_chains() {
        let graph = build(&[
            ("root", "rootCA", ""),
            ("inter", "intermediateCA", "root"),
            ("web", "server", "inter"),
            ("api", "client", "inter"),
            ("ocsp", "OCSPSigning", "root"),
            ("spare", "intermediateCA", "root"),
        ])
        .unwrap();

        assert_eq!(issuer_name(&graph, "root"), None);
        assert_eq!(issuer_name(&graph, "inter").as_deref(), Some("root"));
        assert_eq!(issuer_name(&graph, "web").as_deref(), Some("inter"));
        assert_eq!(issuer_name(&graph, "api").as_deref(), Some("inter"));
        assert_eq!(issuer_name(&graph, "ocsp").as_deref(), Some("root"));
        assert_eq!(issuer_name(&graph, "spare").as_deref(), Some("root"));
    }

    #[test]
    fn test_pass_one_failure_precedes_linking() {
        // "a" would fail linking, but "b" has an invalid tag and pass 1 runs first
        let err = build(&[("a", "server", "nowhere"), ("b", "bogus", "")]).unwrap_err();
        assert!(matches!(err, TopologyError::InvalidCertificateType { certificate, .. } if certificate == "b"));
    }

    #[test]
    fn test_non_self_signed_with_empty_issuer_is_missing() {
        let err = build(&[("web", "server", "")]).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::MissingIssuer { certificate, issuer } if certificate == "web" && issuer.is_empty()
        ));
    }

    #[test]
    fn test_self_issued_intermediate_is_cycle() {
        let err = build(&[("loop", "intermediateCA", "loop")]).unwrap_err();
        match err {
            TopologyError::IssuerCycle { certificate, cycle } => {
                assert_eq!(certificate, "loop");
                assert_eq!(cycle, vec!["loop", "loop"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_cycle_entered_from_leaf() {
        let err = build(&[
            ("a-leaf", "server", "b"),
            ("b", "intermediateCA", "c"),
            ("c", "intermediateCA", "b"),
        ])
        .unwrap_err();
        match err {
            TopologyError::IssuerCycle { certificate, cycle } => {
                assert_eq!(certificate, "b");
                assert_eq!(cycle, vec!["b", "c", "b"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_shared_ancestors_are_walked_once() {
        let graph = build(&[
            ("root", "rootCA", ""),
            ("i1", "intermediateCA", "root"),
            ("i2", "intermediateCA", "i1"),
            ("l1", "server", "i2"),
            ("l2", "server", "i2"),
        ])
        .unwrap();
        assert!(graph
            .certificates
            .iter()
            .all(|c| c.is_self_signed == (c.cert_type == CertificateType::RootAuthority)));
    }
}
