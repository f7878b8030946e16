//! Output directory and file extension settings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TopologyError};

pub const DEFAULT_PUBLIC_DIRECTORY: &str = "tls";
pub const DEFAULT_PRIVATE_DIRECTORY: &str = "tls/private";
pub const DEFAULT_KEY_EXTENSION: &str = "key";
pub const DEFAULT_CERTIFICATE_EXTENSION: &str = "pem";

const DIRECTORY_DEFAULTS: &[(&str, &str)] = &[
    ("public", DEFAULT_PUBLIC_DIRECTORY),
    ("private", DEFAULT_PRIVATE_DIRECTORY),
];

const EXTENSION_DEFAULTS: &[(&str, &str)] = &[
    ("key", DEFAULT_KEY_EXTENSION),
    ("certificate", DEFAULT_CERTIFICATE_EXTENSION),
];

/// Merge `overrides` over `defaults`.
///
/// The recognized keys are exactly the keys of `defaults`. Any other override
/// key fails with [`TopologyError::UnrecognizedConfigKey`] naming `section`.
pub fn resolve_overrides(
    section: &'static str,
    overrides: &BTreeMap<String, String>,
    defaults: &[(&str, &str)],
) -> Result<BTreeMap<String, String>> {
    let mut resolved: BTreeMap<String, String> = defaults
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    for (key, value) in overrides {
        match resolved.get_mut(key) {
            Some(slot) => {
                debug!(section, key = %key, value = %value, "override applied");
                *slot = value.clone();
            }
            None => {
                return Err(TopologyError::UnrecognizedConfigKey {
                    section,
                    key: key.clone(),
                })
            }
        }
    }

    Ok(resolved)
}

/// Resolved public and private output directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directories {
    pub public: PathBuf,
    pub private: PathBuf,
}

impl Directories {
    pub fn resolve(overrides: &BTreeMap<String, String>) -> Result<Self> {
        let mut resolved = resolve_overrides("directories", overrides, DIRECTORY_DEFAULTS)?;
        Ok(Self {
            public: take(&mut resolved, "public", DEFAULT_PUBLIC_DIRECTORY).into(),
            private: take(&mut resolved, "private", DEFAULT_PRIVATE_DIRECTORY).into(),
        })
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            public: PathBuf::from(DEFAULT_PUBLIC_DIRECTORY),
            private: PathBuf::from(DEFAULT_PRIVATE_DIRECTORY),
        }
    }
}

/// Resolved file extensions for keys and certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extensions {
    pub key: String,
    pub certificate: String,
}

impl Extensions {
    pub fn resolve(overrides: &BTreeMap<String, String>) -> Result<Self> {
        let mut resolved = resolve_overrides("extensions", overrides, EXTENSION_DEFAULTS)?;
        Ok(Self {
            key: take(&mut resolved, "key", DEFAULT_KEY_EXTENSION),
            certificate: take(&mut resolved, "certificate", DEFAULT_CERTIFICATE_EXTENSION),
        })
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY_EXTENSION.to_string(),
            certificate: DEFAULT_CERTIFICATE_EXTENSION.to_string(),
        }
    }
}

fn take(resolved: &mut BTreeMap<String, String>, key: &str, default: &str) -> String {
    resolved.remove(key).unwrap_or_else(|| default.to_string())
}

/// `<dir>/<name>.<extension>`
pub(crate) fn artifact_path(dir: &Path, name: &str, extension: &str) -> PathBuf {
    dir.join(format!("{name}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_directories_default() {
        let dirs = Directories::resolve(&BTreeMap::new()).unwrap();
        assert_eq!(dirs.public, PathBuf::from("tls"));
        assert_eq!(dirs.private, PathBuf::from("tls/private"));
        assert_eq!(dirs, Directories::default());
    }

    #[test]
    fn test_directories_partial_override() {
        let dirs = Directories::resolve(&overrides(&[("private", "secret")])).unwrap();
        assert_eq!(dirs.public, PathBuf::from("tls"));
        assert_eq!(dirs.private, PathBuf::from("secret"));
    }

    #[test]
    fn test_directories_reject_unknown_key() {
        let err = Directories::resolve(&overrides(&[("public", "out"), ("backup", "bak")]))
            .unwrap_err();
        match err {
            TopologyError::UnrecognizedConfigKey { section, key } => {
                assert_eq!(section, "directories");
                assert_eq!(key, "backup");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_extensions_override_and_reject() {
        let ext = Extensions::resolve(&overrides(&[("certificate", "crt")])).unwrap();
        assert_eq!(ext.key, "key");
        assert_eq!(ext.certificate, "crt");

        // keys valid for one section are not valid for the other
        assert!(matches!(
            Extensions::resolve(&overrides(&[("public", "x")])),
            Err(TopologyError::UnrecognizedConfigKey { section: "extensions", .. })
        ));
        assert!(matches!(
            Directories::resolve(&overrides(&[("key", "x")])),
            Err(TopologyError::UnrecognizedConfigKey { section: "directories", .. })
        ));
    }

    #[test]
    fn test_unknown_key_reported_in_sorted_order() {
        let err = resolve_overrides(
            "directories",
            &overrides(&[("zeta", "z"), ("alpha", "a")]),
            DIRECTORY_DEFAULTS,
        )
        .unwrap_err();
        assert!(matches!(err, TopologyError::UnrecognizedConfigKey { key, .. } if key == "alpha"));
    }

    #[test]
    fn test_artifact_path() {
        assert_eq!(
            artifact_path(Path::new("tls"), "web", "pem"),
            PathBuf::from("tls/web.pem")
        );
    }
}
