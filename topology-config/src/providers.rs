// Topology document sources (files on disk, in-memory text)
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::document::RawDocument;
use crate::error::{Result, TopologyError};

pub trait DocumentSource {
    fn load(&self) -> Result<RawDocument>;
}

/// Syntax of a topology document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON, everything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    pub fn parse(self, origin: &str, bytes: &[u8]) -> Result<RawDocument> {
        let parsed: std::result::Result<RawDocument, Box<dyn std::error::Error + Send + Sync>> =
            match self {
                DocumentFormat::Yaml => serde_yaml::from_slice(bytes).map_err(Into::into),
                DocumentFormat::Json => serde_json::from_slice(bytes).map_err(Into::into),
            };

        parsed.map_err(|source| TopologyError::DocumentParse {
            origin: origin.to_string(),
            source,
        })
    }
}

/// Document read from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: DocumentFormat,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = clean_path(path.as_ref());
        let format = DocumentFormat::from_path(&path);
        Self { path, format }
    }

    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }
}

impl DocumentSource for FileSource {
    fn load(&self) -> Result<RawDocument> {
        let bytes = fs::read(&self.path).map_err(|source| TopologyError::DocumentRead {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            format = ?self.format,
            "read config document"
        );

        self.format.parse(&self.path.display().to_string(), &bytes)
    }
}

/// Document held in memory.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    text: &'a str,
    format: DocumentFormat,
}

impl<'a> StrSource<'a> {
    pub fn yaml(text: &'a str) -> Self {
        Self {
            text,
            format: DocumentFormat::Yaml,
        }
    }

    pub fn json(text: &'a str) -> Self {
        Self {
            text,
            format: DocumentFormat::Json,
        }
    }
}

impl DocumentSource for StrSource<'_> {
    fn load(&self) -> Result<RawDocument> {
        self.format.parse("<memory>", self.text.as_bytes())
    }
}

/// Drop `.` components and resolve `..` lexically where possible.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    cleaned.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    cleaned.pop();
                } else if !matches!(
                    cleaned.components().next_back(),
                    Some(Component::RootDir) | Some(Component::Prefix(_))
                ) {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }

    if cleaned.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        cleaned
    }
}
