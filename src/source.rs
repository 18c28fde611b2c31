//! Where Markdown documents come from.
//!
//! The article loader only needs `(path, content)` pairs. Discovery sits
//! behind [`DocumentSource`] so the same pipeline runs over a directory walk
//! ([`FsSource`]) or a table compiled into the binary or built by a test
//! ([`MemorySource`]).
//!
//! Paths are relative to the documents root and always `/`-separated:
//! `工作总结/foo.md`, `welcome.md`.

use crate::assets::is_markdown;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Documents directory not found: {0}")]
    MissingRoot(PathBuf),
}

/// One Markdown document as handed to the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Path relative to the documents root, `/`-separated.
    pub path: String,
    pub content: String,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

pub trait DocumentSource {
    /// All documents, in the source's enumeration order.
    fn documents(&self) -> Result<Vec<SourceDocument>, SourceError>;
}

/// Documents found by walking a directory on disk.
///
/// Only `.md` files are yielded. Hidden files and directories are skipped.
/// Entries are visited in file-name order within each directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for FsSource {
    fn documents(&self) -> Result<Vec<SourceDocument>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::MissingRoot(self.root.clone()));
        }

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        let mut documents = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let path = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let bytes = fs::read(entry.path()).map_err(|source| SourceError::Read {
                path: entry.path().to_path_buf(),
                source,
            })?;
            let content = match String::from_utf8(bytes) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = path.as_str(), "document is not valid UTF-8, invalid bytes replaced");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            debug!(path = path.as_str(), bytes = content.len(), "document found");
            documents.push(SourceDocument { path, content });
        }
        Ok(documents)
    }
}

/// A fixed table of documents.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<SourceDocument>,
}

impl MemorySource {
    pub fn new(documents: Vec<SourceDocument>) -> Self {
        Self { documents }
    }

    /// Build from a static `(path, content)` table, e.g. one produced with
    /// `include_str!`.
    pub fn from_table(table: &[(&str, &str)]) -> Self {
        Self::new(
            table
                .iter()
                .map(|(path, content)| SourceDocument::new(*path, *content))
                .collect(),
        )
    }
}

impl DocumentSource for MemorySource {
    fn documents(&self) -> Result<Vec<SourceDocument>, SourceError> {
        Ok(self.documents.clone())
    }
}
