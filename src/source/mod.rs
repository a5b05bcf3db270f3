//! Document source module - abstraction for loading statechart descriptions
//!
//! The scope-tree builder loads file-sourced sub-statecharts through this
//! trait, so tests can splice sub-scopes from in-memory documents instead of
//! fixture files.

use crate::error::{Error, Result};
use crate::parser::{self, RawDocument};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loads a raw statechart description by path
///
/// Implementations:
/// - `FileSource`: reads and parses XML files from the filesystem
/// - `MockSource`: serves pre-registered in-memory documents
pub trait DocumentSource {
    fn load(&self, path: &Path) -> Result<RawDocument>;
}

/// Filesystem-backed document source
pub struct FileSource {
    ns_prefix_len: usize,
}

impl FileSource {
    pub fn new(ns_prefix_len: usize) -> Self {
        Self { ns_prefix_len }
    }
}

impl DocumentSource for FileSource {
    fn load(&self, path: &Path) -> Result<RawDocument> {
        tracing::debug!("Loading statechart description from {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        parser::parse_document(&contents, self.ns_prefix_len)
    }
}

/// In-memory document source for tests
#[derive(Default)]
pub struct MockSource {
    documents: HashMap<PathBuf, RawDocument>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under the given path
    pub fn insert(&mut self, path: impl Into<PathBuf>, document: RawDocument) {
        self.documents.insert(path.into(), document);
    }
}

impl DocumentSource for MockSource {
    fn load(&self, path: &Path) -> Result<RawDocument> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| Error::custom(format!("no document registered for {:?}", path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_source() {
        let mut source = MockSource::new();
        source.insert(
            "sub.xml",
            RawDocument {
                initial: "A".to_string(),
                states: vec![],
            },
        );

        let doc = source.load(Path::new("sub.xml")).unwrap();
        assert_eq!(doc.initial, "A");
        assert!(source.load(Path::new("missing.xml")).is_err());
    }
}
