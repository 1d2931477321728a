use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::parsing::{SequenceSource, SequenceStream, SourceConfig, SourceError};

/// A [`SequenceSource`] backed by in-memory barcode lists.
///
/// Useful for driving the scanner without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemorySequenceSource {
    sequences: HashMap<PathBuf, Vec<String>>,
    failing: HashSet<PathBuf>,
}

impl MemorySequenceSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the barcodes returned for `path`
    #[must_use]
    pub fn with<I, S>(mut self, path: impl Into<PathBuf>, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sequences
            .insert(path.into(), sequences.into_iter().map(Into::into).collect());
        self
    }

    /// Make `path` fail with an I/O error after its first barcode
    #[must_use]
    pub fn with_failure(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }
}

impl SequenceSource for MemorySequenceSource {
    fn open(&self, path: &Path, _config: &SourceConfig) -> Result<SequenceStream, SourceError> {
        let sequences = self
            .sequences
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_path_buf()))?;

        if self.failing.contains(path) {
            let head = sequences.into_iter().take(1).map(Ok);
            let failure = std::iter::once(Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "truncated input",
            ))));
            return Ok(Box::new(head.chain(failure)));
        }

        Ok(Box::new(sequences.into_iter().map(Ok)))
    }
}
