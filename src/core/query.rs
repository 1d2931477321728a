use rustc_hash::FxHashSet;
use std::path::Path;

use crate::parsing::{SequenceSource, SourceConfig, SourceError};

/// The deduplicated set of query barcodes.
///
/// Built once per run and shared read-only by every scan worker.
#[derive(Debug, Clone, Default)]
pub struct QuerySet {
    sequences: FxHashSet<String>,
}

impl QuerySet {
    /// Read every sequence from `path` and deduplicate them.
    ///
    /// The source is read to completion; the first read error is returned
    /// unchanged and no partial set is produced.
    ///
    /// # Errors
    ///
    /// Returns the `SourceError` raised while opening or reading `path`.
    pub fn from_source(
        source: &dyn SequenceSource,
        path: &Path,
        config: &SourceConfig,
    ) -> Result<Self, SourceError> {
        let sequences = source
            .open(path, config)?
            .collect::<Result<FxHashSet<String>, SourceError>>()?;
        Ok(Self { sequences })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    #[must_use]
    pub fn contains(&self, sequence: &str) -> bool {
        self.sequences.contains(sequence)
    }

    /// Number of sequences in `other` that are also in the query set
    #[must_use]
    pub fn intersection_size(&self, other: &FxHashSet<String>) -> usize {
        // Iterate over the smaller side
        if other.len() <= self.sequences.len() {
            other.iter().filter(|s| self.sequences.contains(*s)).count()
        } else {
            self.sequences.iter().filter(|s| other.contains(*s)).count()
        }
    }
}

impl<S: Into<String>> FromIterator<S> for QuerySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            sequences: iter.into_iter().map(Into::into).collect(),
        }
    }
}
