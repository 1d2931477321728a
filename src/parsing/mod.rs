//! Sequence sources and the adjacency edge-list parser.
//!
//! A [`SequenceSource`] turns a file into a lazy, single-pass stream of
//! barcode strings. The default [`FileSequenceSource`] understands:
//!
//! - **BAM files**: the value of a 2-letter tag (default `CB`) per record,
//!   or the read sequence when no tag is configured
//! - **Delimited text** (`.txt`, `.csv`, `.tsv`, optionally gzipped): one
//!   column of a table with a header line, after skipping leading lines
//! - **FASTQ** (plain or `.gz`, or `-` for stdin): the read sequence
//!
//! ## Example
//!
//! ```rust,no_run
//! use puck_matcher::parsing::{FileSequenceSource, SequenceSource, SourceConfig};
//! use std::path::Path;
//!
//! let source = FileSequenceSource;
//! let config = SourceConfig::default();
//! for barcode in source.open(Path::new("sample.bam"), &config).unwrap() {
//!     println!("{}", barcode.unwrap());
//! }
//! ```
//!
//! ## Format Detection
//!
//! | Extension | Format |
//! |-----------|--------|
//! | `.bam` | BAM |
//! | `.txt`, `.csv`, `.tsv` (+ `.gz`) | Delimited |
//! | other `.gz` | gzipped FASTQ |
//! | anything else, `-` | FASTQ |

pub mod bam;
pub mod delimited;
pub mod edgelist;
pub mod fastq;
pub mod memory;
pub mod source;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use memory::MemorySequenceSource;
pub use source::FileSequenceSource;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Record {record} has no {tag} tag")]
    MissingTag { tag: String, record: usize },

    #[error("Record {record} has a non-string {tag} tag")]
    InvalidTagValue { tag: String, record: usize },

    #[error("Line {line} has no column {column}")]
    MissingColumn { column: usize, line: u64 },

    #[error("No sequences registered for {0}")]
    NotFound(PathBuf),

    #[error("Unsupported input: {0}")]
    UnsupportedFormat(String),
}

/// A lazy stream of barcodes read from one file
pub type SequenceStream = Box<dyn Iterator<Item = Result<String, SourceError>> + Send>;

/// Anything that can produce the barcodes stored at a path.
///
/// Implementations must be shareable across scan workers.
pub trait SequenceSource: Send + Sync {
    /// Open `path` and return a stream over its barcodes.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the file cannot be opened or its header
    /// cannot be read. Errors in individual records are yielded by the stream.
    fn open(&self, path: &Path, config: &SourceConfig) -> Result<SequenceStream, SourceError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Bam,
    Delimited,
    Fastq,
}

impl InputFormat {
    /// Detect the format from the file name
    #[must_use]
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);

        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some("bam") => Self::Bam,
            Some("txt" | "csv" | "tsv") => Self::Delimited,
            _ => Self::Fastq,
        }
    }
}

/// Column separator for delimited inputs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Separator {
    #[default]
    Tab,
    Comma,
    Semicolon,
}

impl Separator {
    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Tab => b'\t',
            Self::Comma => b',',
            Self::Semicolon => b';',
        }
    }
}

/// How to pull one barcode out of each record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Force a format instead of detecting it from the extension
    pub format: Option<InputFormat>,
    /// BAM tag holding the barcode; `None` uses the read sequence
    pub tag: Option<[u8; 2]>,
    /// Lines to skip before the header of a delimited file
    pub skip: usize,
    /// 0-based column of a delimited file
    pub column: usize,
    pub separator: Separator,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            format: None,
            tag: Some(*b"CB"),
            skip: 0,
            column: 0,
            separator: Separator::Tab,
        }
    }
}

impl SourceConfig {
    /// The format to use for `path`
    #[must_use]
    pub fn format_for(&self, path: &Path) -> InputFormat {
        self.format.unwrap_or_else(|| InputFormat::detect(path))
    }
}

/// Parse a 2-character BAM tag such as `CB`
///
/// # Errors
///
/// Returns an error message if `s` is not exactly two ASCII characters.
pub fn parse_tag(s: &str) -> Result<[u8; 2], String> {
    match s.as_bytes() {
        [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphanumeric() => Ok([*a, *b]),
        _ => Err(format!("'{s}' is not a valid 2-character SAM tag")),
    }
}

pub(crate) fn tag_name(tag: [u8; 2]) -> String {
    String::from_utf8_lossy(&tag).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(InputFormat::detect(Path::new("reads.bam")), InputFormat::Bam);
        assert_eq!(InputFormat::detect(Path::new("puck.txt")), InputFormat::Delimited);
        assert_eq!(InputFormat::detect(Path::new("puck.TXT.gz")), InputFormat::Delimited);
        assert_eq!(InputFormat::detect(Path::new("puck.csv")), InputFormat::Delimited);
        assert_eq!(InputFormat::detect(Path::new("reads.fastq.gz")), InputFormat::Fastq);
        assert_eq!(InputFormat::detect(Path::new("reads.fq")), InputFormat::Fastq);
        assert_eq!(InputFormat::detect(Path::new("-")), InputFormat::Fastq);
    }

    #[test]
    fn test_format_override() {
        let config = SourceConfig {
            format: Some(InputFormat::Delimited),
            ..SourceConfig::default()
        };
        assert_eq!(config.format_for(Path::new("x.bam")), InputFormat::Delimited);
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag("CB").unwrap(), *b"CB");
        assert_eq!(parse_tag("XC").unwrap(), *b"XC");
        assert!(parse_tag("C").is_err());
        assert!(parse_tag("CBX").is_err());
        assert!(parse_tag("1B").is_err());
    }
}
