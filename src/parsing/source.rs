use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::parsing::{
    bam, delimited, fastq, InputFormat, SequenceSource, SequenceStream, SourceConfig, SourceError,
};

/// Reads barcodes from files on disk, dispatching on [`InputFormat`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSequenceSource;

impl SequenceSource for FileSequenceSource {
    fn open(&self, path: &Path, config: &SourceConfig) -> Result<SequenceStream, SourceError> {
        let format = config.format_for(path);
        debug!(path = %path.display(), ?format, "Opening sequence source");

        match format {
            InputFormat::Bam => {
                if is_stdin(path) {
                    return Err(SourceError::UnsupportedFormat(
                        "BAM input cannot be read from stdin".to_string(),
                    ));
                }
                bam::open_bam(path, config.tag)
            }
            InputFormat::Delimited => delimited::open_delimited(open_text(path)?, config),
            InputFormat::Fastq => Ok(fastq::open_fastq(open_text(path)?)),
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

/// Open a text input, transparently decompressing `.gz` files
fn open_text(path: &Path) -> std::io::Result<Box<dyn BufRead + Send>> {
    if is_stdin(path) {
        return Ok(Box::new(BufReader::new(std::io::stdin())));
    }

    let file = File::open(path)?;
    let gzipped = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    if gzipped {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
