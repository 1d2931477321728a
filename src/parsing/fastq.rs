use noodles::fastq;
use std::io::BufRead;

use crate::parsing::{SequenceStream, SourceError};

/// Stream read sequences from a FASTQ reader
pub(crate) fn open_fastq(reader: Box<dyn BufRead + Send>) -> SequenceStream {
    Box::new(FastqSequences {
        reader: fastq::io::Reader::new(reader),
        record: fastq::Record::default(),
        done: false,
    })
}

struct FastqSequences<R> {
    reader: fastq::io::Reader<R>,
    record: fastq::Record,
    done: bool,
}

impl<R: BufRead> Iterator for FastqSequences<R> {
    type Item = Result<String, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_record(&mut self.record) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(
                String::from_utf8_lossy(self.record.sequence()).into_owned()
            )),
            Err(e) => {
                self.done = true;
                Some(Err(SourceError::Io(e)))
            }
        }
    }
}
