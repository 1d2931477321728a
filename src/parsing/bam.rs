use noodles::bam;
use noodles::sam::alignment::record::data::field::{Tag, Value};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::parsing::{tag_name, SequenceStream, SourceError};

/// Stream barcodes from a BAM file.
///
/// With a tag, each record yields that tag's value (e.g. `CB`); a record
/// missing the tag is an error. Without a tag, each record yields its read
/// sequence.
pub(crate) fn open_bam(path: &Path, tag: Option<[u8; 2]>) -> Result<SequenceStream, SourceError> {
    let mut reader = File::open(path).map(bam::io::Reader::new)?;
    reader.read_header()?;

    Ok(Box::new(BamSequences {
        reader,
        record: bam::Record::default(),
        tag,
        n_records: 0,
        done: false,
    }))
}

struct BamSequences<R> {
    reader: bam::io::Reader<R>,
    record: bam::Record,
    tag: Option<[u8; 2]>,
    n_records: usize,
    done: bool,
}

impl<R: Read> BamSequences<R> {
    fn extract(&self) -> Result<String, SourceError> {
        let Some(raw_tag) = self.tag else {
            let bases: Vec<u8> = self.record.sequence().iter().collect();
            return Ok(String::from_utf8_lossy(&bases).into_owned());
        };

        let missing = || SourceError::MissingTag {
            tag: tag_name(raw_tag),
            record: self.n_records,
        };

        match self.record.data().get(&Tag::from(raw_tag)) {
            None => Err(missing()),
            Some(Err(e)) => Err(SourceError::Io(e)),
            Some(Ok(Value::String(value))) => {
                Ok(String::from_utf8_lossy(value.as_ref()).into_owned())
            }
            Some(Ok(Value::Character(c))) => Ok(char::from(c).to_string()),
            Some(Ok(_)) => Err(SourceError::InvalidTagValue {
                tag: tag_name(raw_tag),
                record: self.n_records,
            }),
        }
    }
}

impl<R: Read> Iterator for BamSequences<R> {
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
            Ok(_) => {
                self.n_records += 1;
                let result = self.extract();
                if result.is_err() {
                    self.done = true;
                }
                Some(result)
            }
            Err(e) => {
                self.done = true;
                Some(Err(SourceError::Io(e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodles::sam;
    use noodles::sam::alignment::io::Write as _;
    use noodles::sam::alignment::record_buf::data::field::Value as BufValue;
    use noodles::sam::alignment::record_buf::Sequence;
    use noodles::sam::alignment::RecordBuf;
    use tempfile::TempDir;

    fn write_bam(path: &Path, barcodes: &[Option<&str>]) {
        let header = sam::Header::default();
        let mut writer = File::create(path).map(bam::io::Writer::new).unwrap();
        writer.write_header(&header).unwrap();

        for barcode in barcodes {
            let mut builder = RecordBuf::builder();
            if let Some(barcode) = barcode {
                builder = builder.set_data(
                    [(Tag::CELL_BARCODE_ID, BufValue::from(*barcode))]
                        .into_iter()
                        .collect(),
                );
            }
            writer
                .write_alignment_record(&header, &builder.build())
                .unwrap();
        }

        writer.try_finish().unwrap();
    }

    fn write_bam_sequences(path: &Path, sequences: &[&str]) {
        let header = sam::Header::default();
        let mut writer = File::create(path).map(bam::io::Writer::new).unwrap();
        writer.write_header(&header).unwrap();

        for sequence in sequences {
            let record = RecordBuf::builder()
                .set_sequence(Sequence::from(sequence.as_bytes().to_vec()))
                .build();
            writer.write_alignment_record(&header, &record).unwrap();
        }

        writer.try_finish().unwrap();
    }

    #[test]
    fn test_open_bam_reads_cb_tag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reads.bam");
        write_bam(&path, &[Some("AAAC"), Some("AAAG"), Some("AAAC")]);

        let seqs: Vec<String> = open_bam(&path, Some(*b"CB"))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(seqs, vec!["AAAC", "AAAG", "AAAC"]);
    }

    #[test]
    fn test_open_bam_missing_tag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reads.bam");
        write_bam(&path, &[Some("AAAC"), None]);

        let results: Vec<_> = open_bam(&path, Some(*b"CB")).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(SourceError::MissingTag { record: 2, .. })
        ));
    }

    #[test]
    fn test_open_bam_without_tag_reads_sequence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reads.bam");
        write_bam_sequences(&path, &["ACGTN", "TTGA"]);

        let seqs: Vec<String> = open_bam(&path, None)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(seqs, vec!["ACGTN", "TTGA"]);
    }
}
