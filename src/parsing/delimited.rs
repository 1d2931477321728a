use std::io::BufRead;

use crate::parsing::{SequenceStream, SourceConfig, SourceError};

/// Stream one column of a delimited table.
///
/// `config.skip` lines are discarded first; the next line is the header and
/// is never yielded. Blank cells are skipped.
pub(crate) fn open_delimited(
    mut reader: Box<dyn BufRead + Send>,
    config: &SourceConfig,
) -> Result<SequenceStream, SourceError> {
    let mut line = String::new();
    for _ in 0..config.skip {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
    }

    let records = csv::ReaderBuilder::new()
        .delimiter(config.separator.as_byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
        .into_records();

    let column = config.column;
    let skipped = config.skip as u64;

    Ok(Box::new(records.filter_map(move |result| {
        let record = match result {
            Ok(record) => record,
            Err(e) => return Some(Err(SourceError::Csv(e))),
        };

        match record.get(column).map(str::trim) {
            Some("") => None,
            Some(value) => Some(Ok(value.to_string())),
            None => {
                // Line numbers in errors are 1-based and count skipped lines
                let line = record.position().map_or(0, csv::Position::line) + skipped;
                Some(Err(SourceError::MissingColumn { column, line }))
            }
        }
    })))
}
