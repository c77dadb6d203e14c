//! Tab-separated registry files.
//!
//! One record per row under a fixed header:
//!
//! ```text
//! prefix	uri_prefix	prefix_synonyms	uri_prefix_synonyms	pattern
//! go	http://purl.obolibrary.org/obo/GO_	GO|gomf	http://amigo.geneontology.org/amigo/term/GO:	^\d{7}$
//! ```
//!
//! Synonym columns hold `|`-separated values; an empty `pattern` cell means none.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, WriterBuilder};
use curies_types::Record;

use crate::types::{CurieError, CurieResult};

/// Column names, in order.
pub const COLUMNS: [&str; 5] = [
    "prefix",
    "uri_prefix",
    "prefix_synonyms",
    "uri_prefix_synonyms",
    "pattern",
];

/// Separator between synonyms within a cell.
pub const SYNONYM_SEPARATOR: char = '|';

/// A streaming reader for tab-separated registries.
///
/// Rows are parsed one at a time; blank rows are skipped.
pub struct TsvReader<R: Read> {
    reader: Reader<R>,
    rows_read: usize,
}

impl TsvReader<BufReader<File>> {
    /// Opens a registry file.
    ///
    /// # Errors
    /// Returns an error if the file does not exist, cannot be opened or has
    /// an invalid header.
    pub fn from_path<P: AsRef<Path>>(path: P) -> CurieResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CurieError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read> TsvReader<R> {
    /// Wraps a reader, validating the header row.
    pub fn from_reader(reader: R) -> CurieResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self::validate_headers(&mut csv_reader)?;

        Ok(Self {
            reader: csv_reader,
            rows_read: 0,
        })
    }

    fn validate_headers(reader: &mut Reader<R>) -> CurieResult<()> {
        let headers = reader.headers()?;

        if headers.len() != COLUMNS.len() {
            return Err(CurieError::InvalidHeader {
                expected: COLUMNS.len(),
                found: headers.len(),
            });
        }

        for (i, expected) in COLUMNS.iter().enumerate() {
            // tolerate a UTF-8 BOM on the first column
            let found = headers.get(i).unwrap_or("").trim_start_matches('\u{feff}');
            if found != *expected {
                return Err(CurieError::UnexpectedColumn {
                    position: i,
                    expected: expected.to_string(),
                    found: found.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Returns the number of data rows read so far, blank rows included.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Reads every remaining record, stopping at the first bad row.
    pub fn parse_all(self) -> CurieResult<Vec<Record>> {
        self.collect()
    }
}

fn split_synonyms(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(SYNONYM_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_row(row: &StringRecord) -> Record {
    let cell = |i: usize| row.get(i).unwrap_or("");
    let mut record = Record::new(cell(0), cell(1))
        .with_prefix_synonyms(split_synonyms(cell(2)))
        .with_uri_prefix_synonyms(split_synonyms(cell(3)));
    if !cell(4).is_empty() {
        record.pattern = Some(cell(4).to_string());
    }
    record
}

impl<R: Read> Iterator for TsvReader<R> {
    type Item = CurieResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = StringRecord::new();
        loop {
            match self.reader.read_record(&mut row) {
                Ok(true) => {
                    self.rows_read += 1;
                    if row.iter().all(|f| f.trim().is_empty()) {
                        continue;
                    }
                    return Some(Ok(parse_row(&row)));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Writes records under the standard header.
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> CurieResult<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
    writer.write_record(COLUMNS)?;

    let separator = SYNONYM_SEPARATOR.to_string();
    for record in records {
        let row = record.fields().map(|(_, value)| value.join(&separator));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
