// Primitives for reading the Latin-1 CSV files.

use std::fs::File;
use std::io::Read;

use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};
use encoding_rs::WINDOWS_1252;
use log::debug;
use nv_results::{LoadError, LoadResult, RawRow};
use snafu::prelude::*;

use crate::nvload::*;

/// The rows of a CSV file, keyed by the names in its first line.
pub struct Latin1CsvRows<R: Read> {
    headers: Vec<String>,
    records: ByteRecordsIntoIter<R>,
}

// The files are declared as latin-1, which is read as windows-1252 like browsers do.
fn decode_latin1(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    // Some exports drop the trailing empty cells.
    builder.flexible(true);
    builder
}

fn from_reader<R: Read>(mut rdr: csv::Reader<R>) -> NvResult<Latin1CsvRows<R>> {
    let headers: Vec<String> = rdr
        .byte_headers()
        .context(CsvHeaderSnafu {})?
        .iter()
        .map(decode_latin1)
        .collect();
    debug!("from_reader: headers: {:?}", headers);
    Ok(Latin1CsvRows {
        headers,
        records: rdr.into_byte_records(),
    })
}

pub fn latin1_csv_rows<R: Read>(input: R) -> NvResult<Latin1CsvRows<R>> {
    from_reader(reader_builder().from_reader(input))
}

pub fn open_latin1_csv(path: &str) -> NvResult<Latin1CsvRows<File>> {
    let rdr = reader_builder()
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    from_reader(rdr)
}

impl<R: Read> Latin1CsvRows<R> {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn to_row(&self, record: &ByteRecord) -> RawRow {
        RawRow::from_pairs(self.headers.iter().zip(record.iter().map(decode_latin1)))
    }
}

impl<R: Read> Iterator for Latin1CsvRows<R> {
    type Item = LoadResult<RawRow>;

    fn next(&mut self) -> Option<LoadResult<RawRow>> {
        let record_r = self.records.next()?;
        Some(match record_r {
            Ok(record) => Ok(self.to_row(&record)),
            Err(e) => Err(LoadError::RowSource {
                source: Box::new(e),
            }),
        })
    }
}
