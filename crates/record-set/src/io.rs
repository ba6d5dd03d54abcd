//! CSV and Parquet Loading, CSV Export

use crate::error::RecordSetError;
use crate::table::RecordSet;
use crate::value::NA_TOKENS;
use polars::prelude::*;
use std::borrow::Cow;
use std::io::Cursor;
use tracing::debug;

/// Leading and trailing magic of a Parquet file
const PARQUET_MAGIC: &[u8] = b"PAR1";

/// Container format of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// Guess the format from the content itself
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.len() >= 2 * PARQUET_MAGIC.len()
            && bytes.starts_with(PARQUET_MAGIC)
            && bytes.ends_with(PARQUET_MAGIC)
        {
            FileFormat::Parquet
        } else {
            FileFormat::Csv
        }
    }
}

/// Options for reading delimited text
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Drop undecodable bytes instead of failing
    pub lossy_utf8: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            lossy_utf8: false,
        }
    }
}

impl ReadOptions {
    /// Options that tolerate invalid UTF-8
    pub fn lossy() -> Self {
        Self {
            lossy_utf8: true,
            ..Default::default()
        }
    }
}

/// Load an upload in whichever format its content indicates
pub fn load(bytes: &[u8], options: &ReadOptions) -> Result<RecordSet, RecordSetError> {
    match FileFormat::sniff(bytes) {
        FileFormat::Parquet => from_parquet(bytes),
        FileFormat::Csv => from_bytes(bytes, options),
    }
}

/// Read delimited text with a header row
///
/// Column types are inferred over every row. NA tokens and empty fields load
/// as missing; rows shorter than the header are padded with missing cells,
/// while rows with extra fields are rejected.
pub fn from_bytes(bytes: &[u8], options: &ReadOptions) -> Result<RecordSet, RecordSetError> {
    let text = if options.lossy_utf8 {
        Cow::Owned(String::from_utf8_lossy(bytes).replace('\u{FFFD}', ""))
    } else {
        Cow::Borrowed(std::str::from_utf8(bytes)?)
    };
    if text.trim().is_empty() {
        return Err(RecordSetError::Empty);
    }

    let null_values = NullValues::AllColumns(NA_TOKENS.iter().map(|t| (*t).into()).collect());
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(options.delimiter)
                .with_null_values(Some(null_values)),
        )
        .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
        .finish()?;

    debug!("Loaded CSV with {} rows and {} columns", frame.height(), frame.width());
    Ok(RecordSet::new(frame))
}

/// Read a Parquet file
pub fn from_parquet(bytes: &[u8]) -> Result<RecordSet, RecordSetError> {
    let frame = ParquetReader::new(Cursor::new(bytes.to_vec())).finish()?;
    debug!("Loaded Parquet with {} rows and {} columns", frame.height(), frame.width());
    Ok(RecordSet::new(frame))
}

/// Serialize a record set as UTF-8 CSV with a header row and no index
pub fn to_bytes(set: &RecordSet) -> Result<Vec<u8>, RecordSetError> {
    let mut frame = set.frame().clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut frame)?;
    Ok(buffer)
}
