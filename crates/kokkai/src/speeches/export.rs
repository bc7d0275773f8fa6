use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Prefix that lets spreadsheet tools detect UTF-8 without guessing.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A row type with a fixed column layout, so an empty export still has a header.
pub trait CsvRecord: Serialize {
    const HEADERS: &'static [&'static str];
}

#[derive(Debug)]
pub enum CsvExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CsvExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvExportError::Io(err) => write!(f, "failed to write CSV output: {}", err),
            CsvExportError::Csv(err) => write!(f, "failed to encode CSV row: {}", err),
        }
    }
}

impl std::error::Error for CsvExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CsvExportError::Io(err) => Some(err),
            CsvExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CsvExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CsvExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Writes a BOM, the header row, then one line per row.
pub fn write_csv<W, T>(mut writer: W, rows: &[T]) -> Result<(), CsvExportError>
where
    W: Write,
    T: CsvRecord,
{
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(T::HEADERS)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_to_path<P, T>(path: P, rows: &[T]) -> Result<(), CsvExportError>
where
    P: AsRef<Path>,
    T: CsvRecord,
{
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), rows)
}
