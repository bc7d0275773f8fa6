//! Flat row schemas shared by the fetcher (which writes them) and the
//! dashboard (which reads them back).

mod export;
mod record;

pub use export::{write_csv, write_csv_to_path, CsvExportError, CsvRecord, UTF8_BOM};
pub use record::{MeetingRow, SpeechRow};
