use crate::speeches::{SpeechRow, UTF8_BOM};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

pub const UNKNOWN_PARTY: &str = "政党不明";
pub const UNKNOWN_HOUSE: &str = "院不明";
pub const UNKNOWN_COMMITTEE: &str = "委員会不明";
pub const UNKNOWN_SPEAKER: &str = "発言者不明";

/// Columns a speech CSV cannot be loaded without.
pub const REQUIRED_COLUMNS: [&str; 3] = ["date", "speaker", "speech"];

#[derive(Debug)]
pub enum DatasetError {
    Missing { path: PathBuf },
    Io(std::io::Error),
    Csv(csv::Error),
    NoHeader,
    MissingColumns(Vec<String>),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Missing { path } => {
                write!(f, "speech CSV not found at {}", path.display())
            }
            DatasetError::Io(err) => write!(f, "failed to read speech CSV: {}", err),
            DatasetError::Csv(err) => write!(f, "malformed speech CSV: {}", err),
            DatasetError::NoHeader => write!(f, "speech CSV has no header row"),
            DatasetError::MissingColumns(columns) => {
                write!(f, "speech CSV lacks required columns: {}", columns.join(", "))
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(err) => Some(err),
            DatasetError::Csv(err) => Some(err),
            DatasetError::Missing { .. }
            | DatasetError::NoHeader
            | DatasetError::MissingColumns(_) => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A speech row after display normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Speech {
    pub speech_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub house: String,
    pub committee: String,
    pub speaker: String,
    pub party: String,
    pub speech: Option<String>,
    pub char_count: usize,
    pub speech_url: Option<String>,
    pub meeting_url: Option<String>,
    pub issue_id: Option<String>,
    pub bill_id: Option<String>,
}

impl Speech {
    pub fn from_row(row: SpeechRow) -> Self {
        let char_count = row.speech.as_deref().map_or(0, |text| text.chars().count());

        Self {
            speech_id: row.speech_id,
            date: row.date.as_deref().and_then(parse_date),
            house: or_placeholder(row.name_of_house, UNKNOWN_HOUSE),
            committee: or_placeholder(row.name_of_meeting, UNKNOWN_COMMITTEE),
            speaker: or_placeholder(row.speaker, UNKNOWN_SPEAKER),
            party: or_placeholder(row.speaker_group, UNKNOWN_PARTY),
            speech: row.speech,
            char_count,
            speech_url: row.speech_url,
            meeting_url: row.meeting_url,
            issue_id: row.issue_id,
            bill_id: row.bill_id,
        }
    }

    /// Speech text, empty when the row had none.
    pub fn text(&self) -> &str {
        self.speech.as_deref().unwrap_or("")
    }
}

fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

/// Lenient date parsing: unreadable dates become `None` instead of failing the load.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// The in-memory speech table the dashboard filters and aggregates.
#[derive(Debug, Clone, Default)]
pub struct SpeechTable {
    speeches: Vec<Speech>,
}

impl SpeechTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => DatasetError::Missing {
                path: path.to_path_buf(),
            },
            _ => DatasetError::Io(err),
        })?;

        let table = Self::from_reader(file)?;
        info!(path = %path.display(), rows = table.len(), "speech table loaded");
        Ok(table)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, DatasetError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let mut csv_reader = csv::ReaderBuilder::new().from_reader(body);
        let headers = csv_reader.headers()?;
        if headers.is_empty() {
            return Err(DatasetError::NoHeader);
        }

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !headers.iter().any(|header| header.trim() == **column))
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns(missing));
        }

        let mut rows = Vec::new();
        for record in csv_reader.deserialize::<SpeechRow>() {
            rows.push(record?);
        }

        Ok(Self::from_rows(rows))
    }

    pub fn from_rows(rows: Vec<SpeechRow>) -> Self {
        Self {
            speeches: rows.into_iter().map(Speech::from_row).collect(),
        }
    }

    pub fn speeches(&self) -> &[Speech] {
        &self.speeches
    }

    pub fn len(&self) -> usize {
        self.speeches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeches.is_empty()
    }
}
