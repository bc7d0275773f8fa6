//! Client for the National Diet Library's speech search API.

mod client;
mod params;
mod records;

use chrono::NaiveDate;
use thiserror::Error;

pub use client::{
    dedupe_by_speech_id, ApiPage, FetchDiagnostics, FetchOutcome, FetchedRows, HttpTransport,
    SearchTransport, SpeechFetcher,
};
pub use params::{
    build_params, term_sets, Endpoint, KeywordMode, PageRequest, SearchQuery, BOTH_HOUSES,
    MAX_PAGE_SIZE,
};
pub use records::{meeting_rows, number_of_records, speech_rows, PREVIEW_CHARS};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search API returned {status} for {url}: {body}")]
    Server {
        status: u16,
        url: String,
        body: String,
    },
    #[error("search window starts {from} but ends {until}")]
    InvalidRange { from: NaiveDate, until: NaiveDate },
}
