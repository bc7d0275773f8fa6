use super::params::{build_params, term_sets, Endpoint, PageRequest, SearchQuery, MAX_PAGE_SIZE};
use super::records::{self, meeting_row, number_of_records, preview, speech_row};
use super::FetchError;
use crate::config::ApiConfig;
use crate::speeches::{write_csv_to_path, CsvExportError, MeetingRow, SpeechRow};
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use tracing::{debug, info, warn};

/// A decoded response page plus the fully expanded URL that produced it.
#[derive(Debug, Clone)]
pub struct ApiPage {
    pub url: String,
    pub body: Value,
}

/// Seam between pagination logic and the network.
pub trait SearchTransport {
    fn get(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, String)],
    ) -> impl Future<Output = Result<ApiPage, FetchError>> + Send;
}

/// reqwest-backed transport for the public search API.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl SearchTransport for HttpTransport {
    async fn get(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, String)],
    ) -> Result<ApiPage, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        let response = self
            .client
            .get(&url)
            .query(params)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let body: Value = response.json().await?;
        Ok(ApiPage { url, body })
    }
}

/// Rows gathered by one run, typed by endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedRows {
    Speeches(Vec<SpeechRow>),
    Meetings(Vec<MeetingRow>),
}

impl FetchedRows {
    pub fn len(&self) -> usize {
        match self {
            Self::Speeches(rows) => rows.len(),
            Self::Meetings(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), CsvExportError> {
        match self {
            Self::Speeches(rows) => write_csv_to_path(path, rows),
            Self::Meetings(rows) => write_csv_to_path(path, rows),
        }
    }
}

/// What the last request looked like, for operators chasing an empty result.
#[derive(Debug, Clone, Default)]
pub struct FetchDiagnostics {
    pub pages: usize,
    pub last_url: Option<String>,
    pub last_params: Vec<(String, String)>,
    pub number_of_records: Option<u64>,
    pub empty_preview: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub rows: FetchedRows,
    pub diagnostics: FetchDiagnostics,
}

pub struct SpeechFetcher<T> {
    transport: T,
    page_size: u32,
    pause_between_pages: bool,
}

impl SpeechFetcher<HttpTransport> {
    pub fn from_config(config: &ApiConfig) -> Result<Self, FetchError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: SearchTransport> SpeechFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            page_size: MAX_PAGE_SIZE,
            pause_between_pages: true,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn without_pauses(mut self) -> Self {
        self.pause_between_pages = false;
        self
    }

    /// Runs every house × committee × term-set search to exhaustion, sequentially.
    pub async fn fetch(&self, query: &SearchQuery) -> Result<FetchOutcome, FetchError> {
        if query.from > query.until {
            return Err(FetchError::InvalidRange {
                from: query.from,
                until: query.until,
            });
        }

        // meeting_list does not support `any`
        let groups = match query.endpoint {
            Endpoint::Speech => term_sets(query.mode, &query.keywords),
            Endpoint::MeetingList => vec![Vec::new()],
        };

        let mut diagnostics = FetchDiagnostics::default();
        let mut collected: Vec<Value> = Vec::new();

        for house in query.houses_or_default() {
            for committee in query.committees_or_all() {
                for terms in &groups {
                    let request = PageRequest {
                        from: query.from,
                        until: query.until,
                        house: &house,
                        committee: committee.as_deref(),
                        terms,
                        start: 1,
                        maximum: self.page_size,
                    };
                    self.paginate(query.endpoint, request, &mut collected, &mut diagnostics)
                        .await?;
                }
            }
        }

        let rows = match query.endpoint {
            Endpoint::Speech => {
                let rows: Vec<SpeechRow> = collected.iter().map(speech_row).collect();
                FetchedRows::Speeches(dedupe_by_speech_id(rows))
            }
            Endpoint::MeetingList => {
                FetchedRows::Meetings(collected.iter().map(meeting_row).collect())
            }
        };

        info!(
            endpoint = %query.endpoint,
            rows = rows.len(),
            pages = diagnostics.pages,
            "fetch finished"
        );

        Ok(FetchOutcome { rows, diagnostics })
    }

    async fn paginate(
        &self,
        endpoint: Endpoint,
        mut request: PageRequest<'_>,
        collected: &mut Vec<Value>,
        diagnostics: &mut FetchDiagnostics,
    ) -> Result<(), FetchError> {
        loop {
            let params = build_params(&request);
            let page = self.transport.get(endpoint, &params).await?;

            diagnostics.pages += 1;
            diagnostics.last_url = Some(page.url.clone());
            diagnostics.last_params = params
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect();
            diagnostics.number_of_records = number_of_records(&page.body);

            let page_records = records::records(&page.body, endpoint.records_key());
            debug!(
                url = %page.url,
                start = request.start,
                returned = page_records.len(),
                total = ?diagnostics.number_of_records,
                "page received"
            );

            if page_records.is_empty() {
                diagnostics.empty_preview = Some(preview(&page.body));
                break;
            }

            let returned = page_records.len();
            collected.extend(page_records.iter().cloned());

            if returned < request.maximum as usize {
                break;
            }
            request.start += returned as u32;

            if self.pause_between_pages {
                tokio::time::sleep(endpoint.page_delay()).await;
            }
        }

        Ok(())
    }
}

/// Keeps the first row for each `speech_id`. OR searches overlap, so this is
/// where the per-term result sets merge. Rows without an id are all kept.
pub fn dedupe_by_speech_id(rows: Vec<SpeechRow>) -> Vec<SpeechRow> {
    let mut seen = HashSet::new();
    let before = rows.len();
    let rows: Vec<SpeechRow> = rows
        .into_iter()
        .filter(|row| match &row.speech_id {
            Some(id) => seen.insert(id.clone()),
            None => true,
        })
        .collect();

    if rows.len() < before {
        warn!(dropped = before - rows.len(), "dropped duplicate speech records");
    }
    rows
}
