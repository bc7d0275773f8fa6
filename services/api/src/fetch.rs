use chrono::NaiveDate;
use clap::Args;
use kokkai::config::AppConfig;
use kokkai::error::AppError;
use kokkai::fetch::{Endpoint, FetchOutcome, KeywordMode, SearchQuery, SpeechFetcher};
use kokkai::telemetry;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug)]
pub(crate) struct FetchArgs {
    /// First meeting date to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) from: NaiveDate,
    /// Last meeting date to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) until: NaiveDate,
    /// House to search; repeat for several. Defaults to both houses.
    #[arg(long)]
    pub(crate) house: Vec<String>,
    /// Exact committee name; repeat for several. Defaults to all committees.
    #[arg(long)]
    pub(crate) committee: Vec<String>,
    /// Space separated search terms
    #[arg(long, default_value = "")]
    pub(crate) keywords: String,
    /// How keywords combine: and, or, none
    #[arg(long, default_value = "or")]
    pub(crate) mode: KeywordMode,
    /// API endpoint: speech or meeting-list
    #[arg(long, default_value = "speech")]
    pub(crate) endpoint: Endpoint,
    /// Destination CSV file
    #[arg(long, default_value = "speeches.csv")]
    pub(crate) output: PathBuf,
}

impl FetchArgs {
    fn search_query(&self) -> SearchQuery {
        let mut query = SearchQuery::new(self.from, self.until).with_keywords(&self.keywords);
        query.houses = self.house.clone();
        query.committees = self.committee.clone();
        query.mode = self.mode;
        query.endpoint = self.endpoint;
        query
    }
}

pub(crate) async fn run_fetch(args: FetchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let query = args.search_query();
    info!(
        endpoint = %query.endpoint,
        from = %query.from,
        until = %query.until,
        houses = ?query.houses,
        committees = ?query.committees,
        keywords = ?query.keywords,
        "fetching from search API"
    );

    let fetcher = SpeechFetcher::from_config(&config.api)?;
    let outcome = fetcher.fetch(&query).await?;
    log_diagnostics(&outcome);

    if outcome.rows.is_empty() {
        warn!("no records matched; writing header-only CSV");
    }
    outcome.rows.write_csv(&args.output)?;

    println!(
        "Wrote {} rows to {}",
        outcome.rows.len(),
        args.output.display()
    );
    Ok(())
}

fn log_diagnostics(outcome: &FetchOutcome) {
    let diagnostics = &outcome.diagnostics;
    info!(
        pages = diagnostics.pages,
        rows = outcome.rows.len(),
        number_of_records = ?diagnostics.number_of_records,
        last_url = diagnostics.last_url.as_deref().unwrap_or("-"),
        last_params = ?diagnostics.last_params,
        "fetch finished"
    );
    if let Some(preview) = &diagnostics.empty_preview {
        warn!(%preview, "search API returned an empty page");
    }
}
