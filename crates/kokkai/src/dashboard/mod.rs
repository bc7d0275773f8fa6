//! Loading, filtering and summarizing a speech CSV, and serving the result.

pub mod charts;
mod dataset;
mod filter;
pub mod keywords;
mod page;
mod query;
pub mod report;
mod router;
mod view;

pub use dataset::{
    parse_date, DatasetError, Speech, SpeechTable, REQUIRED_COLUMNS, UNKNOWN_COMMITTEE,
    UNKNOWN_HOUSE, UNKNOWN_PARTY, UNKNOWN_SPEAKER,
};
pub use filter::{FilterOptions, SpeechFilter, MAX_COMMITTEE_OPTIONS};
pub use page::render_page;
pub use query::{DashboardQuery, DisplaySettings, QueryError};
pub use router::dashboard_router;
pub use view::{ChartSpecs, DashboardView};
