use super::dataset::parse_date;
use super::filter::SpeechFilter;
use serde::Serialize;
use std::fmt;

pub const CHART_HEIGHT_RANGE: (u32, u32) = (300, 800);
pub const CHART_HEIGHT_STEP: u32 = 50;
pub const MAX_ITEMS_RANGE: (usize, usize) = (10, 50);
pub const MAX_ITEMS_STEP: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidDate { field: &'static str, value: String },
    InvalidNumber { field: &'static str, value: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::InvalidDate { field, value } => {
                write!(f, "'{value}' is not a valid date for {field} (expected YYYY-MM-DD)")
            }
            QueryError::InvalidNumber { field, value } => {
                write!(f, "'{value}' is not a valid number for {field}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Chart and panel options from the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplaySettings {
    pub chart_height: u32,
    pub max_items: usize,
    pub show_debug: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            chart_height: 500,
            max_items: 20,
            show_debug: false,
        }
    }
}

/// Everything the dashboard page accepts from its query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardQuery {
    pub filter: SpeechFilter,
    pub term: Option<String>,
    pub display: DisplaySettings,
}

impl DashboardQuery {
    /// Reads `from`, `until`, repeated `house`/`committee`/`speaker`, `q`, `term`,
    /// `chart_height`, `max_items` and `debug`. Blank values are ignored.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> Result<Self, QueryError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }

            match key.as_ref() {
                "from" => query.filter.from = Some(date_field("from", value)?),
                "until" => query.filter.until = Some(date_field("until", value)?),
                "house" => push_unique(&mut query.filter.houses, value),
                "committee" => push_unique(&mut query.filter.committees, value),
                "speaker" => push_unique(&mut query.filter.speakers, value),
                "q" => query
                    .filter
                    .keywords
                    .extend(value.split_whitespace().map(str::to_string)),
                "term" => query.term = Some(value.to_string()),
                "chart_height" => {
                    let height = number_field::<u64>("chart_height", value)?;
                    query.display.chart_height = snap(
                        height,
                        CHART_HEIGHT_RANGE.0 as u64,
                        CHART_HEIGHT_RANGE.1 as u64,
                        CHART_HEIGHT_STEP as u64,
                    ) as u32;
                }
                "max_items" => {
                    let items = number_field::<u64>("max_items", value)?;
                    query.display.max_items = snap(
                        items,
                        MAX_ITEMS_RANGE.0 as u64,
                        MAX_ITEMS_RANGE.1 as u64,
                        MAX_ITEMS_STEP as u64,
                    ) as usize;
                }
                "debug" => query.display.show_debug = matches!(value, "1" | "true" | "on"),
                _ => {}
            }
        }

        Ok(query)
    }
}

fn date_field(field: &'static str, value: &str) -> Result<chrono::NaiveDate, QueryError> {
    parse_date(value).ok_or_else(|| QueryError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn number_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, QueryError> {
    value.parse().map_err(|_| QueryError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn push_unique(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|existing| existing == value) {
        values.push(value.to_string());
    }
}

/// Clamps into `[min, max]` and rounds down onto the slider's step grid.
fn snap(value: u64, min: u64, max: u64, step: u64) -> u64 {
    let clamped = value.clamp(min, max);
    min + (clamped - min) / step * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_repeated_and_blank_parameters() {
        let pairs = [
            ("from", "2025-01-23"),
            ("until", ""),
            ("house", "衆議院"),
            ("house", "参議院"),
            ("house", "衆議院"),
            ("committee", "予算委員会"),
            ("speaker", "石破茂"),
            ("speaker", "野田佳彦"),
            ("q", "消費税　税制"),
            ("term", "消費税"),
            ("debug", "on"),
            ("utm_source", "ignored"),
        ];

        let query = DashboardQuery::from_pairs(&pairs).expect("query parses");
        assert_eq!(query.filter.from, NaiveDate::from_ymd_opt(2025, 1, 23));
        assert!(query.filter.until.is_none());
        assert_eq!(query.filter.houses, vec!["衆議院", "参議院"]);
        assert_eq!(query.filter.committees, vec!["予算委員会"]);
        assert_eq!(query.filter.speakers, vec!["石破茂", "野田佳彦"]);
        assert_eq!(query.filter.keywords, vec!["消費税", "税制"]);
        assert_eq!(query.term.as_deref(), Some("消費税"));
        assert!(query.display.show_debug);
        assert_eq!(query.display.chart_height, 500);
    }

    #[test]
    fn display_settings_snap_to_slider_grid() {
        let pairs = [("chart_height", "1234"), ("max_items", "23")];
        let query = DashboardQuery::from_pairs(&pairs).expect("query parses");
        assert_eq!(query.display.chart_height, 800);
        assert_eq!(query.display.max_items, 20);

        let pairs = [("chart_height", "10"), ("max_items", "49")];
        let query = DashboardQuery::from_pairs(&pairs).expect("query parses");
        assert_eq!(query.display.chart_height, 300);
        assert_eq!(query.display.max_items, 45);
    }

    #[test]
    fn rejects_malformed_values() {
        let error = DashboardQuery::from_pairs(&[("from", "yesterday")]).expect_err("bad date");
        assert_eq!(
            error,
            QueryError::InvalidDate {
                field: "from",
                value: "yesterday".to_string()
            }
        );

        let error = DashboardQuery::from_pairs(&[("max_items", "many")]).expect_err("bad number");
        assert!(matches!(error, QueryError::InvalidNumber { field: "max_items", .. }));
    }
}
