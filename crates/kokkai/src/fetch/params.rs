use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Sentinel house name meaning "do not restrict by house".
pub const BOTH_HOUSES: &str = "両院";

/// Largest page the search API serves.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// One record per utterance.
    #[default]
    Speech,
    /// One record per meeting, with only a handful of speech links.
    MeetingList,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Speech => "speech",
            Self::MeetingList => "meeting_list",
        }
    }

    /// Courtesy pause between consecutive pages.
    pub const fn page_delay(self) -> Duration {
        match self {
            Self::Speech => Duration::from_millis(1000),
            Self::MeetingList => Duration::from_millis(500),
        }
    }

    pub(crate) const fn records_key(self) -> &'static str {
        match self {
            Self::Speech => "speechRecord",
            Self::MeetingList => "meetingRecord",
        }
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "speech" => Ok(Self::Speech),
            "meeting-list" | "meeting" => Ok(Self::MeetingList),
            other => Err(format!(
                "unknown endpoint '{other}' (expected speech or meeting-list)"
            )),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// How multiple keywords combine in a speech search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordMode {
    /// Every term must appear; one query for all terms.
    And,
    /// Any term may appear; one query per term, merged afterwards.
    #[default]
    Or,
    /// Keywords are ignored entirely.
    Off,
}

impl FromStr for KeywordMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "and" | "all" => Ok(Self::And),
            "or" | "any" => Ok(Self::Or),
            "none" | "off" => Ok(Self::Off),
            other => Err(format!(
                "unknown keyword mode '{other}' (expected and, or, or none)"
            )),
        }
    }
}

/// Everything needed to plan a fetch run.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub from: NaiveDate,
    pub until: NaiveDate,
    pub houses: Vec<String>,
    pub committees: Vec<String>,
    pub keywords: Vec<String>,
    pub mode: KeywordMode,
    pub endpoint: Endpoint,
}

impl SearchQuery {
    pub fn new(from: NaiveDate, until: NaiveDate) -> Self {
        Self {
            from,
            until,
            houses: Vec::new(),
            committees: Vec::new(),
            keywords: Vec::new(),
            mode: KeywordMode::default(),
            endpoint: Endpoint::default(),
        }
    }

    /// Splits a space separated keyword string, full-width spaces included.
    pub fn with_keywords(mut self, raw: &str) -> Self {
        self.keywords = raw.split_whitespace().map(str::to_string).collect();
        self
    }

    pub(crate) fn houses_or_default(&self) -> Vec<String> {
        if self.houses.is_empty() {
            vec![BOTH_HOUSES.to_string()]
        } else {
            self.houses.clone()
        }
    }

    pub(crate) fn committees_or_all(&self) -> Vec<Option<String>> {
        if self.committees.is_empty() {
            vec![None]
        } else {
            self.committees.iter().cloned().map(Some).collect()
        }
    }
}

/// Groups keywords into the term sets that each become one paginated search.
pub fn term_sets(mode: KeywordMode, terms: &[String]) -> Vec<Vec<String>> {
    let terms: Vec<String> = terms
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect();

    match mode {
        _ if terms.is_empty() => vec![Vec::new()],
        KeywordMode::Off => vec![Vec::new()],
        KeywordMode::And => vec![terms],
        KeywordMode::Or => terms.into_iter().map(|term| vec![term]).collect(),
    }
}

/// One page worth of query parameters, in the order the API documents them.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub from: NaiveDate,
    pub until: NaiveDate,
    pub house: &'a str,
    pub committee: Option<&'a str>,
    pub terms: &'a [String],
    pub start: u32,
    pub maximum: u32,
}

pub fn build_params(request: &PageRequest<'_>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("recordPacking", "json".to_string()),
        ("maximumRecords", request.maximum.to_string()),
        ("startRecord", request.start.to_string()),
        ("from", request.from.format("%Y-%m-%d").to_string()),
        ("until", request.until.format("%Y-%m-%d").to_string()),
    ];

    if let Some(committee) = request.committee.filter(|name| !name.trim().is_empty()) {
        params.push(("nameOfMeeting", committee.to_string()));
    }
    if !request.house.is_empty() && request.house != BOTH_HOUSES {
        params.push(("nameOfHouse", request.house.to_string()));
    }
    if !request.terms.is_empty() {
        params.push(("any", request.terms.join(" ")));
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn terms(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|term| term.to_string()).collect()
    }

    #[test]
    fn params_skip_house_for_both_houses_and_omit_empty_filters() {
        let request = PageRequest {
            from: date(2025, 1, 23),
            until: date(2025, 8, 5),
            house: BOTH_HOUSES,
            committee: None,
            terms: &[],
            start: 1,
            maximum: MAX_PAGE_SIZE,
        };

        let params = build_params(&request);
        assert_eq!(
            params,
            vec![
                ("recordPacking", "json".to_string()),
                ("maximumRecords", "100".to_string()),
                ("startRecord", "1".to_string()),
                ("from", "2025-01-23".to_string()),
                ("until", "2025-08-05".to_string()),
            ]
        );
    }

    #[test]
    fn params_include_house_committee_and_joined_terms() {
        let keywords = terms(&["消費税", "税制"]);
        let request = PageRequest {
            from: date(2024, 1, 1),
            until: date(2024, 12, 31),
            house: "衆議院",
            committee: Some("予算委員会"),
            terms: &keywords,
            start: 101,
            maximum: 100,
        };

        let params = build_params(&request);
        assert!(params.contains(&("nameOfHouse", "衆議院".to_string())));
        assert!(params.contains(&("nameOfMeeting", "予算委員会".to_string())));
        assert!(params.contains(&("any", "消費税 税制".to_string())));
        assert!(params.contains(&("startRecord", "101".to_string())));
    }

    #[test]
    fn term_sets_follow_keyword_mode() {
        let keywords = terms(&["消費税", "税制", "外国"]);
        assert_eq!(term_sets(KeywordMode::And, &keywords), vec![keywords.clone()]);
        assert_eq!(
            term_sets(KeywordMode::Or, &keywords),
            vec![terms(&["消費税"]), terms(&["税制"]), terms(&["外国"])]
        );
        assert_eq!(
            term_sets(KeywordMode::Off, &keywords),
            vec![Vec::<String>::new()]
        );
        assert_eq!(
            term_sets(KeywordMode::Or, &terms(&["  "])),
            vec![Vec::<String>::new()]
        );
    }

    #[test]
    fn keyword_string_splits_on_full_width_spaces() {
        let query = SearchQuery::new(date(2024, 1, 1), date(2024, 2, 1))
            .with_keywords("消費税\u{3000}税制  外国");
        assert_eq!(query.keywords, terms(&["消費税", "税制", "外国"]));
        assert_eq!(query.houses_or_default(), vec![BOTH_HOUSES.to_string()]);
        assert_eq!(query.committees_or_all(), vec![None]);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("meeting_list".parse::<Endpoint>(), Ok(Endpoint::MeetingList));
        assert_eq!("Speech".parse::<Endpoint>(), Ok(Endpoint::Speech));
        assert!("minutes".parse::<Endpoint>().is_err());
        assert_eq!("AND".parse::<KeywordMode>(), Ok(KeywordMode::And));
        assert_eq!("none".parse::<KeywordMode>(), Ok(KeywordMode::Off));
    }
}
