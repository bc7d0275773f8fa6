use super::dataset::{Speech, SpeechTable, UNKNOWN_COMMITTEE, UNKNOWN_HOUSE, UNKNOWN_SPEAKER};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// Only this many committees are offered as filter choices.
pub const MAX_COMMITTEE_OPTIONS: usize = 20;

/// Row predicate built from the dashboard controls. Empty selections do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpeechFilter {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub houses: Vec<String>,
    pub committees: Vec<String>,
    pub speakers: Vec<String>,
    pub keywords: Vec<String>,
}

impl SpeechFilter {
    pub fn with_keywords(mut self, raw: &str) -> Self {
        self.keywords = raw.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some()
            || self.until.is_some()
            || !self.houses.is_empty()
            || !self.committees.is_empty()
            || !self.speakers.is_empty()
            || !self.keywords.is_empty()
    }

    pub fn apply<'a>(&self, table: &'a SpeechTable) -> Vec<&'a Speech> {
        if !self.is_active() {
            return table.speeches().iter().collect();
        }

        let lowered: Vec<String> = self.keywords.iter().map(|k| k.to_lowercase()).collect();
        table
            .speeches()
            .iter()
            .filter(|speech| self.matches_with(speech, &lowered))
            .collect()
    }

    fn matches_with(&self, speech: &Speech, lowered_keywords: &[String]) -> bool {
        if self.from.is_some() || self.until.is_some() {
            let Some(date) = speech.date else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.until.is_some_and(|until| date > until) {
                return false;
            }
        }

        if !self.houses.is_empty() && !self.houses.contains(&speech.house) {
            return false;
        }

        if !self.committees.is_empty() && !self.committees.contains(&speech.committee) {
            return false;
        }

        if !self.speakers.is_empty() && !self.speakers.contains(&speech.speaker) {
            return false;
        }

        if !lowered_keywords.is_empty() {
            let text = speech.text().to_lowercase();
            if !lowered_keywords.iter().any(|keyword| text.contains(keyword.as_str())) {
                return false;
            }
        }

        true
    }
}

/// Choices offered by the filter controls, derived from the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
    pub houses: Vec<String>,
    pub committees: Vec<String>,
    pub speakers: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &SpeechTable) -> Self {
        let speeches = table.speeches();
        let date_min = speeches.iter().filter_map(|speech| speech.date).min();
        let date_max = speeches.iter().filter_map(|speech| speech.date).max();

        let houses: BTreeSet<&str> = speeches
            .iter()
            .map(|speech| speech.house.as_str())
            .filter(|house| *house != UNKNOWN_HOUSE)
            .collect();
        let committees: BTreeSet<&str> = speeches
            .iter()
            .map(|speech| speech.committee.as_str())
            .filter(|committee| *committee != UNKNOWN_COMMITTEE)
            .collect();
        let speakers: BTreeSet<&str> = speeches
            .iter()
            .map(|speech| speech.speaker.as_str())
            .filter(|speaker| *speaker != UNKNOWN_SPEAKER)
            .collect();

        Self {
            date_min,
            date_max,
            houses: houses.into_iter().map(str::to_string).collect(),
            committees: committees
                .into_iter()
                .take(MAX_COMMITTEE_OPTIONS)
                .map(str::to_string)
                .collect(),
            speakers: speakers.into_iter().map(str::to_string).collect(),
        }
    }
}
