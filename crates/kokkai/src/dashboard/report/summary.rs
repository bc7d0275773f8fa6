use super::heatmap::{build_heatmap, HEATMAP_FOCUS_TERMS};
use super::views::{
    BarLayout, DailyVolume, KeywordDetail, KeywordExample, LatestSpeech, Metrics, PartyVolume,
    SpeakerVolume,
};
use crate::dashboard::dataset::Speech;
use crate::dashboard::keywords::{top_keywords, TermCount, TOP_KEYWORDS};
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

pub use super::views::DashboardReport;

const DETAIL_CANDIDATES: usize = 10;
const DETAIL_EXAMPLES: usize = 3;
const DETAIL_EXCERPT_CHARS: usize = 150;
const LATEST_SPEECHES: usize = 20;
const LATEST_EXCERPT_CHARS: usize = 200;
const PARTY_VERTICAL_MAX_BARS: usize = 8;
const PARTY_VERTICAL_MAX_LABEL: usize = 6;

#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub selected_term: Option<String>,
    pub max_items: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            selected_term: None,
            max_items: 20,
        }
    }
}

impl DashboardReport {
    pub fn build(speeches: &[&Speech], settings: &ReportSettings) -> Self {
        let top_keywords =
            top_keywords(speeches.iter().map(|speech| speech.text()), TOP_KEYWORDS);
        let keyword_detail =
            keyword_detail(speeches, &top_keywords, settings.selected_term.as_deref());
        let heatmap = build_heatmap(speeches, &top_keywords, HEATMAP_FOCUS_TERMS);
        let party_stats = party_stats(speeches);
        let party_layout = party_layout(&party_stats);

        Self {
            metrics: metrics(speeches),
            top_keywords,
            keyword_detail,
            heatmap,
            speaker_ranking: speaker_ranking(speeches, settings.max_items),
            party_stats,
            party_layout,
            timeline: timeline(speeches),
            latest: latest(speeches),
        }
    }
}

fn metrics(speeches: &[&Speech]) -> Metrics {
    let speakers: HashSet<&str> = speeches.iter().map(|s| s.speaker.as_str()).collect();
    let parties: HashSet<&str> = speeches.iter().map(|s| s.party.as_str()).collect();

    Metrics {
        speeches: speeches.len(),
        speakers: speakers.len(),
        characters: speeches.iter().map(|s| s.char_count).sum(),
        parties: parties.len(),
    }
}

fn keyword_detail(
    speeches: &[&Speech],
    top_keywords: &[TermCount],
    requested: Option<&str>,
) -> Option<KeywordDetail> {
    let candidates: Vec<String> = top_keywords
        .iter()
        .take(DETAIL_CANDIDATES)
        .map(|entry| entry.term.clone())
        .collect();

    let term = match requested {
        Some(requested) if candidates.iter().any(|c| c == requested) => requested.to_string(),
        _ => candidates.first()?.clone(),
    };

    let mut matching: Vec<&Speech> = speeches
        .iter()
        .copied()
        .filter(|speech| speech.text().contains(term.as_str()))
        .collect();
    sort_newest_first(&mut matching);

    let examples = matching
        .into_iter()
        .take(DETAIL_EXAMPLES)
        .map(|speech| KeywordExample {
            speaker: speech.speaker.clone(),
            party: speech.party.clone(),
            date: speech.date,
            excerpt: truncate_text(speech.text(), DETAIL_EXCERPT_CHARS),
        })
        .collect();

    Some(KeywordDetail {
        term,
        candidates,
        examples,
    })
}

fn speaker_ranking(speeches: &[&Speech], limit: usize) -> Vec<SpeakerVolume> {
    let mut totals: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for speech in speeches {
        *totals
            .entry((speech.speaker.as_str(), speech.party.as_str()))
            .or_default() += speech.char_count;
    }

    let mut ranking: Vec<SpeakerVolume> = totals
        .into_iter()
        .map(|((speaker, party), char_count)| SpeakerVolume {
            speaker: speaker.to_string(),
            party: party.to_string(),
            char_count,
        })
        .collect();
    ranking.sort_by_key(|entry| Reverse(entry.char_count));
    ranking.truncate(limit);
    ranking
}

/// Rows without speech text still add characters (zero) but are not counted
/// as speeches.
fn party_stats(speeches: &[&Speech]) -> Vec<PartyVolume> {
    let mut totals: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for speech in speeches {
        let entry = totals.entry(speech.party.as_str()).or_default();
        if speech.speech.is_some() {
            entry.0 += 1;
        }
        entry.1 += speech.char_count;
    }

    let mut stats: Vec<PartyVolume> = totals
        .into_iter()
        .map(|(party, (speech_count, char_count))| PartyVolume {
            party: party.to_string(),
            speech_count,
            char_count,
        })
        .collect();
    stats.sort_by_key(|entry| Reverse(entry.speech_count));
    stats
}

fn party_layout(stats: &[PartyVolume]) -> BarLayout {
    let long_label = stats
        .iter()
        .any(|entry| entry.party.chars().count() > PARTY_VERTICAL_MAX_LABEL);
    if stats.len() > PARTY_VERTICAL_MAX_BARS || long_label {
        BarLayout::Horizontal
    } else {
        BarLayout::Vertical
    }
}

fn timeline(speeches: &[&Speech]) -> Vec<DailyVolume> {
    let mut days: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for speech in speeches {
        let Some(date) = speech.date else {
            continue;
        };
        let entry = days.entry(date).or_default();
        if speech.speech.is_some() {
            entry.0 += 1;
        }
        entry.1 += speech.char_count;
    }

    days.into_iter()
        .map(|(date, (speech_count, char_count))| DailyVolume {
            date,
            speech_count,
            char_count,
        })
        .collect()
}

fn latest(speeches: &[&Speech]) -> Vec<LatestSpeech> {
    let mut ordered: Vec<&Speech> = speeches.to_vec();
    sort_newest_first(&mut ordered);

    ordered
        .into_iter()
        .take(LATEST_SPEECHES)
        .map(|speech| LatestSpeech {
            date: speech.date,
            house: speech.house.clone(),
            committee: speech.committee.clone(),
            speaker: speech.speaker.clone(),
            party: speech.party.clone(),
            speech: truncate_text(speech.text(), LATEST_EXCERPT_CHARS),
        })
        .collect()
}

/// Newest first, undated rows last, original order among equals.
fn sort_newest_first(speeches: &mut [&Speech]) {
    speeches.sort_by_key(|speech| (speech.date.is_none(), speech.date.map(Reverse)));
}

/// Cuts to `max_chars` characters and marks the cut with `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
