use crate::dashboard::keywords::TermCount;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub speeches: usize,
    pub speakers: usize,
    pub characters: usize,
    pub parties: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordExample {
    pub speaker: String,
    pub party: String,
    pub date: Option<NaiveDate>,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordDetail {
    pub term: String,
    pub candidates: Vec<String>,
    pub examples: Vec<KeywordExample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub party: String,
    pub term: String,
    pub count: usize,
}

/// Party × term matrix, zero-filled, with both axes in descending total order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Heatmap {
    pub terms: Vec<String>,
    pub parties: Vec<String>,
    pub cells: Vec<HeatmapCell>,
}

impl Heatmap {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakerVolume {
    pub speaker: String,
    pub party: String,
    pub char_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyVolume {
    pub party: String,
    pub speech_count: usize,
    pub char_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarLayout {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub speech_count: usize,
    pub char_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestSpeech {
    pub date: Option<NaiveDate>,
    pub house: String,
    pub committee: String,
    pub speaker: String,
    pub party: String,
    pub speech: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub metrics: Metrics,
    pub top_keywords: Vec<TermCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_detail: Option<KeywordDetail>,
    pub heatmap: Heatmap,
    pub speaker_ranking: Vec<SpeakerVolume>,
    pub party_stats: Vec<PartyVolume>,
    pub party_layout: BarLayout,
    pub timeline: Vec<DailyVolume>,
    pub latest: Vec<LatestSpeech>,
}
