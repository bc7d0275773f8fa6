use super::charts;
use super::dataset::SpeechTable;
use super::filter::FilterOptions;
use super::query::DashboardQuery;
use super::report::{DashboardReport, ReportSettings};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

const TIMELINE_HEIGHT: u32 = 300;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parties: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Value>,
}

/// Everything one render of the dashboard needs.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub options: FilterOptions,
    pub query: DashboardQuery,
    pub report: DashboardReport,
    pub charts: ChartSpecs,
}

impl DashboardView {
    pub fn build(table: &SpeechTable, query: &DashboardQuery) -> Self {
        let filtered = query.filter.apply(table);
        let settings = ReportSettings {
            selected_term: query.term.clone(),
            max_items: query.display.max_items,
        };
        let report = DashboardReport::build(&filtered, &settings);
        let charts = chart_specs(&report, query.display.chart_height);

        debug!(
            total = table.len(),
            filtered = filtered.len(),
            keywords = report.top_keywords.len(),
            "dashboard view built"
        );

        Self {
            total_rows: table.len(),
            filtered_rows: filtered.len(),
            options: FilterOptions::from_table(table),
            query: query.clone(),
            report,
            charts,
        }
    }
}

fn chart_specs(report: &DashboardReport, height: u32) -> ChartSpecs {
    ChartSpecs {
        keywords: (!report.top_keywords.is_empty())
            .then(|| charts::keyword_bar(&report.top_keywords, height)),
        heatmap: (!report.heatmap.is_empty()).then(|| charts::heatmap(&report.heatmap)),
        speakers: (!report.speaker_ranking.is_empty())
            .then(|| charts::speaker_bar(&report.speaker_ranking, height)),
        parties: (!report.party_stats.is_empty())
            .then(|| charts::party_bar(&report.party_stats, report.party_layout, height)),
        timeline: (!report.timeline.is_empty())
            .then(|| charts::timeline(&report.timeline, TIMELINE_HEIGHT)),
    }
}
