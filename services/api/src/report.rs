use chrono::NaiveDate;
use clap::Args;
use kokkai::config::AppConfig;
use kokkai::dashboard::report::views::{DashboardReport, PartyVolume};
use kokkai::dashboard::report::ReportSettings;
use kokkai::dashboard::{SpeechFilter, SpeechTable};
use kokkai::error::AppError;
use std::path::PathBuf;

const REPORT_PARTIES: usize = 10;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Speech CSV to summarize (defaults to KOKKAI_DATA_PATH)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Earliest date to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// Latest date to include (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) until: Option<NaiveDate>,
    /// Restrict to a house; repeat for several
    #[arg(long)]
    pub(crate) house: Vec<String>,
    /// Restrict to a committee; repeat for several
    #[arg(long)]
    pub(crate) committee: Vec<String>,
    /// Restrict to a speaker; repeat for several
    #[arg(long)]
    pub(crate) speaker: Vec<String>,
    /// Space separated terms; a speech matches when it contains any of them
    #[arg(long, default_value = "")]
    pub(crate) keywords: String,
}

impl ReportArgs {
    fn filter(&self) -> SpeechFilter {
        SpeechFilter {
            from: self.from,
            until: self.until,
            houses: self.house.clone(),
            committees: self.committee.clone(),
            speakers: self.speaker.clone(),
            ..SpeechFilter::default()
        }
        .with_keywords(&self.keywords)
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let path = match &args.data {
        Some(path) => path.clone(),
        None => AppConfig::load()?.dataset.path,
    };

    let table = SpeechTable::from_path(&path)?;
    let filtered = args.filter().apply(&table);
    let report = DashboardReport::build(&filtered, &ReportSettings::default());

    println!("{}", render_report(&path, table.len(), &report));
    Ok(())
}

fn render_report(path: &std::path::Path, total: usize, report: &DashboardReport) -> String {
    let metrics = &report.metrics;
    let mut lines = vec![
        format!("Speech report for {}", path.display()),
        format!("  rows loaded:      {total}"),
        format!("  speeches matched: {}", metrics.speeches),
        format!("  speakers:         {}", metrics.speakers),
        format!("  characters:       {}", metrics.characters),
        format!("  parties:          {}", metrics.parties),
    ];

    if metrics.speeches == 0 {
        lines.push("\nNo speeches match the selected filters.".to_string());
        return lines.join("\n");
    }

    lines.push("\nTop keywords".to_string());
    if report.top_keywords.is_empty() {
        lines.push("  (none extracted)".to_string());
    }
    for (rank, keyword) in report.top_keywords.iter().enumerate() {
        lines.push(format!("  {:>2}. {} ({})", rank + 1, keyword.term, keyword.count));
    }

    lines.push("\nSpeeches by party".to_string());
    lines.extend(
        report
            .party_stats
            .iter()
            .take(REPORT_PARTIES)
            .map(party_line),
    );

    lines.join("\n")
}

fn party_line(party: &PartyVolume) -> String {
    format!(
        "  {}: {} speeches, {} characters",
        party.party, party.speech_count, party.char_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokkai::speeches::SpeechRow;
    use std::path::Path;

    fn table() -> SpeechTable {
        let rows = [
            ("2025-01-20", "衆議院", "自由民主党", "防衛力の抜本的強化について"),
            ("2025-02-12", "参議院", "立憲民主党", "物価高騰対策と防衛費"),
        ]
        .into_iter()
        .map(|(date, house, party, speech)| SpeechRow {
            date: Some(date.to_string()),
            name_of_house: Some(house.to_string()),
            speaker: Some(format!("{party}議員")),
            speaker_group: Some(party.to_string()),
            speech: Some(speech.to_string()),
            ..SpeechRow::default()
        })
        .collect();
        SpeechTable::from_rows(rows)
    }

    #[test]
    fn filter_combines_flags() {
        let args = ReportArgs {
            house: vec!["参議院".to_string()],
            keywords: "防衛".to_string(),
            ..ReportArgs::default()
        };
        let table = table();
        let filtered = args.filter().apply(&table);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].party, "立憲民主党");
    }

    #[test]
    fn speaker_flag_narrows_rows() {
        let args = ReportArgs {
            speaker: vec!["自由民主党議員".to_string()],
            ..ReportArgs::default()
        };
        let table = table();
        let filtered = args.filter().apply(&table);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].house, "衆議院");
    }

    #[test]
    fn report_lists_metrics_keywords_and_parties() {
        let table = table();
        let filtered = SpeechFilter::default().apply(&table);
        let report = DashboardReport::build(&filtered, &ReportSettings::default());
        let text = render_report(Path::new("speeches.csv"), table.len(), &report);

        assert!(text.contains("speeches matched: 2"));
        assert!(text.contains("Top keywords"));
        assert!(text.contains("自由民主党: 1 speeches"));
    }

    #[test]
    fn empty_selection_is_reported() {
        let table = table();
        let filter = SpeechFilter {
            houses: vec!["両院協議会".to_string()],
            ..SpeechFilter::default()
        };
        let report = DashboardReport::build(&filter.apply(&table), &ReportSettings::default());
        let text = render_report(Path::new("speeches.csv"), table.len(), &report);

        assert!(text.contains("No speeches match"));
    }
}
