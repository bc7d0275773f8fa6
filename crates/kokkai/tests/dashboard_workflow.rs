use chrono::NaiveDate;
use kokkai::dashboard::{
    DashboardQuery, DashboardView, Speech, SpeechFilter, SpeechTable, UNKNOWN_HOUSE,
    UNKNOWN_PARTY,
};
use kokkai::speeches::{write_csv, SpeechRow};
use std::io::Cursor;
use std::path::PathBuf;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/speeches_sample.csv")
}

fn sample_table() -> SpeechTable {
    SpeechTable::from_path(sample_path()).expect("sample dataset loads")
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

fn ids(speeches: &[&Speech]) -> Vec<String> {
    speeches
        .iter()
        .filter_map(|speech| speech.speech_id.clone())
        .collect()
}

#[test]
fn sample_dataset_loads_with_placeholders() {
    let table = sample_table();
    assert_eq!(table.len(), 30);

    let blank = table
        .speeches()
        .iter()
        .find(|speech| speech.text().is_empty())
        .expect("sample carries a row without text");
    assert_eq!(blank.house, UNKNOWN_HOUSE);
    assert_eq!(blank.party, UNKNOWN_PARTY);
    assert_eq!(blank.char_count, 0);
}

#[test]
fn filters_narrow_to_exactly_the_matching_rows() {
    let table = sample_table();
    let filter = SpeechFilter {
        from: Some(date("2025-02-01")),
        until: Some(date("2025-02-28")),
        houses: vec!["衆議院".to_string()],
        committees: vec!["予算委員会".to_string()],
        ..SpeechFilter::default()
    };

    let filtered = filter.apply(&table);
    assert_eq!(filtered.len(), 5);

    let expected: Vec<&Speech> = table
        .speeches()
        .iter()
        .filter(|speech| {
            speech
                .date
                .is_some_and(|day| day >= date("2025-02-01") && day <= date("2025-02-28"))
                && speech.house == "衆議院"
                && speech.committee == "予算委員会"
        })
        .collect();
    assert_eq!(ids(&filtered), ids(&expected));
}

#[test]
fn single_predicates_match_hand_counts() {
    let table = sample_table();

    let upper_house = SpeechFilter {
        houses: vec!["参議院".to_string()],
        ..SpeechFilter::default()
    };
    assert_eq!(upper_house.apply(&table).len(), 10);

    let february = SpeechFilter {
        from: Some(date("2025-02-01")),
        until: Some(date("2025-02-28")),
        ..SpeechFilter::default()
    };
    assert_eq!(february.apply(&table).len(), 14);

    let prime_minister = SpeechFilter {
        speakers: vec!["石破茂".to_string()],
        ..SpeechFilter::default()
    };
    assert_eq!(prime_minister.apply(&table).len(), 1);

    let prices = SpeechFilter::default().with_keywords("物価");
    let matched = prices.apply(&table);
    assert_eq!(matched.len(), 4);
    assert!(matched.iter().all(|speech| speech.text().contains("物価")));
}

#[test]
fn exported_rows_load_back_into_the_dashboard() {
    let rows = vec![
        SpeechRow {
            speech_id: Some("a".to_string()),
            date: Some("2025-05-01".to_string()),
            name_of_house: Some("衆議院".to_string()),
            name_of_meeting: Some("内閣委員会".to_string()),
            speaker: Some("議員甲".to_string()),
            speaker_group: Some("公明党".to_string()),
            speech: Some("行政改革を進めます, \"速やかに\"".to_string()),
            ..SpeechRow::default()
        },
        SpeechRow {
            speech_id: Some("b".to_string()),
            date: Some("2025-05-02".to_string()),
            ..SpeechRow::default()
        },
    ];

    let mut buffer = Vec::new();
    write_csv(&mut buffer, &rows).expect("export succeeds");
    let table = SpeechTable::from_reader(Cursor::new(buffer)).expect("export loads");

    assert_eq!(table.len(), 2);
    let first = &table.speeches()[0];
    assert_eq!(first.committee, "内閣委員会");
    assert_eq!(first.text(), "行政改革を進めます, \"速やかに\"");
    assert_eq!(table.speeches()[1].house, UNKNOWN_HOUSE);
}

#[test]
fn dashboard_view_over_sample_is_consistent() {
    let table = sample_table();
    let query = DashboardQuery::from_pairs(&[("q", "物価 防衛"), ("max_items", "10")])
        .expect("query parses");
    let view = DashboardView::build(&table, &query);

    assert_eq!(view.total_rows, 30);
    assert_eq!(view.filtered_rows, view.report.metrics.speeches);
    assert!(view.report.speaker_ranking.len() <= 10);
    assert!(!view.report.top_keywords.is_empty());

    let heatmap = &view.report.heatmap;
    assert_eq!(
        heatmap.cells.len(),
        heatmap.terms.len() * heatmap.parties.len()
    );
    assert!(view.charts.keywords.is_some());
    assert_eq!(view.options.houses, vec!["参議院", "衆議院"]);
}
