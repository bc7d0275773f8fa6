use chrono::NaiveDate;
use kokkai::fetch::{
    ApiPage, Endpoint, FetchError, FetchedRows, KeywordMode, SearchQuery, SearchTransport,
    SpeechFetcher,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

type Responder = dyn Fn(Endpoint, &HashMap<String, String>) -> Result<Value, FetchError> + Send + Sync;

struct ScriptedTransport {
    respond: Box<Responder>,
    calls: Mutex<Vec<HashMap<String, String>>>,
}

impl ScriptedTransport {
    fn new<F>(respond: F) -> Self
    where
        F: Fn(Endpoint, &HashMap<String, String>) -> Result<Value, FetchError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<HashMap<String, String>> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl SearchTransport for &ScriptedTransport {
    async fn get(
        &self,
        endpoint: Endpoint,
        params: &[(&'static str, String)],
    ) -> Result<ApiPage, FetchError> {
        let params: HashMap<String, String> = params
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect();
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(params.clone());
        let body = (self.respond)(endpoint, &params)?;
        Ok(ApiPage {
            url: format!("http://api.test/{}?startRecord={}", endpoint.path(), params["startRecord"]),
            body,
        })
    }
}

fn window() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2025, 1, 23).expect("valid start"),
        NaiveDate::from_ymd_opt(2025, 8, 5).expect("valid end"),
    )
}

fn speech(id: &str, text: &str) -> Value {
    json!({
        "speechID": id,
        "date": "2025-02-03",
        "nameOfHouse": "衆議院",
        "nameOfMeeting": "予算委員会",
        "speaker": "山田太郎",
        "speakerGroup": "自由民主党",
        "speech": text,
    })
}

fn speech_page(ids: std::ops::Range<usize>, prefix: &str) -> Value {
    let records: Vec<Value> = ids
        .map(|n| speech(&format!("{prefix}{n:03}"), "消費税について伺います。"))
        .collect();
    json!({ "numberOfRecords": 5, "speechRecord": records })
}

fn speeches(rows: &FetchedRows) -> &[kokkai::speeches::SpeechRow] {
    match rows {
        FetchedRows::Speeches(rows) => rows,
        FetchedRows::Meetings(_) => panic!("expected speech rows"),
    }
}

#[tokio::test]
async fn paginates_until_a_short_page() {
    let transport = ScriptedTransport::new(|_, params| {
        let start: usize = params["startRecord"].parse().expect("numeric start");
        Ok(match start {
            1 => speech_page(0..2, "s"),
            3 => speech_page(2..4, "s"),
            5 => speech_page(4..5, "s"),
            other => panic!("unexpected start {other}"),
        })
    });
    let (from, until) = window();
    let fetcher = SpeechFetcher::new(&transport)
        .with_page_size(2)
        .without_pauses();

    let outcome = fetcher
        .fetch(&SearchQuery::new(from, until))
        .await
        .expect("fetch succeeds");

    assert_eq!(speeches(&outcome.rows).len(), 5);
    assert_eq!(outcome.diagnostics.pages, 3);
    assert_eq!(outcome.diagnostics.number_of_records, Some(5));
    assert!(outcome.diagnostics.empty_preview.is_none());
    let starts: Vec<String> = transport
        .calls()
        .iter()
        .map(|call| call["startRecord"].clone())
        .collect();
    assert_eq!(starts, vec!["1", "3", "5"]);
    assert!(transport.calls().iter().all(|call| call["maximumRecords"] == "2"
        && !call.contains_key("nameOfHouse")
        && call["recordPacking"] == "json"));
}

#[tokio::test]
async fn or_mode_queries_each_term_and_merges_duplicates() {
    let transport = ScriptedTransport::new(|_, params| {
        let records = match params.get("any").map(String::as_str) {
            Some("消費税") => vec![speech("a", "消費税"), speech("b", "消費税と税制")],
            Some("税制") => vec![speech("b", "消費税と税制"), speech("c", "税制")],
            other => panic!("unexpected keyword {other:?}"),
        };
        Ok(json!({ "numberOfRecords": records.len(), "speechRecord": records }))
    });
    let (from, until) = window();
    let mut query = SearchQuery::new(from, until).with_keywords("消費税 税制");
    query.mode = KeywordMode::Or;

    let outcome = SpeechFetcher::new(&transport)
        .without_pauses()
        .fetch(&query)
        .await
        .expect("fetch succeeds");

    let ids: Vec<&str> = speeches(&outcome.rows)
        .iter()
        .filter_map(|row| row.speech_id.as_deref())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn and_mode_sends_one_joined_query_per_house() {
    let transport = ScriptedTransport::new(|_, _| Ok(json!({ "numberOfRecords": 0 })));
    let (from, until) = window();
    let mut query = SearchQuery::new(from, until).with_keywords("消費税 外国");
    query.mode = KeywordMode::And;
    query.houses = vec!["衆議院".to_string(), "参議院".to_string()];
    query.committees = vec!["財務金融委員会".to_string()];

    let outcome = SpeechFetcher::new(&transport)
        .without_pauses()
        .fetch(&query)
        .await
        .expect("fetch succeeds");

    assert!(outcome.rows.is_empty());
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0]["nameOfHouse"], "衆議院");
    assert_eq!(calls[1]["nameOfHouse"], "参議院");
    assert!(calls
        .iter()
        .all(|call| call["any"] == "消費税 外国" && call["nameOfMeeting"] == "財務金融委員会"));
    let preview = outcome.diagnostics.empty_preview.expect("empty page preview kept");
    assert!(preview.contains("numberOfRecords"));
}

#[tokio::test]
async fn meeting_list_ignores_keywords() {
    let transport = ScriptedTransport::new(|endpoint, _| {
        assert_eq!(endpoint, Endpoint::MeetingList);
        Ok(json!({
            "numberOfRecords": 1,
            "meetingRecord": [{
                "date": "2025-01-24",
                "nameOfHouse": "衆議院",
                "nameOfMeeting": "本会議",
                "issue": "第1号",
                "session": 217,
                "speechRecord": [{ "speechURL": "https://kokkai.ndl.go.jp/txt/x/0" }]
            }]
        }))
    });
    let (from, until) = window();
    let mut query = SearchQuery::new(from, until).with_keywords("消費税 税制");
    query.endpoint = Endpoint::MeetingList;

    let outcome = SpeechFetcher::new(&transport)
        .without_pauses()
        .fetch(&query)
        .await
        .expect("fetch succeeds");

    match outcome.rows {
        FetchedRows::Meetings(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].url.as_deref(), Some("https://kokkai.ndl.go.jp/txt/x/0"));
        }
        FetchedRows::Speeches(_) => panic!("expected meeting rows"),
    }
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].contains_key("any"));
}

#[tokio::test]
async fn server_errors_surface_without_retry() {
    let transport = ScriptedTransport::new(|_, _| {
        Err(FetchError::Server {
            status: 503,
            url: "http://api.test/speech".to_string(),
            body: "maintenance".to_string(),
        })
    });
    let (from, until) = window();

    let error = SpeechFetcher::new(&transport)
        .without_pauses()
        .fetch(&SearchQuery::new(from, until))
        .await
        .expect_err("server error propagates");

    assert!(matches!(error, FetchError::Server { status: 503, .. }));
    assert!(error.to_string().contains("maintenance"));
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn rejects_inverted_window_before_any_request() {
    let transport = ScriptedTransport::new(|_, _| Ok(json!({})));
    let (from, until) = window();

    let error = SpeechFetcher::new(&transport)
        .fetch(&SearchQuery::new(until, from))
        .await
        .expect_err("inverted window rejected");

    assert!(matches!(error, FetchError::InvalidRange { .. }));
    assert!(transport.calls().is_empty());
}
