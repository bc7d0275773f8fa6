use crate::speeches::{MeetingRow, SpeechRow};
use serde_json::Value;

/// Characters of raw JSON kept for diagnostics when a page comes back empty.
pub const PREVIEW_CHARS: usize = 800;

/// Reads `numberOfRecords` from the top level or from a nested `records` object.
/// The API has served it both as a number and as a numeric string.
pub fn number_of_records(body: &Value) -> Option<u64> {
    body.get("numberOfRecords")
        .or_else(|| body.get("records").and_then(|records| records.get("numberOfRecords")))
        .and_then(|value| match value {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        })
}

pub(crate) fn records<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Flattens every entry of `speechRecord` into a row; missing fields stay empty.
pub fn speech_rows(body: &Value) -> Vec<SpeechRow> {
    records(body, "speechRecord")
        .iter()
        .map(speech_row)
        .collect()
}

/// Flattens every entry of `meetingRecord` into a row.
pub fn meeting_rows(body: &Value) -> Vec<MeetingRow> {
    records(body, "meetingRecord")
        .iter()
        .map(meeting_row)
        .collect()
}

pub(crate) fn speech_row(record: &Value) -> SpeechRow {
    SpeechRow {
        speech_id: text(record, "speechID"),
        date: text(record, "date"),
        name_of_house: text(record, "nameOfHouse").or_else(|| text(record, "houseName")),
        name_of_meeting: text(record, "nameOfMeeting"),
        speaker: text(record, "speaker"),
        speaker_group: text(record, "speakerGroup"),
        speech: verbatim_text(record, "speech"),
        speech_url: text(record, "speechURL"),
        issue_id: text(record, "issueID"),
        meeting_url: text(record, "meetingURL"),
        bill_id: text(record, "billID"),
    }
}

pub(crate) fn meeting_row(record: &Value) -> MeetingRow {
    let url = records(record, "speechRecord")
        .first()
        .and_then(|speech| text(speech, "speechURL"));

    MeetingRow {
        date: text(record, "date"),
        house: text(record, "nameOfHouse"),
        meeting: text(record, "nameOfMeeting"),
        issue: text(record, "issue"),
        session: text(record, "session"),
        url,
    }
}

pub(crate) fn preview(body: &Value) -> String {
    let raw = body.to_string();
    raw.chars().take(PREVIEW_CHARS).collect()
}

fn text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(value) if !value.trim().is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        _ => None,
    }
}

/// Like `text`, but whitespace-only strings survive; only empty ones are dropped.
fn verbatim_text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(value) if value.is_empty() => None,
        Value::String(value) => Some(value.clone()),
        _ => text(record, key),
    }
}
