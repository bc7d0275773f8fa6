use super::export::CsvRecord;
use serde::{Deserialize, Deserializer, Serialize};

/// One speech as persisted in the CSV. Column names follow the search API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub speech_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date: Option<String>,
    #[serde(
        rename = "nameOfHouse",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub name_of_house: Option<String>,
    #[serde(
        rename = "nameOfMeeting",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub name_of_meeting: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub speaker: Option<String>,
    #[serde(
        rename = "speakerGroup",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub speaker_group: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub speech: Option<String>,
    #[serde(
        rename = "speechURL",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub speech_url: Option<String>,
    #[serde(rename = "issueID", default, deserialize_with = "empty_string_as_none")]
    pub issue_id: Option<String>,
    #[serde(
        rename = "meetingURL",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub meeting_url: Option<String>,
    #[serde(rename = "billID", default, deserialize_with = "empty_string_as_none")]
    pub bill_id: Option<String>,
}

impl CsvRecord for SpeechRow {
    const HEADERS: &'static [&'static str] = &[
        "speech_id",
        "date",
        "nameOfHouse",
        "nameOfMeeting",
        "speaker",
        "speakerGroup",
        "speech",
        "speechURL",
        "issueID",
        "meetingURL",
        "billID",
    ];
}

/// One meeting summary from the `meeting_list` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub house: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub meeting: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub issue: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub session: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub url: Option<String>,
}

impl CsvRecord for MeetingRow {
    const HEADERS: &'static [&'static str] =
        &["date", "house", "meeting", "issue", "session", "url"];
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Unlike the other columns, whitespace-only speech text is kept as written.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.is_empty()))
}
