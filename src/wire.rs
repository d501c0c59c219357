use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::dates::{parse_any_date, parse_iso, parse_time};
use crate::error::{Error, Result};
use crate::types::{Event, EventDetails, Id, Meeting, MeetingDocuments, MeetingType, MeetingTypeMeetings};

#[derive(Debug, Deserialize)]
pub(crate) struct RawEvent {
    id: Id,
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(flatten)]
    details: EventDetails,
}

impl TryFrom<RawEvent> for Event {
    type Error = Error;

    fn try_from(raw: RawEvent) -> Result<Self> {
        let record = format!("event {}", raw.id);
        let date_str = raw
            .date
            .or(raw.start_date)
            .ok_or_else(|| missing_date(&record))?;

        let (date, stamp_time) = parse_iso(&date_str)
            .or_else(|| parse_any_date(&date_str).map(|d| (d, None)))
            .ok_or_else(|| Error::InvalidDate {
                record: record.clone(),
                value: date_str.clone(),
            })?;

        let time = match raw.time.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(t) => Some(parse_time(t).ok_or_else(|| Error::InvalidDate {
                record: record.clone(),
                value: t.to_string(),
            })?),
            None => stamp_time,
        };

        let end_date = match raw.end_date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(d) => Some(
                parse_iso(d)
                    .map(|(date, _)| date)
                    .or_else(|| parse_any_date(d))
                    .ok_or_else(|| Error::InvalidDate {
                        record,
                        value: d.to_string(),
                    })?,
            ),
            None => None,
        };

        Ok(Event {
            id: raw.id,
            title: raw.title,
            date,
            time,
            end_date,
            details: raw.details,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMeeting {
    id: Id,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    time: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, rename = "type")]
    meeting_type: Option<String>,
    #[serde(flatten)]
    documents: MeetingDocuments,
}

impl TryFrom<RawMeeting> for Meeting {
    type Error = Error;

    fn try_from(raw: RawMeeting) -> Result<Self> {
        let record = format!("meeting {}", raw.id);
        let date_str = raw.date.ok_or_else(|| missing_date(&record))?;
        let date = parse_any_date(&date_str).ok_or_else(|| Error::InvalidDate {
            record: record.clone(),
            value: date_str.clone(),
        })?;

        let time = match raw.time.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(t) => Some(parse_time(t).ok_or_else(|| Error::InvalidDate {
                record,
                value: t.to_string(),
            })?),
            None => None,
        };

        let title = raw
            .title
            .or_else(|| raw.meeting_type.clone())
            .unwrap_or_default();

        Ok(Meeting {
            id: raw.id,
            title,
            date,
            time,
            location: raw.location,
            meeting_type: raw.meeting_type,
            documents: raw.documents,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMeetingType {
    #[serde(default)]
    id: Option<Id>,
    name: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    next_meeting: Option<RawMeeting>,
    #[serde(default)]
    meeting_count: u32,
}

impl TryFrom<RawMeetingType> for MeetingType {
    type Error = Error;

    fn try_from(raw: RawMeetingType) -> Result<Self> {
        Ok(MeetingType {
            id: raw.id,
            name: raw.name,
            color: raw.color,
            description: raw.description,
            next_meeting: raw.next_meeting.map(Meeting::try_from).transpose()?,
            meeting_count: raw.meeting_count,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMeetingTypeMeetings {
    #[serde(default)]
    meeting_type: Option<RawMeetingType>,
    #[serde(default)]
    meetings: Vec<RawMeeting>,
}

impl TryFrom<RawMeetingTypeMeetings> for MeetingTypeMeetings {
    type Error = Error;

    fn try_from(raw: RawMeetingTypeMeetings) -> Result<Self> {
        Ok(MeetingTypeMeetings {
            meeting_type: raw.meeting_type.map(MeetingType::try_from).transpose()?,
            meetings: normalize_all(raw.meetings)?,
        })
    }
}

fn missing_date(record: &str) -> Error {
    Error::InvalidDate {
        record: record.to_string(),
        value: "null".to_string(),
    }
}

/// Convert every raw record, failing on the first one that cannot be normalized
pub(crate) fn normalize_all<R, T>(raw: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = Error>,
{
    raw.into_iter().map(T::try_from).collect()
}

/// Convert every raw record, leaving out the ones that cannot be normalized
pub(crate) fn normalize_lenient<R, T>(raw: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = Error>,
{
    raw.into_iter()
        .filter_map(|record| match T::try_from(record) {
            Ok(normalized) => Some(normalized),
            Err(err) => {
                warn!(error = %err, "skipping record");
                None
            }
        })
        .collect()
}

/// Accept a string or a number and keep it as text (prices come as either)
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
