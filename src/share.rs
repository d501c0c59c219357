use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

use crate::error::Error;
use crate::types::Meeting;

const GOOGLE_CALENDAR: &str = "https://calendar.google.com/calendar/render";
const MEETING_LENGTH_HOURS: i64 = 2;

/// Percent-encode a URL component, spaces as `%20`
fn encode(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Google Calendar "create event" link for a meeting.
///
/// Times are written without a zone so the calendar reads them as local time.
/// Meetings without a start time become all-day entries.
pub fn google_calendar_url(meeting: &Meeting, meeting_type: &str) -> String {
    let dates = match meeting.time {
        Some(time) => {
            let start = NaiveDateTime::new(meeting.date, time);
            let end = start + Duration::hours(MEETING_LENGTH_HOURS);
            format!(
                "{}/{}",
                start.format("%Y%m%dT%H%M%S"),
                end.format("%Y%m%dT%H%M%S")
            )
        }
        None => {
            let end = meeting.date.succ_opt().unwrap_or(meeting.date);
            format!("{}/{}", meeting.date.format("%Y%m%d"), end.format("%Y%m%d"))
        }
    };
    let location = meeting.location.as_deref().unwrap_or("");
    let details = format!("{} meeting at {}", meeting_type, location);

    format!(
        "{}?action=TEMPLATE&text={}&dates={}&location={}&details={}",
        GOOGLE_CALENDAR,
        encode(&meeting.title),
        dates,
        encode(location),
        encode(&details)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTarget {
    Facebook,
    Twitter,
    Linkedin,
    Email,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 4] = [
        ShareTarget::Facebook,
        ShareTarget::Twitter,
        ShareTarget::Linkedin,
        ShareTarget::Email,
    ];
}

impl fmt::Display for ShareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShareTarget::Facebook => "facebook",
            ShareTarget::Twitter => "twitter",
            ShareTarget::Linkedin => "linkedin",
            ShareTarget::Email => "email",
        };
        f.write_str(name)
    }
}

impl FromStr for ShareTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "facebook" => Ok(ShareTarget::Facebook),
            "twitter" => Ok(ShareTarget::Twitter),
            "linkedin" => Ok(ShareTarget::Linkedin),
            "email" => Ok(ShareTarget::Email),
            other => Err(Error::Validation(format!("Unknown share target '{}'", other))),
        }
    }
}

/// One-line summary used as the share message
pub fn share_text(meeting: &Meeting) -> String {
    let time = meeting
        .time
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "{} - {} at {} in {}",
        meeting.title,
        meeting.date.format("%A %-d %B %Y"),
        time,
        meeting.location.as_deref().unwrap_or("N/A")
    )
}

/// Link that shares `page_url` (the meeting's page) on `target`
pub fn share_url(target: ShareTarget, meeting: &Meeting, page_url: &str) -> String {
    let page = encode(page_url);
    match target {
        ShareTarget::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={}", page),
        ShareTarget::Twitter => format!(
            "https://twitter.com/intent/tweet?text={}&url={}",
            encode(&share_text(meeting)),
            page
        ),
        ShareTarget::Linkedin => {
            format!("https://www.linkedin.com/sharing/share-offsite/?url={}", page)
        }
        ShareTarget::Email => format!(
            "mailto:?subject={}&body={}",
            encode(&meeting.title),
            encode(&format!("{}\n\nMore details: {}", share_text(meeting), page_url))
        ),
    }
}

/// Calendar and share links for one meeting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingLinks {
    pub calendar: String,
    pub share: Vec<(ShareTarget, String)>,
}

impl MeetingLinks {
    pub fn new(meeting: &Meeting, meeting_type: &str, page_url: &str) -> Self {
        Self {
            calendar: google_calendar_url(meeting, meeting_type),
            share: ShareTarget::ALL
                .iter()
                .map(|target| (*target, share_url(*target, meeting, page_url)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Id, MeetingDocuments};
    use chrono::{NaiveDate, NaiveTime};

    fn meeting() -> Meeting {
        Meeting {
            id: Id::from(12),
            title: "Full Council".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            time: NaiveTime::from_hms_opt(19, 30, 0),
            location: Some("Council Chamber".into()),
            meeting_type: None,
            documents: MeetingDocuments::default(),
        }
    }

    #[test]
    fn test_google_calendar_url() {
        insta::assert_snapshot!(
            google_calendar_url(&meeting(), "Full Council Meetings"),
            @"https://calendar.google.com/calendar/render?action=TEMPLATE&text=Full%20Council&dates=20250615T193000/20250615T213000&location=Council%20Chamber&details=Full%20Council%20Meetings%20meeting%20at%20Council%20Chamber"
        );
    }

    #[test]
    fn test_calendar_end_crosses_midnight() {
        let mut m = meeting();
        m.time = NaiveTime::from_hms_opt(23, 0, 0);
        let url = google_calendar_url(&m, "Planning");
        assert!(url.contains("&dates=20250615T230000/20250616T010000&"));
    }

    #[test]
    fn test_calendar_without_time_is_all_day() {
        let mut m = meeting();
        m.time = None;
        let url = google_calendar_url(&m, "Planning");
        assert!(url.contains("&dates=20250615/20250616&"));
    }

    #[test]
    fn test_share_text() {
        assert_eq!(
            share_text(&meeting()),
            "Full Council - Sunday 15 June 2025 at 19:30 in Council Chamber"
        );
    }

    #[test]
    fn test_share_urls() {
        let page = "https://example.org/meetings/Full Council";
        insta::assert_snapshot!(
            share_url(ShareTarget::Facebook, &meeting(), page),
            @"https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.org%2Fmeetings%2FFull%20Council"
        );
        insta::assert_snapshot!(
            share_url(ShareTarget::Email, &meeting(), page),
            @"mailto:?subject=Full%20Council&body=Full%20Council%20-%20Sunday%2015%20June%202025%20at%2019%3A30%20in%20Council%20Chamber%0A%0AMore%20details%3A%20https%3A%2F%2Fexample.org%2Fmeetings%2FFull%20Council"
        );
    }

    #[test]
    fn test_share_target_parse() {
        assert_eq!("LinkedIn".parse::<ShareTarget>().unwrap(), ShareTarget::Linkedin);
        assert!("myspace".parse::<ShareTarget>().is_err());
        assert_eq!(ShareTarget::Twitter.to_string(), "twitter");
    }

    #[test]
    fn test_meeting_links_cover_every_target() {
        let links = MeetingLinks::new(&meeting(), "Full Council Meetings", "https://example.org/m");
        assert_eq!(links.share.len(), 4);
        assert!(links.calendar.starts_with(GOOGLE_CALENDAR));
    }
}
