use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::calendar::Dated;
use crate::types::{Meeting, MeetingDocument, MeetingType};

/// Number of past meetings shown in the "recent" list
pub const RECENT_LIMIT: usize = 6;

/// Meeting types shown on the meetings overview
pub const DEFAULT_ALLOWED_MEETING_TYPES: &[&str] = &[
    "Annual Town Meeting",
    "Community and Recreation",
    "Finance and Governance",
    "Full Council Meetings",
    "Planning and Development",
];

/// Which upcoming meeting counts as "next" when several are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextMeetingRule {
    /// The chronologically nearest meeting on or after today
    #[default]
    #[serde(alias = "earliest-upcoming")]
    EarliestUpcoming,
    /// The first upcoming meeting met while walking newest-first, i.e. the
    /// furthest scheduled one
    #[serde(alias = "first-in-descending", alias = "latest")]
    FirstInDescending,
}

impl From<&str> for NextMeetingRule {
    fn from(s: &str) -> Self {
        match s.to_lowercase().replace('-', "_").as_str() {
            "first_in_descending" | "latest" => NextMeetingRule::FirstInDescending,
            _ => NextMeetingRule::EarliestUpcoming,
        }
    }
}

/// Meetings split around today
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingPartition<T = Meeting> {
    pub next: Option<T>,
    /// Every meeting on or after today, earliest first
    pub upcoming: Vec<T>,
    /// The newest past meetings, at most the configured limit
    pub recent: Vec<T>,
    /// Every meeting before today, newest first
    pub historic: Vec<T>,
}

/// Partition with the default recent limit
pub fn partition<T: Dated + Clone>(
    meetings: Vec<T>,
    today: NaiveDate,
    rule: NextMeetingRule,
) -> MeetingPartition<T> {
    partition_with_limit(meetings, today, rule, RECENT_LIMIT)
}

/// Sort meetings newest first and walk them once, splitting past from upcoming
pub fn partition_with_limit<T: Dated + Clone>(
    mut meetings: Vec<T>,
    today: NaiveDate,
    rule: NextMeetingRule,
    recent_limit: usize,
) -> MeetingPartition<T> {
    meetings.sort_by_key(|m| Reverse(m.date()));

    let mut upcoming_desc = Vec::new();
    let mut historic = Vec::new();
    let mut recent = Vec::new();

    for meeting in meetings {
        if meeting.date() >= today {
            upcoming_desc.push(meeting);
        } else {
            if recent.len() < recent_limit {
                recent.push(meeting.clone());
            }
            historic.push(meeting);
        }
    }

    let next = match rule {
        NextMeetingRule::FirstInDescending => upcoming_desc.first().cloned(),
        NextMeetingRule::EarliestUpcoming => upcoming_desc.last().cloned(),
    };

    upcoming_desc.reverse();

    MeetingPartition {
        next,
        upcoming: upcoming_desc,
        recent,
        historic,
    }
}

/// Keep only meeting types named in `allowed`, preserving order
pub fn allowed_meeting_types<S: AsRef<str>>(types: Vec<MeetingType>, allowed: &[S]) -> Vec<MeetingType> {
    types
        .into_iter()
        .filter(|t| allowed.iter().any(|a| a.as_ref() == t.name))
        .collect()
}

/// Kind of document slot on a meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Agenda,
    DraftMinutes,
    Minutes,
    ScheduleOfApplications,
    Summary,
}

impl DocumentKind {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Agenda => "Agenda",
            DocumentKind::DraftMinutes => "Draft Minutes",
            DocumentKind::Minutes => "Minutes",
            DocumentKind::ScheduleOfApplications => "Schedule of Applications",
            DocumentKind::Summary => "Summary",
        }
    }
}

/// One document slot and its link, if published
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLink<'a> {
    pub kind: DocumentKind,
    pub url: Option<&'a str>,
}

impl DocumentLink<'_> {
    pub fn is_available(&self) -> bool {
        self.url.is_some()
    }

    pub fn button_text(&self) -> &'static str {
        match (self.kind, self.is_available()) {
            (_, false) => "AVAILABLE SOON",
            (DocumentKind::Summary, true) => "OPEN SUMMARY PAGE",
            (_, true) => "DOWNLOAD",
        }
    }
}

impl Meeting {
    /// All document slots in display order, published or not
    pub fn documents(&self) -> Vec<DocumentLink<'_>> {
        let docs = &self.documents;
        fn file(doc: &Option<MeetingDocument>) -> Option<&str> {
            doc.as_ref()
                .and_then(|d| d.file_url.as_deref())
                .filter(|url| !url.is_empty())
        }

        vec![
            DocumentLink {
                kind: DocumentKind::Agenda,
                url: file(&docs.agenda),
            },
            DocumentLink {
                kind: DocumentKind::DraftMinutes,
                url: file(&docs.draft_minutes),
            },
            DocumentLink {
                kind: DocumentKind::Minutes,
                url: file(&docs.minutes),
            },
            DocumentLink {
                kind: DocumentKind::ScheduleOfApplications,
                url: file(&docs.schedule_applications),
            },
            DocumentLink {
                kind: DocumentKind::Summary,
                url: docs.summary_url.as_deref().filter(|url| !url.is_empty()),
            },
        ]
    }
}
