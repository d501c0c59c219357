use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::dates::lenient_date;

/// Colour used for tags and categories that do not carry one
pub const DEFAULT_TAG_COLOR: &str = "#6c757d";

/// Colour used for meeting types that do not carry one
pub const DEFAULT_MEETING_TYPE_COLOR: &str = "#2c5f2d";

/// Opaque record identifier. The CMS emits both numbers and strings, so both
/// are accepted and held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Id(n.to_string()),
            RawId::Text(s) => Id(s),
        })
    }
}

/// A labelled grouping (councillor tag, event category) with a display colour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Number of associated records, when the endpoint reports one
    #[serde(
        default,
        alias = "councillor_count",
        alias = "event_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u32>,
}

impl Tag {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            description: None,
            count: None,
        }
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR)
    }
}

/// Reference from a page to its parent category or subcategory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRef {
    pub id: Id,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "slug", skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
}

/// A downloadable file attached to an event or page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Download {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "file_url")]
    pub download_url: Option<String>,
}

/// An external or related link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub new_tab: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub image_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// Event fields that need no normalization at the boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub location_url: Option<String>,
    #[serde(default)]
    pub categories: Vec<Tag>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_free: Option<bool>,
    #[serde(default, deserialize_with = "crate::wire::lenient_string")]
    pub price: Option<String>,
    #[serde(default)]
    pub booking_required: bool,
    #[serde(default)]
    pub booking_url: Option<String>,
    #[serde(default)]
    pub max_attendees: Option<u32>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub downloads: Vec<Download>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    #[serde(default)]
    pub first_featured_link: Option<String>,
}

/// A public event ("Things to Do")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: Id,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub details: EventDetails,
}

impl Event {
    /// Display label for the start time; midnight or no time reads as all day
    pub fn time_label(&self) -> String {
        match self.time {
            Some(t) if t.hour() != 0 || t.minute() != 0 => t.format("%H:%M").to_string(),
            _ => "All Day".to_string(),
        }
    }

    /// Best available location text
    pub fn location_label(&self) -> Option<&str> {
        self.details
            .location_name
            .as_deref()
            .or(self.details.location.as_deref())
    }
}

/// A document slot on a meeting (agenda, minutes, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingDocument {
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingDocuments {
    #[serde(default)]
    pub agenda: Option<MeetingDocument>,
    #[serde(default)]
    pub draft_minutes: Option<MeetingDocument>,
    #[serde(default)]
    pub minutes: Option<MeetingDocument>,
    #[serde(default)]
    pub schedule_applications: Option<MeetingDocument>,
    #[serde(default)]
    pub summary_url: Option<String>,
}

/// A council or committee meeting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meeting {
    pub id: Id,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    /// Name of the meeting type, when the endpoint includes it
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub meeting_type: Option<String>,
    #[serde(flatten)]
    pub documents: MeetingDocuments,
}

/// A kind of meeting (Full Council, Planning and Development, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingType {
    pub id: Option<Id>,
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub next_meeting: Option<Meeting>,
    pub meeting_count: u32,
}

impl MeetingType {
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_MEETING_TYPE_COLOR)
    }
}

/// Response of `GET /api/meetings/type/{name}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingTypeMeetings {
    pub meeting_type: Option<MeetingType>,
    pub meetings: Vec<Meeting>,
}

/// An elected councillor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Councillor {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub qualifications: Option<String>,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub created_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub updated_at: Option<NaiveDate>,
}

impl Councillor {
    const CARD_DESCRIPTION_LEN: usize = 150;

    /// Intro text, falling back to the biography
    pub fn description(&self) -> &str {
        self.intro
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.bio.as_deref())
            .unwrap_or("")
    }

    /// Description shortened for list cards
    pub fn card_description(&self) -> String {
        truncate(self.description(), Self::CARD_DESCRIPTION_LEN)
    }
}

/// Shorten `text` to `max_chars` characters, appending `...` when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A content-hub category with its subcategories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCategory {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub last_updated: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub created_at: Option<NaiveDate>,
}

impl ContentCategory {
    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR)
    }
}

/// A content page as listed in the hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPage {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub category: Option<ParentRef>,
    #[serde(default)]
    pub subcategory: Option<ParentRef>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub updated_at: Option<NaiveDate>,
}

/// A content page with its full body and attachments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPageDetail {
    #[serde(flatten)]
    pub page: ContentPage,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub creation_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub approval_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub next_review_date: Option<NaiveDate>,
    #[serde(default)]
    pub downloads: Vec<Download>,
    #[serde(default)]
    pub related_links: Vec<Link>,
    #[serde(default)]
    pub gallery_images: Vec<GalleryImage>,
}

/// Homepage hero slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub action_button_text: Option<String>,
    #[serde(default)]
    pub action_button_url: Option<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// Homepage quick-link card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickLink {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub button_text: Option<String>,
}
