use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::gateway::CmsClient;
use crate::media::Carousel;
use crate::types::{Event, EventDetails, Id, Meeting, MeetingDocuments, QuickLink, Slide, Tag};

/// Everything the landing page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomepageData {
    pub slides: Vec<Slide>,
    pub events: Vec<Event>,
    pub meetings: Vec<Meeting>,
    pub quick_links: Vec<QuickLink>,
    /// True when the placeholder content is shown instead of live data
    pub is_fallback: bool,
}

impl HomepageData {
    /// Fetch the four homepage collections concurrently. If any one fails the
    /// whole page falls back to placeholder content.
    pub async fn load(client: &CmsClient) -> Self {
        match Self::fetch(client).await {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "homepage fetch failed, showing placeholder content");
                Self::fallback()
            }
        }
    }

    async fn fetch(client: &CmsClient) -> Result<Self> {
        let (slides, events, meetings, quick_links) = futures::join!(
            client.homepage_slides(),
            client.homepage_events(),
            client.homepage_meetings(),
            client.homepage_quick_links(),
        );
        Ok(Self {
            slides: slides?,
            events: events?,
            meetings: meetings?,
            quick_links: quick_links?,
            is_fallback: false,
        })
    }

    /// Cursor over the hero slides, None when there are none
    pub fn slide_carousel(&self) -> Option<Carousel> {
        Carousel::new(self.slides.len())
    }

    /// Placeholder content shown when the CMS cannot be reached
    pub fn fallback() -> Self {
        Self {
            slides: vec![Slide {
                id: Id::from(1),
                title: "Welcome to Kesgrave Town Council".into(),
                description: Some(
                    "Serving our community with transparency, dedication, and commitment to local democracy."
                        .into(),
                ),
                action_button_text: Some("Learn More".into()),
                action_button_url: Some("/content".into()),
                featured_image: Some(
                    "https://images.unsplash.com/photo-1587300003388-59208cc962cb?ixlib=rb-4.0.3&auto=format&fit=crop&w=2070&q=80"
                        .into(),
                ),
                is_featured: false,
            }],
            events: vec![
                placeholder_event(
                    1,
                    "Community Clean-Up Day",
                    "Join us for our monthly community clean-up event. Help keep Kesgrave beautiful and meet your neighbors.",
                    (2025, 7, 15, 10, 0),
                    "Kesgrave Recreation Ground",
                    &["Community", "Environment"],
                    "/ktc-events/community-cleanup",
                ),
                placeholder_event(
                    2,
                    "Summer Festival Planning",
                    "Planning meeting for the annual Kesgrave Summer Festival. All volunteers welcome.",
                    (2025, 7, 20, 19, 0),
                    "Community Centre",
                    &["Community", "Seasonal"],
                    "/ktc-events/summer-festival",
                ),
            ],
            meetings: vec![
                placeholder_meeting(1, "Full Council", (2025, 7, 10, 19, 30)),
                placeholder_meeting(2, "Planning Committee", (2025, 7, 17, 19, 0)),
            ],
            quick_links: vec![
                quick_link(
                    1,
                    "Report an Issue",
                    "Report potholes, street lighting, or other local issues directly to the council.",
                    "/contact",
                    "Report Now",
                ),
                quick_link(
                    2,
                    "Planning Applications",
                    "View current planning applications and submit comments on local developments.",
                    "/content",
                    "View Applications",
                ),
                quick_link(
                    3,
                    "Council Tax Information",
                    "Find information about council tax rates, payments, and support available.",
                    "/content",
                    "Learn More",
                ),
                quick_link(
                    4,
                    "Local Services",
                    "Access information about local services including waste collection and recycling.",
                    "/content",
                    "View Services",
                ),
            ],
            is_fallback: true,
        }
    }
}

type Stamp = (i32, u32, u32, u32, u32);

fn date_of((y, m, d, _, _): Stamp) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn time_of((_, _, _, h, min): Stamp) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, min, 0)
}

fn placeholder_event(
    id: i64,
    title: &str,
    description: &str,
    at: Stamp,
    location: &str,
    categories: &[&str],
    link: &str,
) -> Event {
    Event {
        id: Id::from(id),
        title: title.into(),
        date: date_of(at),
        time: time_of(at),
        end_date: None,
        details: EventDetails {
            description: Some(description.into()),
            location: Some(location.into()),
            categories: categories.iter().map(|c| Tag::new(*c, *c)).collect(),
            first_featured_link: Some(link.into()),
            ..Default::default()
        },
    }
}

fn placeholder_meeting(id: i64, meeting_type: &str, at: Stamp) -> Meeting {
    Meeting {
        id: Id::from(id),
        title: meeting_type.into(),
        date: date_of(at),
        time: time_of(at),
        location: Some("Council Chambers".into()),
        meeting_type: Some(meeting_type.into()),
        documents: MeetingDocuments::default(),
    }
}

fn quick_link(id: i64, title: &str, description: &str, url: &str, button: &str) -> QuickLink {
    QuickLink {
        id: Id::from(id),
        title: title.into(),
        description: Some(description.into()),
        url: url.into(),
        button_text: Some(button.into()),
    }
}
