use chrono::{NaiveDateTime, NaiveTime, TimeZone, Utc};
use rss::{ChannelBuilder, ItemBuilder};
use std::collections::HashSet;

use crate::types::Event;

/// Channel metadata for the events feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedInfo {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
}

impl Default for FeedInfo {
    fn default() -> Self {
        Self {
            title: "Kesgrave Town Council - Things to Do".to_string(),
            link: "http://127.0.0.1:8027/ktc-events".to_string(),
            description: "Upcoming events in Kesgrave".to_string(),
            language: "en-gb".to_string(),
        }
    }
}

/// Stable item identifier
pub fn event_guid(event: &Event) -> String {
    format!("event-{}", event.id)
}

/// Start of the event as an RFC 2822 date; all-day events start at midnight.
///
/// The CMS sends council wall-clock times without an offset, and they are
/// stamped `+0000` as given. During British Summer Time the stamp is an hour
/// later than the true instant.
pub fn event_pub_date(event: &Event) -> String {
    let start = NaiveDateTime::new(event.date, event.time.unwrap_or(NaiveTime::MIN));
    Utc.from_utc_datetime(&start).to_rfc2822()
}

fn event_description(event: &Event) -> String {
    let mut parts = Vec::new();
    if let Some(text) = event
        .details
        .short_description
        .as_deref()
        .or(event.details.description.as_deref())
    {
        parts.push(text.to_string());
    }
    parts.push(format!(
        "When: {} {}",
        event.date.format("%A %-d %B %Y"),
        event.time_label()
    ));
    if let Some(location) = event.location_label() {
        parts.push(format!("Where: {}", location));
    }
    parts.join("\n")
}

/// Convert events to an RSS 2.0 document, one item per event
pub fn events_to_rss<'a, I>(events: I, info: &FeedInfo) -> String
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut items = Vec::new();
    let mut seen_guids = HashSet::new();

    for event in events {
        let guid = event_guid(event);

        // Deduplicate by GUID
        if !seen_guids.insert(guid.clone()) {
            continue;
        }

        let mut item_builder = ItemBuilder::default();
        item_builder.title(event.title.clone());
        item_builder.description(event_description(event));
        if let Some(link) = &event.details.first_featured_link {
            item_builder.link(link.clone());
        }
        item_builder.pub_date(event_pub_date(event));
        item_builder.guid(rss::Guid {
            value: guid,
            permalink: false,
        });

        for category in &event.details.categories {
            item_builder.category(rss::Category {
                name: category.name.clone(),
                domain: None,
            });
        }

        items.push(item_builder.build());
    }

    let channel = ChannelBuilder::default()
        .title(info.title.as_str())
        .link(info.link.as_str())
        .description(info.description.as_str())
        .language(Some(info.language.clone()))
        .last_build_date(Some(Utc::now().to_rfc2822()))
        .items(items)
        .build();

    channel.to_string()
}
