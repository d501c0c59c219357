use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::warn;

use crate::association::{self, visible_categories, CategorySection};
use crate::calendar::{events_for_month, MonthNavigator, YearMonth};
use crate::config::Config;
use crate::error::Result;
use crate::filter::{category_matches, filter, FilterSelection};
use crate::gateway::CmsClient;
use crate::meetings::{allowed_meeting_types, partition_with_limit, MeetingPartition};
use crate::share::MeetingLinks;
use crate::types::{ContentCategory, ContentPage, Councillor, Event, Meeting, MeetingType, Tag};

/// Unique categories in first-seen order, taken from the events themselves
pub fn categories_from_events(events: &[Event]) -> Vec<Tag> {
    let mut seen = HashSet::new();
    events
        .iter()
        .flat_map(|event| event.details.categories.iter())
        .filter(|category| seen.insert(category.id.clone()))
        .cloned()
        .collect()
}

/// "Things to Do": events one month at a time, narrowed by category
#[derive(Debug, Clone)]
pub struct EventsView {
    events: Vec<Event>,
    categories: Vec<Tag>,
    navigator: MonthNavigator,
    pub selection: FilterSelection,
}

impl EventsView {
    /// Fetch events and event categories together. Categories fall back to
    /// the ones found on the events when their endpoint fails.
    pub async fn load(client: &CmsClient, today: NaiveDate) -> Result<Self> {
        let (events, categories) =
            futures::join!(client.homepage_events(), client.event_categories());
        let events = events?;
        let categories = categories.unwrap_or_else(|err| {
            warn!(error = %err, "event categories unavailable, deriving them from events");
            categories_from_events(&events)
        });
        Ok(Self::new(events, categories, today))
    }

    pub fn new(events: Vec<Event>, categories: Vec<Tag>, today: NaiveDate) -> Self {
        let navigator = MonthNavigator::new(&events, today);
        Self {
            events,
            categories,
            navigator,
            selection: FilterSelection::new(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn categories(&self) -> &[Tag] {
        &self.categories
    }

    pub fn navigator(&self) -> &MonthNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut MonthNavigator {
        &mut self.navigator
    }

    pub fn month(&self) -> YearMonth {
        self.navigator.current()
    }

    /// Events in the current month that survive the selection
    pub fn visible(&self) -> Vec<&Event> {
        let in_month = events_for_month(&self.events, self.navigator.current());
        filter(in_month, &self.selection)
    }

    /// Events on or after `today`, earliest first
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Event> {
        let mut upcoming: Vec<&Event> = self.events.iter().filter(|e| e.date >= today).collect();
        upcoming.sort_by_key(|e| (e.date, e.time));
        upcoming
    }
}

/// Councillor list narrowed by tag
#[derive(Debug, Clone)]
pub struct CouncillorsView {
    councillors: Vec<Councillor>,
    tags: Vec<Tag>,
    pub selection: FilterSelection,
}

impl CouncillorsView {
    /// A failing tag endpoint leaves the tag list empty instead of failing the view
    pub async fn load(client: &CmsClient) -> Result<Self> {
        let (councillors, tags) = futures::join!(client.councillors(), client.councillor_tags());
        let tags = tags.unwrap_or_else(|err| {
            warn!(error = %err, "councillor tags unavailable");
            Vec::new()
        });
        Ok(Self::new(councillors?, tags))
    }

    pub fn new(councillors: Vec<Councillor>, tags: Vec<Tag>) -> Self {
        Self {
            councillors,
            tags,
            selection: FilterSelection::new(),
        }
    }

    pub fn councillors(&self) -> &[Councillor] {
        &self.councillors
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn visible(&self) -> Vec<&Councillor> {
        filter(&self.councillors, &self.selection)
    }
}

/// The content hub: categories with their pages, searchable
#[derive(Debug, Clone)]
pub struct ContentHubView {
    categories: Vec<ContentCategory>,
    pages: Vec<ContentPage>,
    hidden: Vec<String>,
    palette: Vec<String>,
    query: Option<String>,
}

impl ContentHubView {
    pub async fn load(client: &CmsClient, config: &Config) -> Result<Self> {
        let (categories, pages) =
            futures::try_join!(client.content_categories(), client.content_pages())?;
        Ok(Self::new(categories, pages, config))
    }

    pub fn new(categories: Vec<ContentCategory>, pages: Vec<ContentPage>, config: &Config) -> Self {
        Self {
            categories,
            pages,
            hidden: config.hidden_categories.clone(),
            palette: config.category_palette.clone(),
            query: None,
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.query = Some(query).filter(|q| !q.trim().is_empty());
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Visible categories that match the search
    pub fn matching_categories(&self) -> Vec<&ContentCategory> {
        visible_categories(&self.categories, &self.hidden, &self.palette)
            .into_iter()
            .map(|v| v.category)
            .filter(|c| self.query.as_deref().map_or(true, |q| category_matches(c, q)))
            .collect()
    }

    /// Pages that match the search
    pub fn matching_pages(&self) -> Vec<&ContentPage> {
        let selection = match &self.query {
            Some(q) => FilterSelection::new().with_query(q.as_str()),
            None => FilterSelection::new(),
        };
        filter(&self.pages, &selection)
    }

    /// Number of matching categories plus matching pages
    pub fn result_count(&self) -> usize {
        self.matching_categories().len() + self.matching_pages().len()
    }

    /// Matching categories that still hold matching pages, grouped for display
    pub fn sections(&self) -> Vec<CategorySection<'_>> {
        let categories = visible_categories(&self.categories, &self.hidden, &self.palette)
            .into_iter()
            .filter(|v| {
                self.query
                    .as_deref()
                    .map_or(true, |q| category_matches(v.category, q))
            })
            .collect();
        association::sections(categories, &self.matching_pages())
    }
}

/// Meeting types offered on the meetings overview
#[derive(Debug, Clone)]
pub struct MeetingsOverview {
    pub meeting_types: Vec<MeetingType>,
}

impl MeetingsOverview {
    pub async fn load(client: &CmsClient, config: &Config) -> Result<Self> {
        let types = client.meeting_types().await?;
        Ok(Self {
            meeting_types: allowed_meeting_types(types, &config.allowed_meeting_types),
        })
    }
}

/// One meeting type with its meetings split around today
#[derive(Debug, Clone)]
pub struct MeetingTypeView {
    pub name: String,
    pub meeting_type: Option<MeetingType>,
    pub partition: MeetingPartition<Meeting>,
}

impl MeetingTypeView {
    pub async fn load(
        client: &CmsClient,
        name: &str,
        today: NaiveDate,
        config: &Config,
    ) -> Result<Self> {
        let response = client.meetings_by_type(name).await?;
        Ok(Self {
            name: name.to_string(),
            meeting_type: response.meeting_type,
            partition: partition_with_limit(
                response.meetings,
                today,
                config.next_meeting_rule,
                config.recent_limit,
            ),
        })
    }

    /// Calendar and share links for the next meeting, when there is one
    pub fn next_meeting_links(&self, page_url: &str) -> Option<MeetingLinks> {
        let type_name = self
            .meeting_type
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or(&self.name);
        self.partition
            .next
            .as_ref()
            .map(|meeting| MeetingLinks::new(meeting, type_name, page_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EventDetails, Id, ParentRef, Subcategory};

    fn event(id: i64, date: (i32, u32, u32), categories: &[(i64, &str)]) -> Event {
        Event {
            id: Id::from(id),
            title: format!("Event {}", id),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            time: None,
            end_date: None,
            details: EventDetails {
                categories: categories.iter().map(|(id, name)| Tag::new(*id, *name)).collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_categories_from_events_unique_first_seen() {
        let events = vec![
            event(1, (2025, 7, 1), &[(2, "Sports"), (1, "Community")]),
            event(2, (2025, 7, 2), &[(1, "Community"), (3, "Arts")]),
        ];
        let names: Vec<String> = categories_from_events(&events)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Sports", "Community", "Arts"]);
    }

    #[test]
    fn test_events_view_month_and_categories() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let events = vec![
            event(1, (2025, 6, 1), &[(1, "Community")]),
            event(2, (2025, 7, 4), &[(2, "Sports")]),
            event(3, (2025, 7, 20), &[(1, "Community")]),
            event(4, (2025, 9, 1), &[]),
        ];
        let mut view = EventsView::new(events, vec![], today);
        assert_eq!(view.month(), YearMonth::new(2025, 7).unwrap());
        assert_eq!(view.visible().len(), 2);

        view.selection.toggle(1i64);
        let ids: Vec<&Id> = view.visible().iter().map(|e| &e.id).collect();
        assert_eq!(ids, vec![&Id::from(3)]);

        view.navigator_mut().next();
        assert_eq!(view.month(), YearMonth::new(2025, 9).unwrap());
        assert!(view.visible().is_empty());

        let upcoming: Vec<&Id> = view.upcoming(today).iter().map(|e| &e.id).collect();
        assert_eq!(upcoming, vec![&Id::from(2), &Id::from(3), &Id::from(4)]);
    }

    #[test]
    fn test_content_hub_search() {
        let categories: Vec<ContentCategory> = vec![
            ContentCategory {
                id: Id::from(1),
                name: "Planning".into(),
                description: None,
                color: None,
                page_count: None,
                subcategories: vec![Subcategory {
                    id: Id::from(11),
                    name: "Applications".into(),
                    description: None,
                }],
                last_updated: None,
                created_at: None,
            },
            ContentCategory {
                id: Id::from(2),
                name: "News".into(),
                description: None,
                color: None,
                page_count: None,
                subcategories: vec![],
                last_updated: None,
                created_at: None,
            },
        ];
        let page = |id: i64, title: &str, category: i64| ContentPage {
            id: Id::from(id),
            title: title.into(),
            slug: title.to_lowercase(),
            short_description: None,
            category: Some(ParentRef {
                id: Id::from(category),
                name: String::new(),
                url_path: None,
            }),
            subcategory: None,
            updated_at: None,
        };
        let pages = vec![page(1, "Planning Policy", 1), page(2, "Tree Survey", 1), page(3, "Press", 2)];

        let mut hub = ContentHubView::new(categories, pages, &Config::default());
        assert_eq!(hub.matching_categories().len(), 1);
        assert_eq!(hub.sections().len(), 1);
        assert_eq!(hub.sections()[0].pages.len(), 2);

        hub.set_query("plan");
        assert_eq!(hub.matching_pages().len(), 1);
        assert_eq!(hub.result_count(), 2);
        assert_eq!(hub.sections()[0].pages.len(), 1);

        hub.set_query("zzz");
        assert_eq!(hub.result_count(), 0);
        assert!(hub.sections().is_empty());
    }
}
