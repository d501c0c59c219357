use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{
    ContentCategory, ContentPage, ContentPageDetail, Councillor, Event, Id, Meeting, MeetingType,
    MeetingTypeMeetings, QuickLink, Slide, Tag,
};
use crate::wire::{normalize_all, normalize_lenient, RawEvent, RawMeeting, RawMeetingType, RawMeetingTypeMeetings};

pub use crate::config::DEFAULT_API_BASE_URL;

/// A CMS resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Councillors,
    Councillor(Id),
    CouncillorTags,
    Events,
    HomepageEvents,
    Event(Id),
    EventCategories,
    MeetingTypes,
    MeetingsByType(String),
    Meeting(Id),
    HomepageMeetings,
    ContentCategories,
    ContentPages,
    ContentPage(String),
    HomepageSlides,
    HomepageQuickLinks,
    Contact,
}

impl Endpoint {
    /// Unencoded path segments below the origin
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::Councillors => vec!["api", "councillors"],
            Endpoint::Councillor(id) => vec!["api", "councillors", id.as_str()],
            Endpoint::CouncillorTags => vec!["api", "councillor-tags"],
            Endpoint::Events => vec!["api", "events"],
            Endpoint::HomepageEvents => vec!["api", "homepage", "events"],
            Endpoint::Event(id) => vec!["api", "events", id.as_str()],
            Endpoint::EventCategories => vec!["api", "event-categories"],
            Endpoint::MeetingTypes => vec!["api", "meeting-types"],
            Endpoint::MeetingsByType(name) => vec!["api", "meetings", "type", name.as_str()],
            Endpoint::Meeting(id) => vec!["api", "meetings", id.as_str()],
            Endpoint::HomepageMeetings => vec!["api", "homepage", "meetings"],
            Endpoint::ContentCategories => vec!["api", "content", "categories"],
            Endpoint::ContentPages => vec!["api", "content", "pages"],
            Endpoint::ContentPage(slug) => vec!["api", "content", "page", slug.as_str()],
            Endpoint::HomepageSlides => vec!["api", "homepage", "slides"],
            Endpoint::HomepageQuickLinks => vec!["api", "homepage", "quick-links"],
            Endpoint::Contact => vec!["api", "contact"],
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// Client for the council CMS API
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base: Url,
}

impl CmsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!("Cannot use {} as an API origin", base_url)));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Absolute URL of `endpoint`, with each segment percent-encoded
    pub fn url(&self, endpoint: &Endpoint) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Cannot use {} as an API origin", self.base)))?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }

    /// GET `endpoint` and decode its JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let url = self.url(endpoint)?;
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| network_error(endpoint, e))?;
        self.decode(endpoint, response).await
    }

    /// POST a JSON body to `endpoint` and decode the JSON reply
    pub async fn post_json<B, T>(&self, endpoint: &Endpoint, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint)?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| network_error(endpoint, e))?;
        self.decode(endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        debug!(%endpoint, status = status.as_u16(), "response");

        if status == StatusCode::NOT_FOUND {
            if let Endpoint::ContentPage(slug) = endpoint {
                return Err(Error::NotFound(slug.clone()));
            }
        }
        if !status.is_success() {
            return Err(Error::Http {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| network_error(endpoint, e))?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch a list resource that needs no normalization
    pub async fn fetch_collection<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<Vec<T>> {
        self.get_json(&endpoint).await
    }

    async fn fetch_normalized<R, T>(&self, endpoint: Endpoint) -> Result<Vec<T>>
    where
        R: DeserializeOwned,
        T: TryFrom<R, Error = Error>,
    {
        let raw: Vec<R> = self.get_json(&endpoint).await?;
        normalize_all(raw)
    }

    /// Like `fetch_normalized`, but records that fail to normalize are logged
    /// and left out
    async fn fetch_normalized_lenient<R, T>(&self, endpoint: Endpoint) -> Result<Vec<T>>
    where
        R: DeserializeOwned,
        T: TryFrom<R, Error = Error>,
    {
        let raw: Vec<R> = self.get_json(&endpoint).await?;
        Ok(normalize_lenient(raw))
    }

    pub async fn councillors(&self) -> Result<Vec<Councillor>> {
        self.fetch_collection(Endpoint::Councillors).await
    }

    pub async fn councillor(&self, id: &Id) -> Result<Councillor> {
        self.get_json(&Endpoint::Councillor(id.clone())).await
    }

    pub async fn councillor_tags(&self) -> Result<Vec<Tag>> {
        self.fetch_collection(Endpoint::CouncillorTags).await
    }

    /// Events without a usable date are skipped
    pub async fn events(&self) -> Result<Vec<Event>> {
        self.fetch_normalized_lenient::<RawEvent, _>(Endpoint::Events)
            .await
    }

    pub async fn homepage_events(&self) -> Result<Vec<Event>> {
        self.fetch_normalized_lenient::<RawEvent, _>(Endpoint::HomepageEvents)
            .await
    }

    pub async fn event(&self, id: &Id) -> Result<Event> {
        let raw: RawEvent = self.get_json(&Endpoint::Event(id.clone())).await?;
        Event::try_from(raw)
    }

    pub async fn event_categories(&self) -> Result<Vec<Tag>> {
        self.fetch_collection(Endpoint::EventCategories).await
    }

    pub async fn meeting_types(&self) -> Result<Vec<MeetingType>> {
        self.fetch_normalized::<RawMeetingType, _>(Endpoint::MeetingTypes).await
    }

    /// Meetings of one type; the name is percent-encoded into the path
    pub async fn meetings_by_type(&self, meeting_type: &str) -> Result<MeetingTypeMeetings> {
        let raw: RawMeetingTypeMeetings = self
            .get_json(&Endpoint::MeetingsByType(meeting_type.to_string()))
            .await?;
        MeetingTypeMeetings::try_from(raw)
    }

    pub async fn meeting(&self, id: &Id) -> Result<Meeting> {
        let raw: RawMeeting = self.get_json(&Endpoint::Meeting(id.clone())).await?;
        Meeting::try_from(raw)
    }

    pub async fn homepage_meetings(&self) -> Result<Vec<Meeting>> {
        self.fetch_normalized::<RawMeeting, _>(Endpoint::HomepageMeetings).await
    }

    pub async fn content_categories(&self) -> Result<Vec<ContentCategory>> {
        self.fetch_collection(Endpoint::ContentCategories).await
    }

    pub async fn content_pages(&self) -> Result<Vec<ContentPage>> {
        self.fetch_collection(Endpoint::ContentPages).await
    }

    /// One content page by slug; a 404 is [`Error::NotFound`]
    pub async fn content_page(&self, slug: &str) -> Result<ContentPageDetail> {
        self.get_json(&Endpoint::ContentPage(slug.to_string())).await
    }

    pub async fn homepage_slides(&self) -> Result<Vec<Slide>> {
        self.fetch_collection(Endpoint::HomepageSlides).await
    }

    pub async fn homepage_quick_links(&self) -> Result<Vec<QuickLink>> {
        self.fetch_collection(Endpoint::HomepageQuickLinks).await
    }
}

fn network_error(endpoint: &Endpoint, err: reqwest::Error) -> Error {
    Error::Network {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    }
}
