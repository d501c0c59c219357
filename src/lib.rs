//! A typed client for a town council content-management API.
//!
//! This library fetches councillors, events, meetings and content pages from the
//! council CMS, normalizes their dates at the boundary, and derives the views the
//! public site shows: filtered lists, month navigation over events, partitioned
//! meeting histories and grouped content-hub sections.

pub mod association;
pub mod calendar;
pub mod config;
pub mod contact;
pub mod dates;
pub mod error;
pub mod feed;
pub mod filter;
pub mod gateway;
pub mod homepage;
pub mod media;
pub mod meetings;
pub mod settings;
pub mod share;
pub mod types;
pub mod views;

mod wire;

pub use calendar::{MonthNavigator, YearMonth};
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use filter::{FilterResult, FilterSelection, Filterable};
pub use gateway::{CmsClient, Endpoint};
pub use meetings::{MeetingPartition, NextMeetingRule};
pub use types::{
    ContentCategory, ContentPage, ContentPageDetail, Councillor, Event, Id, Meeting, MeetingType,
    MeetingTypeMeetings, Tag,
};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::calendar::{Dated, MonthNavigator, YearMonth};
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::filter::{FilterSelection, Filterable};
    pub use crate::gateway::{CmsClient, Endpoint};
    pub use crate::meetings::{MeetingPartition, NextMeetingRule};
    pub use crate::types::*;
}
