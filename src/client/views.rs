//! Arranging a page of events for the list, calendar and map views.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::models::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Calendar,
    Map,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventView {
    List(Vec<Event>),
    /// Keyed by the UTC date of the start
    ByDate(BTreeMap<NaiveDate, Vec<Event>>),
    /// Keyed by venue id
    ByVenue(BTreeMap<String, Vec<Event>>),
}

pub fn format_for_view(events: Vec<Event>, mode: ViewMode) -> EventView {
    match mode {
        ViewMode::List => EventView::List(events),
        ViewMode::Calendar => EventView::ByDate(group_by_date(events)),
        ViewMode::Map => EventView::ByVenue(group_by_venue(events)),
    }
}

/// Input order is kept within each group
pub fn group_by_date(events: Vec<Event>) -> BTreeMap<NaiveDate, Vec<Event>> {
    let mut groups: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    for event in events {
        groups
            .entry(event.start_date_time.date_naive())
            .or_default()
            .push(event);
    }
    groups
}

pub fn group_by_venue(events: Vec<Event>) -> BTreeMap<String, Vec<Event>> {
    let mut groups: BTreeMap<String, Vec<Event>> = BTreeMap::new();
    for event in events {
        groups.entry(event.venue.id.clone()).or_default().push(event);
    }
    groups
}
