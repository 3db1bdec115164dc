use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::client::controllers::{message_or, Outcome};
use crate::client::models::{Event, EventDraft, EventFilters, EventPage, EventPatch};
use crate::client::services::EventGateway;
use crate::features::events::models::EventStatus;

pub struct EventController {
    events: Arc<dyn EventGateway>,
}

impl EventController {
    pub fn new(events: Arc<dyn EventGateway>) -> Self {
        Self { events }
    }

    pub async fn list(&self, filters: EventFilters) -> Outcome<EventPage> {
        match self.events.list(filters).await {
            Ok(page) => {
                let message = format!("Found {} events", page.meta.total);
                Outcome::ok(page, message)
            }
            Err(e) => Outcome::from_error(&e, "Failed to load events"),
        }
    }

    pub async fn detail(&self, id: &str) -> Outcome<Event> {
        match self.events.get(id).await {
            Ok(event) => Outcome::ok(event, "Event retrieved successfully"),
            Err(e) => Outcome::from_error(&e, "Failed to load event"),
        }
    }

    /// Validate then submit. The server always files new events as pending.
    pub async fn create(&self, mut draft: EventDraft) -> Outcome<Event> {
        if let Err(message) = validate_event_draft(&mut draft, Utc::now()) {
            return Outcome::fail(message);
        }

        match self.events.create(draft).await {
            Ok(reply) => Outcome::ok(
                reply.data,
                message_or(reply.message, "Event created successfully"),
            ),
            Err(e) => Outcome::from_error(&e, "Failed to create event"),
        }
    }

    pub async fn update(&self, id: &str, patch: EventPatch) -> Outcome<Event> {
        match self.events.update(id, patch).await {
            Ok(reply) => Outcome::ok(
                reply.data,
                message_or(reply.message, "Event updated successfully"),
            ),
            Err(e) => Outcome::from_error(&e, "Failed to update event"),
        }
    }

    pub async fn delete(&self, id: &str) -> Outcome<()> {
        match self.events.delete(id).await {
            Ok(message) => Outcome::ok((), message_or(message, "Event deleted successfully")),
            Err(e) => Outcome::from_error(&e, "Failed to delete event"),
        }
    }

    pub async fn calendar(&self, year: i32, month: u32) -> Outcome<Vec<Event>> {
        match self.events.calendar(year, month).await {
            Ok(events) => Outcome::ok(events, "Calendar events retrieved successfully"),
            Err(e) => Outcome::from_error(&e, "Failed to load calendar events"),
        }
    }

    /// The caller's own submissions, any status
    pub async fn my_events(
        &self,
        status: Option<EventStatus>,
        page: Option<i64>,
    ) -> Outcome<EventPage> {
        match self.events.my_events(status, page).await {
            Ok(page) => {
                let message = format!("Found {} events", page.meta.total);
                Outcome::ok(page, message)
            }
            Err(e) => Outcome::from_error(&e, "Failed to load your events"),
        }
    }
}

/// Check an event form before it is sent, returning the first problem found.
///
/// Resolves `is_free` when the form left it unset (free unless a positive
/// price was given) and drops the price of free events.
pub fn validate_event_draft(draft: &mut EventDraft, now: DateTime<Utc>) -> Result<(), String> {
    if draft.name.trim().chars().count() < 3 {
        return Err("Event name must be at least 3 characters long".to_string());
    }

    let derived = draft.ticket_price.is_none_or(|p| p <= 0.0);
    let is_free = *draft.is_free.get_or_insert(derived);

    if is_free {
        draft.ticket_price = None;
    } else {
        match draft.ticket_price {
            None => return Err("Please specify a ticket price for paid events".to_string()),
            Some(price) if price <= 0.0 => {
                return Err("Ticket price must be greater than 0 for paid events".to_string())
            }
            Some(_) => {}
        }
    }

    if draft.description.trim().chars().count() < 10 {
        return Err("Event description must be at least 10 characters long".to_string());
    }
    if draft.start_date_time <= now {
        return Err("Event start date must be in the future".to_string());
    }
    if draft.end_date_time <= draft.start_date_time {
        return Err("Event end date must be after start date".to_string());
    }
    if draft.venue_id.is_none() {
        return Err("Venue is required".to_string());
    }
    if draft.category_ids.is_empty() {
        return Err("At least one category is required".to_string());
    }

    Ok(())
}
