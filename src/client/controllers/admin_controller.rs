use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;

use crate::client::controllers::{message_or, Outcome};
use crate::client::error::ClientResult;
use crate::client::models::{Category, CategoryDraft, Event, EventFilters, Venue, VenueDraft};
use crate::client::services::{CategoryGateway, EventGateway, VenueGateway};
use crate::features::events::models::EventStatus;
use crate::shared::constants::MAX_PAGE_SIZE;
use crate::shared::validation::HEX_COLOR_REGEX;

/// Counts reported after a batch review. `successful + failed == total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchTally {
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnalytics {
    pub total_events: usize,
    pub upcoming_events: usize,
    pub past_events: usize,
    pub pending_events: usize,
    pub approved_events: usize,
    pub rejected_events: usize,
    pub free_events: usize,
    pub paid_events: usize,
    /// Event count per category name
    pub categories_stats: BTreeMap<String, usize>,
    /// Event count per venue name
    pub venue_stats: BTreeMap<String, usize>,
}

pub struct AdminController {
    events: Arc<dyn EventGateway>,
    categories: Arc<dyn CategoryGateway>,
    venues: Arc<dyn VenueGateway>,
}

impl AdminController {
    pub fn new(
        events: Arc<dyn EventGateway>,
        categories: Arc<dyn CategoryGateway>,
        venues: Arc<dyn VenueGateway>,
    ) -> Self {
        Self {
            events,
            categories,
            venues,
        }
    }

    /// Approve or reject one event. For rejections `notes` is the reason.
    pub async fn review(&self, id: &str, approved: bool, notes: Option<String>) -> Outcome<Event> {
        let result = if approved {
            self.events.approve(id, notes).await
        } else {
            self.events.reject(id, notes.unwrap_or_default()).await
        };

        match result {
            Ok(reply) => {
                let default = if approved {
                    "Event approved successfully"
                } else {
                    "Event rejected"
                };
                Outcome::ok(reply.data, message_or(reply.message, default))
            }
            Err(e) => {
                tracing::warn!(event_id = %id, approved, "Event review failed: {}", e);
                Outcome::from_error(&e, "Failed to update event status")
            }
        }
    }

    /// Review every id concurrently and tally once all requests have settled.
    ///
    /// Nothing is rolled back when some ids fail.
    pub async fn batch_review(
        &self,
        ids: &[String],
        approved: bool,
        notes: Option<String>,
    ) -> Outcome<BatchTally> {
        let reviews = ids
            .iter()
            .map(|id| self.review(id, approved, notes.clone()));
        let outcomes = join_all(reviews).await;

        let total = outcomes.len();
        let successful = outcomes.iter().filter(|o| o.success).count();
        let failed = total - successful;

        let mut message = format!("{} events processed successfully", successful);
        if failed > 0 {
            message.push_str(&format!(", {} failed", failed));
        }

        Outcome {
            success: failed == 0,
            data: Some(BatchTally {
                successful,
                failed,
                total,
            }),
            message,
        }
    }

    pub async fn pending_events(&self) -> Outcome<Vec<Event>> {
        let filters = EventFilters {
            status: Some(EventStatus::Pending),
            ..Default::default()
        };
        match self.collect(filters).await {
            Ok(events) => {
                let message = format!("Found {} pending events", events.len());
                Outcome::ok(events, message)
            }
            Err(e) => Outcome::from_error(&e, "Failed to load pending events"),
        }
    }

    pub async fn analytics(&self) -> Outcome<EventAnalytics> {
        match self.collect(EventFilters::default()).await {
            Ok(events) => Outcome::ok(
                build_analytics(&events, Utc::now()),
                "Analytics generated successfully",
            ),
            Err(e) => Outcome::from_error(&e, "Failed to generate analytics"),
        }
    }

    pub async fn create_category(&self, draft: CategoryDraft) -> Outcome<Category> {
        if let Err(message) = validate_category_draft(&draft) {
            return Outcome::fail(message);
        }
        match self.categories.create(draft).await {
            Ok(reply) => Outcome::ok(
                reply.data,
                message_or(reply.message, "Category created successfully"),
            ),
            Err(e) => Outcome::from_error(&e, "Failed to create category"),
        }
    }

    pub async fn update_category(&self, id: &str, draft: CategoryDraft) -> Outcome<Category> {
        if let Err(message) = validate_category_draft(&draft) {
            return Outcome::fail(message);
        }
        match self.categories.update(id, draft).await {
            Ok(reply) => Outcome::ok(
                reply.data,
                message_or(reply.message, "Category updated successfully"),
            ),
            Err(e) => Outcome::from_error(&e, "Failed to update category"),
        }
    }

    pub async fn delete_category(&self, id: &str) -> Outcome<()> {
        match self.categories.delete(id).await {
            Ok(message) => Outcome::ok((), message_or(message, "Category deleted successfully")),
            Err(e) => Outcome::from_error(&e, "Failed to delete category"),
        }
    }

    pub async fn create_venue(&self, draft: VenueDraft) -> Outcome<Venue> {
        if let Err(message) = validate_venue_draft(&draft) {
            return Outcome::fail(message);
        }
        match self.venues.create(draft).await {
            Ok(reply) => Outcome::ok(
                reply.data,
                message_or(reply.message, "Venue created successfully"),
            ),
            Err(e) => Outcome::from_error(&e, "Failed to create venue"),
        }
    }

    pub async fn update_venue(&self, id: &str, draft: VenueDraft) -> Outcome<Venue> {
        if let Err(message) = validate_venue_draft(&draft) {
            return Outcome::fail(message);
        }
        match self.venues.update(id, draft).await {
            Ok(reply) => Outcome::ok(
                reply.data,
                message_or(reply.message, "Venue updated successfully"),
            ),
            Err(e) => Outcome::from_error(&e, "Failed to update venue"),
        }
    }

    pub async fn delete_venue(&self, id: &str) -> Outcome<()> {
        match self.venues.delete(id).await {
            Ok(message) => Outcome::ok((), message_or(message, "Venue deleted successfully")),
            Err(e) => Outcome::from_error(&e, "Failed to delete venue"),
        }
    }

    /// Walk every page of a listing
    async fn collect(&self, mut filters: EventFilters) -> ClientResult<Vec<Event>> {
        filters.per_page = Some(MAX_PAGE_SIZE);
        let mut events = Vec::new();
        let mut page = 1;

        loop {
            filters.page = Some(page);
            let batch = self.events.list(filters.clone()).await?;
            let last_page = batch.meta.last_page.unwrap_or(page);
            events.extend(batch.events);
            if page >= last_page {
                break;
            }
            page += 1;
        }

        Ok(events)
    }
}

pub fn build_analytics(events: &[Event], now: DateTime<Utc>) -> EventAnalytics {
    let mut analytics = EventAnalytics {
        total_events: events.len(),
        ..Default::default()
    };

    for event in events {
        if event.start_date_time > now {
            analytics.upcoming_events += 1;
        }
        if event.end_date_time < now {
            analytics.past_events += 1;
        }
        match event.status {
            EventStatus::Pending => analytics.pending_events += 1,
            EventStatus::Approved => analytics.approved_events += 1,
            EventStatus::Rejected => analytics.rejected_events += 1,
            _ => {}
        }
        if event.is_free {
            analytics.free_events += 1;
        } else {
            analytics.paid_events += 1;
        }
        for category in &event.categories {
            *analytics
                .categories_stats
                .entry(category.name.clone())
                .or_default() += 1;
        }
        *analytics
            .venue_stats
            .entry(event.venue.name.clone())
            .or_default() += 1;
    }

    analytics
}

pub fn validate_category_draft(draft: &CategoryDraft) -> Result<(), String> {
    if draft.name.trim().chars().count() < 2 {
        return Err("Category name must be at least 2 characters long".to_string());
    }
    if !HEX_COLOR_REGEX.is_match(draft.color.trim()) {
        return Err("Valid hex color is required (e.g., #3B82F6)".to_string());
    }
    Ok(())
}

pub fn validate_venue_draft(draft: &VenueDraft) -> Result<(), String> {
    if draft.name.trim().chars().count() < 2 {
        return Err("Venue name must be at least 2 characters long".to_string());
    }
    if draft.address.trim().chars().count() < 5 {
        return Err("Venue address must be at least 5 characters long".to_string());
    }
    if !(-90.0..=90.0).contains(&draft.latitude) {
        return Err("Valid latitude is required (-90 to 90)".to_string());
    }
    if !(-180.0..=180.0).contains(&draft.longitude) {
        return Err("Valid longitude is required (-180 to 180)".to_string());
    }
    if draft.capacity.is_some_and(|c| c < 1) {
        return Err("Venue capacity must be a positive number".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::controllers::fixtures::sample_event;
    use crate::client::error::ClientError;
    use crate::client::models::EventPage;
    use crate::client::services::{
        MockCategoryGateway, MockEventGateway, MockVenueGateway, Reply,
    };
    use crate::shared::types::Meta;
    use chrono::Duration;

    fn controller(events: MockEventGateway) -> AdminController {
        AdminController::new(
            Arc::new(events),
            Arc::new(MockCategoryGateway::new()),
            Arc::new(MockVenueGateway::new()),
        )
    }

    #[tokio::test]
    async fn test_batch_approval_tallies_partial_failure() {
        let mut events = MockEventGateway::new();
        events.expect_approve().times(3).returning(|id, _| {
            if id.to_string() == "bad" {
                Err(ClientError::NotFound("Event bad not found".to_string()))
            } else {
                Ok(Reply {
                    data: sample_event(id, EventStatus::Approved),
                    message: Some("Event approved successfully".to_string()),
                })
            }
        });

        let ids = vec!["1".to_string(), "bad".to_string(), "3".to_string()];
        let outcome = controller(events).batch_review(&ids, true, None).await;

        assert!(!outcome.success);
        let tally = outcome.data.unwrap();
        assert_eq!(tally.successful, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.successful + tally.failed, tally.total);
        assert_eq!(outcome.message, "2 events processed successfully, 1 failed");
    }

    #[tokio::test]
    async fn test_batch_rejection_all_succeed() {
        let mut events = MockEventGateway::new();
        events
            .expect_reject()
            .withf(|_, reason| reason == "Duplicate listing")
            .times(2)
            .returning(|id, _| {
                Ok(Reply {
                    data: sample_event(id, EventStatus::Rejected),
                    message: None,
                })
            });

        let ids = vec!["4".to_string(), "5".to_string()];
        let outcome = controller(events)
            .batch_review(&ids, false, Some("Duplicate listing".to_string()))
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.message, "2 events processed successfully");
    }

    #[tokio::test]
    async fn test_pending_events_walks_all_pages() {
        let mut events = MockEventGateway::new();
        events
            .expect_list()
            .withf(|f| f.status == Some(EventStatus::Pending))
            .times(2)
            .returning(|f| {
                let page = f.page.unwrap_or(1);
                Ok(EventPage {
                    events: vec![sample_event(&page.to_string(), EventStatus::Pending)],
                    meta: Meta {
                        total: 2,
                        current_page: Some(page),
                        per_page: Some(1),
                        last_page: Some(2),
                    },
                })
            });

        let outcome = controller(events).pending_events().await;

        assert!(outcome.success);
        assert_eq!(outcome.data.unwrap().len(), 2);
        assert_eq!(outcome.message, "Found 2 pending events");
    }

    #[test]
    fn test_build_analytics() {
        let now = Utc::now();
        let mut past = sample_event("1", EventStatus::Approved);
        past.start_date_time = now - Duration::days(2);
        past.end_date_time = now - Duration::days(1);
        past.is_free = false;
        past.ticket_price = Some(15.0);

        let upcoming = sample_event("2", EventStatus::Pending);
        let mut rejected = sample_event("3", EventStatus::Rejected);
        rejected.venue.name = "Civic Plaza".to_string();

        let analytics = build_analytics(&[past, upcoming, rejected], now);

        assert_eq!(analytics.total_events, 3);
        assert_eq!(analytics.upcoming_events, 2);
        assert_eq!(analytics.past_events, 1);
        assert_eq!(analytics.pending_events, 1);
        assert_eq!(analytics.approved_events, 1);
        assert_eq!(analytics.rejected_events, 1);
        assert_eq!(analytics.free_events, 2);
        assert_eq!(analytics.paid_events, 1);
        assert_eq!(analytics.categories_stats.get("Music"), Some(&3));
        assert_eq!(analytics.venue_stats.get("Riverside Hall"), Some(&2));
        assert_eq!(analytics.venue_stats.get("Civic Plaza"), Some(&1));
    }

    #[test]
    fn test_category_and_venue_validation() {
        let css_class = CategoryDraft {
            name: "Music".to_string(),
            color: "bg-blue-500".to_string(),
        };
        assert!(validate_category_draft(&css_class).is_err());

        let short = CategoryDraft {
            name: "M".to_string(),
            color: "#3B82F6".to_string(),
        };
        assert_eq!(
            validate_category_draft(&short).unwrap_err(),
            "Category name must be at least 2 characters long"
        );

        let venue = VenueDraft {
            name: "Riverside Hall".to_string(),
            address: "1 River Rd".to_string(),
            latitude: 95.0,
            longitude: 0.0,
            capacity: None,
        };
        assert_eq!(
            validate_venue_draft(&venue).unwrap_err(),
            "Valid latitude is required (-90 to 90)"
        );

        let venue = VenueDraft {
            latitude: 0.0,
            capacity: Some(0),
            ..venue
        };
        assert_eq!(
            validate_venue_draft(&venue).unwrap_err(),
            "Venue capacity must be a positive number"
        );
    }

    #[tokio::test]
    async fn test_create_venue_skips_api_when_invalid() {
        let mut venues = MockVenueGateway::new();
        venues.expect_create().never();

        let admin = AdminController::new(
            Arc::new(MockEventGateway::new()),
            Arc::new(MockCategoryGateway::new()),
            Arc::new(venues),
        );
        let outcome = admin
            .create_venue(VenueDraft {
                name: "Hall".to_string(),
                address: "Rd".to_string(),
                latitude: 1.0,
                longitude: 1.0,
                capacity: None,
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            "Venue address must be at least 5 characters long"
        );
    }

    #[tokio::test]
    async fn test_update_category_skips_api_when_invalid() {
        let mut categories = MockCategoryGateway::new();
        categories.expect_update().never();

        let admin = AdminController::new(
            Arc::new(MockEventGateway::new()),
            Arc::new(categories),
            Arc::new(MockVenueGateway::new()),
        );
        let outcome = admin
            .update_category(
                "4",
                CategoryDraft {
                    name: "Music".to_string(),
                    color: "purple".to_string(),
                },
            )
            .await;

        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            "Valid hex color is required (e.g., #3B82F6)"
        );
    }
}
