use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::client::api_client::ApiClient;
use crate::client::error::ClientResult;
use crate::client::models::{Event, EventDraft, EventFilters, EventPage, EventPatch, WireEvent};
use crate::client::normalize::normalize_event;
use crate::client::services::{require_data, Reply};
use crate::features::events::models::EventStatus;
use crate::shared::types::Meta;

/// Event endpoints as seen by the controllers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventGateway: Send + Sync {
    async fn list(&self, filters: EventFilters) -> ClientResult<EventPage>;
    async fn get(&self, id: &str) -> ClientResult<Event>;
    async fn create(&self, draft: EventDraft) -> ClientResult<Reply<Event>>;
    async fn update(&self, id: &str, patch: EventPatch) -> ClientResult<Reply<Event>>;
    /// Returns the server's message
    async fn delete(&self, id: &str) -> ClientResult<Option<String>>;
    async fn calendar(&self, year: i32, month: u32) -> ClientResult<Vec<Event>>;
    async fn my_events(
        &self,
        status: Option<EventStatus>,
        page: Option<i64>,
    ) -> ClientResult<EventPage>;
    async fn approve(&self, id: &str, notes: Option<String>) -> ClientResult<Reply<Event>>;
    async fn reject(&self, id: &str, reason: String) -> ClientResult<Reply<Event>>;
}

#[derive(Serialize)]
struct ApproveBody<'a> {
    admin_notes: &'a str,
}

#[derive(Serialize)]
struct RejectBody<'a> {
    reason: &'a str,
}

pub struct EventService {
    api: Arc<ApiClient>,
}

impl EventService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    async fn page(&self, path: &str, query: Vec<(String, String)>) -> ClientResult<EventPage> {
        let response = self.api.get::<Vec<WireEvent>>(path, &query).await?;
        let meta = response.meta.clone();
        let wire = require_data(response)?.data;
        let events: Vec<Event> = wire.into_iter().map(normalize_event).collect();
        let meta = meta.unwrap_or_else(|| Meta::total(events.len() as i64));
        Ok(EventPage { events, meta })
    }
}

fn one(reply: Reply<WireEvent>) -> Reply<Event> {
    Reply {
        data: normalize_event(reply.data),
        message: reply.message,
    }
}

#[async_trait]
impl EventGateway for EventService {
    async fn list(&self, filters: EventFilters) -> ClientResult<EventPage> {
        self.page("/events", filters.to_query()).await
    }

    async fn get(&self, id: &str) -> ClientResult<Event> {
        let response = self
            .api
            .get::<WireEvent>(&format!("/events/{}", id), &[])
            .await?;
        Ok(normalize_event(require_data(response)?.data))
    }

    async fn create(&self, draft: EventDraft) -> ClientResult<Reply<Event>> {
        let response = self
            .api
            .post::<_, WireEvent>("/events", Some(&draft))
            .await?;
        require_data(response).map(one)
    }

    async fn update(&self, id: &str, patch: EventPatch) -> ClientResult<Reply<Event>> {
        let response = self
            .api
            .put::<_, WireEvent>(&format!("/events/{}", id), &patch)
            .await?;
        require_data(response).map(one)
    }

    async fn delete(&self, id: &str) -> ClientResult<Option<String>> {
        let response = self
            .api
            .delete::<serde_json::Value>(&format!("/events/{}", id))
            .await?;
        Ok(response.message)
    }

    async fn calendar(&self, year: i32, month: u32) -> ClientResult<Vec<Event>> {
        let response = self
            .api
            .get::<Vec<WireEvent>>(&format!("/events/calendar/{}/{}", year, month), &[])
            .await?;
        Ok(require_data(response)?
            .data
            .into_iter()
            .map(normalize_event)
            .collect())
    }

    async fn my_events(
        &self,
        status: Option<EventStatus>,
        page: Option<i64>,
    ) -> ClientResult<EventPage> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status".to_string(), status.as_str().to_string()));
        }
        if let Some(page) = page {
            query.push(("page".to_string(), page.to_string()));
        }
        self.page("/my-events", query).await
    }

    async fn approve(&self, id: &str, notes: Option<String>) -> ClientResult<Reply<Event>> {
        let path = format!("/events/{}/approve", id);
        let body = notes.as_deref().map(|admin_notes| ApproveBody { admin_notes });
        let response = self.api.post::<_, WireEvent>(&path, body.as_ref()).await?;
        tracing::debug!(event_id = %id, "Event approval submitted");
        require_data(response).map(one)
    }

    async fn reject(&self, id: &str, reason: String) -> ClientResult<Reply<Event>> {
        let path = format!("/events/{}/reject", id);
        let body = RejectBody { reason: &reason };
        let response = self.api.post::<_, WireEvent>(&path, Some(&body)).await?;
        tracing::debug!(event_id = %id, "Event rejection submitted");
        require_data(response).map(one)
    }
}
