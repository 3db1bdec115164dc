use std::sync::Arc;

use async_trait::async_trait;

use crate::client::api_client::ApiClient;
use crate::client::error::ClientResult;
use crate::client::models::{Venue, VenueDraft, WireVenue};
use crate::client::normalize::normalize_venue;
use crate::client::services::{require_data, Reply};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueGateway: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Venue>>;
    async fn get(&self, id: &str) -> ClientResult<Venue>;
    async fn create(&self, draft: VenueDraft) -> ClientResult<Reply<Venue>>;
    async fn update(&self, id: &str, draft: VenueDraft) -> ClientResult<Reply<Venue>>;
    async fn delete(&self, id: &str) -> ClientResult<Option<String>>;
}

pub struct VenueService {
    api: Arc<ApiClient>,
}

impl VenueService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

fn one(reply: Reply<WireVenue>) -> Reply<Venue> {
    Reply {
        data: normalize_venue(reply.data),
        message: reply.message,
    }
}

#[async_trait]
impl VenueGateway for VenueService {
    async fn list(&self) -> ClientResult<Vec<Venue>> {
        let response = self.api.get::<Vec<WireVenue>>("/venues", &[]).await?;
        Ok(require_data(response)?
            .data
            .into_iter()
            .map(normalize_venue)
            .collect())
    }

    async fn get(&self, id: &str) -> ClientResult<Venue> {
        let response = self
            .api
            .get::<WireVenue>(&format!("/venues/{}", id), &[])
            .await?;
        Ok(normalize_venue(require_data(response)?.data))
    }

    async fn create(&self, draft: VenueDraft) -> ClientResult<Reply<Venue>> {
        let response = self
            .api
            .post::<_, WireVenue>("/venues", Some(&draft))
            .await?;
        require_data(response).map(one)
    }

    async fn update(&self, id: &str, draft: VenueDraft) -> ClientResult<Reply<Venue>> {
        let response = self
            .api
            .put::<_, WireVenue>(&format!("/venues/{}", id), &draft)
            .await?;
        require_data(response).map(one)
    }

    async fn delete(&self, id: &str) -> ClientResult<Option<String>> {
        let response = self
            .api
            .delete::<serde_json::Value>(&format!("/venues/{}", id))
            .await?;
        Ok(response.message)
    }
}
