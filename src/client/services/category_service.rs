use std::sync::Arc;

use async_trait::async_trait;

use crate::client::api_client::ApiClient;
use crate::client::error::ClientResult;
use crate::client::models::{Category, CategoryDraft, WireCategory};
use crate::client::normalize::normalize_category;
use crate::client::services::{require_data, Reply};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryGateway: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Category>>;
    async fn get(&self, id: &str) -> ClientResult<Category>;
    async fn create(&self, draft: CategoryDraft) -> ClientResult<Reply<Category>>;
    async fn update(&self, id: &str, draft: CategoryDraft) -> ClientResult<Reply<Category>>;
    async fn delete(&self, id: &str) -> ClientResult<Option<String>>;
}

pub struct CategoryService {
    api: Arc<ApiClient>,
}

impl CategoryService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

fn one(reply: Reply<WireCategory>) -> Reply<Category> {
    Reply {
        data: normalize_category(reply.data),
        message: reply.message,
    }
}

#[async_trait]
impl CategoryGateway for CategoryService {
    async fn list(&self) -> ClientResult<Vec<Category>> {
        let response = self.api.get::<Vec<WireCategory>>("/categories", &[]).await?;
        Ok(require_data(response)?
            .data
            .into_iter()
            .map(normalize_category)
            .collect())
    }

    async fn get(&self, id: &str) -> ClientResult<Category> {
        let response = self
            .api
            .get::<WireCategory>(&format!("/categories/{}", id), &[])
            .await?;
        Ok(normalize_category(require_data(response)?.data))
    }

    async fn create(&self, draft: CategoryDraft) -> ClientResult<Reply<Category>> {
        let response = self
            .api
            .post::<_, WireCategory>("/categories", Some(&draft))
            .await?;
        require_data(response).map(one)
    }

    async fn update(&self, id: &str, draft: CategoryDraft) -> ClientResult<Reply<Category>> {
        let response = self
            .api
            .put::<_, WireCategory>(&format!("/categories/{}", id), &draft)
            .await?;
        require_data(response).map(one)
    }

    async fn delete(&self, id: &str) -> ClientResult<Option<String>> {
        let response = self
            .api
            .delete::<serde_json::Value>(&format!("/categories/{}", id))
            .await?;
        Ok(response.message)
    }
}
