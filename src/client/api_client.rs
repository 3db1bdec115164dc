use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};

use crate::client::credentials::CredentialProvider;
use crate::client::error::{ClientError, ClientResult};
use crate::shared::types::ApiResponse;

/// Thin JSON client for the PulseCity API.
///
/// Attaches the bearer token from the credential provider when one is stored
/// and turns non-2xx responses into [`ClientError`].
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:8000/api`
    pub fn new(base_url: impl Into<String>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<ApiResponse<T>> {
        self.send(self.request(Method::GET, path).query(query))
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: Option<&B>) -> ClientResult<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.request(Method::POST, path);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<ApiResponse<T>> {
        self.send(self.request(Method::DELETE, path)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.request(method, url);
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<ApiResponse<T>> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Request to PulseCity API failed: {}", e);
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<ApiResponse<T>>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let (message, errors) = error_details(&body)
            .unwrap_or_else(|| (fallback_message(status, &body), Vec::new()));

        tracing::debug!(status = status.as_u16(), %message, "API returned an error");
        Err(ClientError::from_status(status.as_u16(), message, errors))
    }
}

/// Message and field errors from an error envelope, if the body is one
fn error_details(body: &str) -> Option<(String, Vec<String>)> {
    let envelope = serde_json::from_str::<ApiResponse<serde_json::Value>>(body).ok()?;
    let errors = envelope.errors.unwrap_or_default();
    let message = envelope
        .message
        .or_else(|| errors.first().cloned())
        .unwrap_or_default();
    Some((message, errors))
}

fn fallback_message(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        body.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_details_from_envelope() {
        let body = r#"{"success":false,"data":null,"message":"name: required","errors":["name: required","venue_id: invalid"]}"#;
        let (message, errors) = error_details(body).unwrap();
        assert_eq!(message, "name: required");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_error_details_rejects_non_envelope() {
        assert!(error_details("<html>Bad Gateway</html>").is_none());
    }

    #[test]
    fn test_fallback_message_uses_reason_for_empty_body() {
        assert_eq!(
            fallback_message(reqwest::StatusCode::BAD_GATEWAY, ""),
            "Bad Gateway"
        );
    }
}
