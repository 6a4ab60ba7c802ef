use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{ClientError, ItemApi};
use crate::item::{Item, ItemId, VoteReceipt};

/// [`ItemApi`] over HTTP.
///
/// Cookies set by the server are kept for the lifetime of the client, so a
/// process keeps one voter identity unless `voter_token` pins one.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    voter_token: Option<String>,
}

impl HttpApi {
    pub fn new(
        base_url: &str,
        voter_token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            voter_token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_voter(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.voter_token {
            return request.header(header::COOKIE, format!("voter_token={token}"));
        }
        request
    }

    async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, ClientError> {
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string));
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ItemApi for HttpApi {
    async fn list_items(&self) -> Result<Vec<Item>, ClientError> {
        let url = self.url("/api/items");
        let response = self.with_voter(self.client.get(&url)).send().await?;
        let items: Vec<Item> = Self::decode(&url, response).await?;
        debug!(count = items.len(), "Fetched items");
        Ok(items)
    }

    async fn add_item(&self, name: &str) -> Result<Item, ClientError> {
        let url = self.url("/api/items");
        let body = serde_json::json!({ "name": name });
        let response = self
            .with_voter(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        Self::decode(&url, response).await
    }

    async fn vote(&self, id: ItemId) -> Result<VoteReceipt, ClientError> {
        let url = self.url(&format!("/api/items/{id}/vote"));
        let response = self.with_voter(self.client.post(&url)).send().await?;
        Self::decode(&url, response).await
    }
}
