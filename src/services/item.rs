//! Item Service
//!
//! Wraps `/api/items` and the comment endpoints. All failures pass through
//! [`handle_error`], so callers only ever see a [`ServiceError`].

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::ServiceError;
use crate::models::{Comment, CommentThread, Item};

const GENERIC_MESSAGE: &str = "Server error";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct ItemService {
    client: Client,
    base_url: String,
}

impl ItemService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Share an existing connection pool
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    // ========================
    // Items
    // ========================

    pub async fn get_latest(&self, n: Option<i64>) -> Result<Vec<Item>, ServiceError> {
        self.fetch("GetLatest", self.client.get(self.url(&listing_path("GetLatest", n))))
            .await
    }

    pub async fn get_most_viewed(&self, n: Option<i64>) -> Result<Vec<Item>, ServiceError> {
        self.fetch(
            "GetMostViewed",
            self.client.get(self.url(&listing_path("GetMostViewed", n))),
        )
        .await
    }

    pub async fn get_random(&self, n: Option<i64>) -> Result<Vec<Item>, ServiceError> {
        self.fetch("GetRandom", self.client.get(self.url(&listing_path("GetRandom", n))))
            .await
    }

    /// Fails with [`ServiceError::MissingId`] without contacting the server
    pub async fn get(&self, id: Option<i64>) -> Result<Item, ServiceError> {
        let id = id.ok_or(ServiceError::MissingId)?;
        self.fetch("get", self.client.get(self.url(&format!("items/{}", id))))
            .await
    }

    pub async fn add(&self, item: &Item) -> Result<Item, ServiceError> {
        self.fetch("add", self.client.post(self.url("items")).json(item))
            .await
    }

    /// Overwrites the editable fields of `item.id`
    pub async fn update(&self, item: &Item) -> Result<Item, ServiceError> {
        let id = item.id.ok_or(ServiceError::MissingId)?;
        self.fetch(
            "update",
            self.client.put(self.url(&format!("items/{}", id))).json(item),
        )
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.execute("delete", self.client.delete(self.url(&format!("items/{}", id))))
            .await?;
        Ok(())
    }

    // ========================
    // Comments
    // ========================

    pub async fn get_comments(&self, item_id: i64) -> Result<Vec<CommentThread>, ServiceError> {
        self.fetch(
            "get_comments",
            self.client.get(self.url(&format!("items/{}/comments", item_id))),
        )
        .await
    }

    pub async fn add_comment(
        &self,
        item_id: i64,
        comment: &Comment,
    ) -> Result<Comment, ServiceError> {
        self.fetch(
            "add_comment",
            self.client
                .post(self.url(&format!("items/{}/comments", item_id)))
                .json(comment),
        )
        .await
    }

    pub async fn update_comment(&self, comment: &Comment) -> Result<Comment, ServiceError> {
        let id = comment.id.ok_or(ServiceError::MissingId)?;
        self.fetch(
            "update_comment",
            self.client.put(self.url(&format!("comments/{}", id))).json(comment),
        )
        .await
    }

    pub async fn delete_comment(&self, id: i64) -> Result<(), ServiceError> {
        self.execute(
            "delete_comment",
            self.client.delete(self.url(&format!("comments/{}", id))),
        )
        .await?;
        Ok(())
    }

    // ========================
    // Plumbing
    // ========================

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let response = self.execute(operation, request).await?;
        let status = response.status();
        response
            .json::<T>()
            .await
            .map_err(|e| handle_error(operation, Some(status), &e.to_string(), None))
    }

    /// Send the request and reject anything but a success status
    async fn execute(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, ServiceError> {
        debug!(operation, "Sending request");
        let response = request
            .headers(json_headers())
            .send()
            .await
            .map_err(|e| handle_error(operation, None, &e.to_string(), None))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(handle_error(operation, Some(status), "unsuccessful status", Some(&body)))
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

fn listing_path(listing: &str, n: Option<i64>) -> String {
    match n {
        Some(n) => format!("items/{}/{}", listing, n),
        None => format!("items/{}", listing),
    }
}

/// Log a failed call and normalize it into a [`ServiceError`]
fn handle_error(
    operation: &str,
    status: Option<StatusCode>,
    detail: &str,
    body: Option<&str>,
) -> ServiceError {
    let message = body
        .and_then(|b| serde_json::from_str::<ErrorBody>(b).ok())
        .map(|b| b.error)
        .unwrap_or_else(|| GENERIC_MESSAGE.to_string());

    error!(operation, status = ?status, detail, message = %message, "Request failed");

    ServiceError::Server {
        status: status.map(|s| s.as_u16()),
        message,
    }
}
