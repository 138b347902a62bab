//! Remote store client - list, create and update against the REST API

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Resource collections exposed by the API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Products,
    Categories,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Categories => "categories",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {source}")]
    Connect {
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("server responded with status {status}")]
    Status { status: u16 },

    #[error("rejected: {message}")]
    Validation { message: String },

    #[error("unexpected response body: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StoreError::Timeout
        } else if e.is_connect() {
            StoreError::Connect { source: e }
        } else {
            StoreError::Transport { source: e }
        }
    }

    /// Transport failures and non-success statuses
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            StoreError::Timeout
                | StoreError::Connect { .. }
                | StoreError::Transport { .. }
                | StoreError::Status { .. }
        )
    }
}

/// Thin wrapper around `reqwest::Client` bound to one API base URL
#[derive(Clone, Debug)]
pub struct StoreClient {
    http: reqwest::Client,
    base: String,
}

impl StoreClient {
    /// A zero timeout leaves requests unbounded
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| StoreError::ClientBuild { source })?;
        Ok(StoreClient {
            http,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base, resource.as_str())
    }

    /// GET the whole collection
    pub async fn list<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>, StoreError> {
        let req = self.http.get(self.url(resource));
        read_json(req).await
    }

    /// POST a new record
    pub async fn create<B, T>(&self, resource: Resource, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.http.post(self.url(resource)).json(body);
        read_json(req).await
    }

    /// PUT over an existing record
    pub async fn update<B, T>(&self, resource: Resource, id: i64, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self
            .http
            .put(format!("{}/{}", self.url(resource), id))
            .json(body);
        read_json(req).await
    }
}

async fn read_json<T: DeserializeOwned>(req: reqwest::RequestBuilder) -> Result<T, StoreError> {
    let resp = req.send().await.map_err(StoreError::from_send)?;
    let status = resp.status();
    let body = resp.text().await.map_err(StoreError::from_send)?;

    if status == StatusCode::BAD_REQUEST {
        return Err(StoreError::Validation {
            message: rejection_message(&body),
        });
    }
    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
        });
    }

    serde_json::from_str(&body).map_err(|source| StoreError::Decode { source })
}

/// Pull the server's `message` out of an error body (string or list of strings)
fn rejection_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| match json.get("message") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        });

    match message {
        Some(m) if !m.is_empty() => m,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => String::from("bad request"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_list() {
        let body = r#"{"message":["price must be a positive number","images must be an array"],"error":"Bad Request","statusCode":400}"#;
        assert_eq!(
            rejection_message(body),
            "price must be a positive number; images must be an array"
        );
    }

    #[test]
    fn test_rejection_message_fallbacks() {
        assert_eq!(rejection_message(r#"{"message":"nope"}"#), "nope");
        assert_eq!(rejection_message("plain text"), "plain text");
        assert_eq!(rejection_message(""), "bad request");
    }

    #[test]
    fn test_base_trailing_slash_trimmed() {
        let client = StoreClient::new("http://localhost:1/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base(), "http://localhost:1/api");
        assert_eq!(client.url(Resource::Categories), "http://localhost:1/api/categories");
    }

    #[test]
    fn test_error_taxonomy() {
        assert!(StoreError::Status { status: 500 }.is_network());
        assert!(StoreError::Timeout.is_network());
        assert!(!StoreError::Validation { message: String::new() }.is_network());
    }
}
