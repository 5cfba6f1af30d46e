//! Backend access
//!
//! The engine talks to the backend through the [`Transport`] trait so that
//! HTTP status interpretation stays in the engine and tests can replay
//! scripted replies.

pub mod endpoints;
mod http;
pub mod scripted;

pub use http::HttpTransport;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::common::Result;

/// Raw backend reply: status code plus the undecoded body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }

    /// Body for display: compact JSON when it parses, the raw text otherwise
    pub fn payload(&self) -> String {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(value) => value.to_string(),
            Err(_) => self.body.trim().to_string(),
        }
    }
}

/// Transport used to reach the backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET against `path` (relative to the API base URL)
    async fn get(&self, path: &str, bearer: &str) -> Result<Reply>;

    /// Issue a POST against `path`, with a JSON body when one is given
    async fn post(&self, path: &str, bearer: &str, body: Option<&Value>) -> Result<Reply>;
}

/// A transport bound to the bearer of the current invocation
///
/// The bearer starts as the service account key and is replaced by the
/// session token after login.
pub struct Session<'a> {
    transport: &'a dyn Transport,
    bearer: String,
}

impl<'a> Session<'a> {
    pub fn new(transport: &'a dyn Transport, credential: &str) -> Self {
        Self {
            transport,
            bearer: credential.to_string(),
        }
    }

    /// Attach a session token to every subsequent request
    pub fn authorize(&mut self, token: String) {
        self.bearer = token;
    }

    pub async fn get(&self, path: &str) -> Result<Reply> {
        self.transport.get(path, &self.bearer).await
    }

    pub async fn post(&self, path: &str, body: Option<&Value>) -> Result<Reply> {
        self.transport.post(path, &self.bearer, body).await
    }
}
