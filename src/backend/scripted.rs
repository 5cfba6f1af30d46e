//! Scripted transport for tests
//!
//! Replies are queued per `METHOD path`. The last queued reply for a route
//! is repeated once the queue drains, so a finished run keeps reporting the
//! same state. Every request is recorded for later assertions.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::{Reply, Transport};
use crate::common::{Error, Result};

/// A request observed by [`ScriptedTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub bearer: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `GET path`
    pub fn on_get(self, path: &str, reply: Reply) -> Self {
        self.push("GET", path, reply)
    }

    /// Queue a reply for `POST path`
    pub fn on_post(self, path: &str, reply: Reply) -> Self {
        self.push("POST", path, reply)
    }

    fn push(self, method: &str, path: &str, reply: Reply) -> Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry(route_key(method, path))
                .or_default()
                .push_back(reply);
        }
        self
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests received for `METHOD path`
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn next_reply(&self, method: &'static str, path: &str, bearer: &str, body: Option<&Value>) -> Result<Reply> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(Recorded {
                method,
                path: path.to_string(),
                bearer: bearer.to_string(),
                body: body.cloned(),
            });
        }

        let mut routes = self
            .routes
            .lock()
            .map_err(|_| Error::Internal("scripted transport lock poisoned".to_string()))?;
        let queue = routes
            .get_mut(&route_key(method, path))
            .ok_or_else(|| Error::Internal(format!("no scripted reply for {} {}", method, path)))?;

        match queue.len() {
            0 => Err(Error::Internal(format!("no scripted reply for {} {}", method, path))),
            1 => Ok(queue[0].clone()),
            _ => Ok(queue.pop_front().unwrap_or_else(|| Reply::new(500, ""))),
        }
    }
}

fn route_key(method: &str, path: &str) -> String {
    format!("{} {}", method, path)
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str, bearer: &str) -> Result<Reply> {
        self.next_reply("GET", path, bearer, None)
    }

    async fn post(&self, path: &str, bearer: &str, body: Option<&Value>) -> Result<Reply> {
        self.next_reply("POST", path, bearer, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_reply_repeats() {
        let transport = ScriptedTransport::new()
            .on_get("/a", Reply::new(200, "1"))
            .on_get("/a", Reply::new(200, "2"));

        assert_eq!(transport.get("/a", "t").await.unwrap().body, "1");
        assert_eq!(transport.get("/a", "t").await.unwrap().body, "2");
        assert_eq!(transport.get("/a", "t").await.unwrap().body, "2");
        assert_eq!(transport.count("GET", "/a"), 3);
    }

    #[tokio::test]
    async fn test_unscripted_route_fails() {
        let transport = ScriptedTransport::new();
        assert!(transport.post("/missing", "t", None).await.is_err());
        assert_eq!(transport.requests().len(), 1);
    }
}
