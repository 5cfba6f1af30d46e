//! Data model shared by the run engine

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::common::{Error, Result};

/// Status of a single test case run as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    Pending,
    Passed,
    Failed,
    /// Any value this client does not know; treated as not yet terminal
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Passed | RunStatus::Failed)
    }
}

/// Decode a `status` field without ever failing the enclosing document
///
/// `null` reads as pending; a non-string value reads as unknown.
fn lenient_status<'de, D>(deserializer: D) -> std::result::Result<RunStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => RunStatus::Pending,
        raw @ Value::String(_) => serde_json::from_value(raw).unwrap_or(RunStatus::Unknown),
        _ => RunStatus::Unknown,
    })
}

/// `null` and a missing key both read as an empty list
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `GET /test-run/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TestRunStatus {
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: RunStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Optional run-time overrides sent with a trigger request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_overrides: Option<Map<String, Value>>,
}

impl RunSettings {
    /// Build settings from raw inputs
    ///
    /// `params_override` must be a JSON object; anything else is rejected
    /// before a request is made.
    pub fn from_inputs(website_url_override: Option<&str>, params_override: Option<&str>) -> Result<Self> {
        let parameter_overrides = match params_override {
            Some(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Some(map),
                Ok(other) => {
                    return Err(Error::InvalidParamsOverride(format!(
                        "expected a JSON object, got {}",
                        json_kind(&other)
                    )))
                }
                Err(e) => return Err(Error::InvalidParamsOverride(e.to_string())),
            },
            None => None,
        };

        Ok(Self {
            website_url_override: website_url_override.map(str::to_string),
            parameter_overrides,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.website_url_override.is_none() && self.parameter_overrides.is_none()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// What a trigger call hands to the polling stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunHandle {
    /// Run id of a single test case run
    Run(String),
    /// A collection batch. `created_at` is the instant the backend reported
    /// for the trigger and the only key linking the batch to its runs.
    Batch {
        collection_id: String,
        created_at: DateTime<Utc>,
    },
}

/// One test case run nested under a collection
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedRun {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: RunStatus,
    /// Kept raw: a missing or non-string value must not break the whole
    /// history, only exclude this run from matching
    #[serde(default)]
    pub created_at: Value,
}

impl LinkedRun {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_str().and_then(parse_timestamp)
    }
}

/// Body of `GET /test-suites/collection/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionStatus {
    #[serde(default)]
    pub test_suite_id: Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub linked_runs: Vec<LinkedRun>,
}

/// Final tally of a finished collection batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub passed_count: usize,
    pub failed_count: usize,
    pub final_link: String,
}

impl AggregateResult {
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed. See status here: {}",
            self.passed_count, self.failed_count, self.final_link
        )
    }
}

/// Render a JSON id (string or number) as plain text
pub fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse an ISO 8601 timestamp; offset-less values are taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Render a timestamp the way the web app expects it in query strings
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
