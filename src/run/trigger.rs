//! Run trigger: start a single test case or a whole collection

use serde_json::{json, Value};

use super::types::{id_text, parse_timestamp, RunHandle, RunSettings};
use crate::backend::{endpoints, Session};
use crate::common::{Error, Result};

/// Start a single test case run
///
/// Settings are nested under `settings` and left out when empty.
/// Succeeds only on HTTP 201 with a run id in the body.
pub async fn trigger_single(
    session: &Session<'_>,
    test_case_id: &str,
    settings: &RunSettings,
) -> Result<RunHandle> {
    let body = single_body(settings)?;
    let reply = session
        .post(&endpoints::trigger_test_run(test_case_id), Some(&body))
        .await?;

    if reply.status != 201 {
        tracing::warn!(status = reply.status, test_case_id, "Test run rejected");
        return Err(Error::TestRunRejected(reply.payload()));
    }

    let run_id = reply
        .json::<Value>()
        .ok()
        .as_ref()
        .and_then(id_text)
        .ok_or_else(|| Error::TestRunRejected(reply.payload()))?;

    tracing::info!(test_case_id, run_id = %run_id, "Test run created");
    Ok(RunHandle::Run(run_id))
}

/// Start every test case of a collection
///
/// The body is the settings object itself. Succeeds only on HTTP 200 with
/// an ISO 8601 timestamp in the body, which becomes the batch handle.
pub async fn trigger_collection(
    session: &Session<'_>,
    collection_id: &str,
    settings: &RunSettings,
) -> Result<RunHandle> {
    let body = serde_json::to_value(settings)?;
    let reply = session
        .post(&endpoints::trigger_collection(collection_id), Some(&body))
        .await?;

    if reply.status != 200 {
        tracing::warn!(status = reply.status, collection_id, "Collection run rejected");
        return Err(Error::SuiteRunRejected(reply.payload()));
    }

    let created_at = reply
        .json::<String>()
        .ok()
        .as_deref()
        .and_then(parse_timestamp)
        .ok_or(Error::InvalidTimestamp)?;

    tracing::info!(collection_id, %created_at, "Collection run created");
    Ok(RunHandle::Batch {
        collection_id: collection_id.to_string(),
        created_at,
    })
}

fn single_body(settings: &RunSettings) -> Result<Value> {
    if settings.is_empty() {
        return Ok(json!({}));
    }
    Ok(json!({ "settings": serde_json::to_value(settings)? }))
}
