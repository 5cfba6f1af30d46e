//! Result aggregation for collection runs
//!
//! The collection status endpoint returns every linked run the collection
//! has ever produced. The runs belonging to this invocation are the ones
//! whose `created_at` equals the timestamp returned by the trigger call.
//! That matching rule lives in [`select_batch`] alone.

use chrono::{DateTime, Utc};

use super::poller::{poll_with, Poll, RetryPolicy};
use super::types::{
    format_timestamp, id_text, AggregateResult, CollectionStatus, LinkedRun, RunStatus,
};
use crate::backend::{endpoints, Session};
use crate::common::config::PollPlan;
use crate::common::{Error, Result};

/// Policy used for collection runs: the status endpoint occasionally
/// returns transient errors or unreadable payloads
pub const COLLECTION_POLICY: RetryPolicy = RetryPolicy::SoftRetry;

/// Linked runs created by the batch started at `created_at`
pub fn select_batch<'a>(linked_runs: &'a [LinkedRun], created_at: &DateTime<Utc>) -> Vec<&'a LinkedRun> {
    linked_runs
        .iter()
        .filter(|run| match run.created_at() {
            Some(ts) => ts == *created_at,
            None => {
                tracing::warn!(created_at = %run.created_at, "Skipping linked run with unreadable timestamp");
                false
            }
        })
        .collect()
}

/// Pass/fail counts over one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub matched: usize,
}

impl Tally {
    pub fn of(batch: &[&LinkedRun]) -> Self {
        batch.iter().fold(
            Self {
                matched: batch.len(),
                ..Self::default()
            },
            |mut tally, run| {
                match run.status {
                    RunStatus::Passed => tally.passed += 1,
                    RunStatus::Failed => tally.failed += 1,
                    RunStatus::Pending | RunStatus::Unknown => {}
                }
                tally
            },
        )
    }

    /// Every matched run has reached a terminal status
    pub fn is_finished(&self) -> bool {
        self.passed + self.failed == self.matched
    }
}

/// Inspect one collection status document
///
/// Empty history and a history without this batch are both fatal.
pub fn evaluate(
    status: &CollectionStatus,
    collection_id: &str,
    created_at: &DateTime<Utc>,
    app_url: &str,
) -> Result<Poll<AggregateResult>> {
    if status.linked_runs.is_empty() {
        return Err(Error::NoLinkedRuns);
    }

    let batch = select_batch(&status.linked_runs, created_at);
    if batch.is_empty() {
        return Err(Error::NoTargetRun);
    }

    let tally = Tally::of(&batch);
    tracing::info!(
        passed = tally.passed,
        failed = tally.failed,
        total = tally.matched,
        "Collection progress"
    );

    if !tally.is_finished() {
        return Ok(Poll::Pending);
    }

    Ok(Poll::Ready(AggregateResult {
        passed_count: tally.passed,
        failed_count: tally.failed,
        final_link: final_link(app_url, status, collection_id, created_at),
    }))
}

fn final_link(
    app_url: &str,
    status: &CollectionStatus,
    collection_id: &str,
    created_at: &DateTime<Utc>,
) -> String {
    format!(
        "{}/collections/{}/{}?created_at={}",
        app_url.trim_end_matches('/'),
        id_text(&status.test_suite_id).unwrap_or_default(),
        collection_id,
        format_timestamp(created_at)
    )
}

/// Poll the collection until every run of this batch has finished
pub async fn poll_and_aggregate(
    session: &Session<'_>,
    collection_id: &str,
    created_at: &DateTime<Utc>,
    plan: PollPlan,
    app_url: &str,
) -> Result<AggregateResult> {
    let path = endpoints::collection(collection_id);

    let result = poll_with(session, &path, plan, COLLECTION_POLICY, |reply| {
        let status: CollectionStatus = reply
            .json()
            .map_err(|e| Error::fetch_failed(reply.status, &e.to_string()))?;
        evaluate(&status, collection_id, created_at, app_url)
    })
    .await?;

    result.ok_or(Error::SuiteTimeout)
}
