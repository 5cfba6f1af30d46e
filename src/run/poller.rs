//! Status polling for a single test case run

use super::types::{RunStatus, TestRunStatus};
use crate::backend::{endpoints, Reply, Session};
use crate::common::config::PollPlan;
use crate::common::{Error, Result};

/// How a polling loop reacts to a failed or unreadable status fetch
///
/// Both loops share the same attempt budget; a retried fetch consumes an
/// attempt like any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Abort on the first failed fetch
    FailFast,
    /// Log the failed fetch and try again after the interval
    SoftRetry,
}

/// Outcome of inspecting one successful status fetch
pub enum Poll<T> {
    Ready(T),
    Pending,
}

/// Bounded polling loop shared by both run kinds
///
/// Fetches `path` up to `plan.max_attempts` times, sleeping `plan.interval`
/// between attempts. A non-200 reply, or an [`Error::FetchFailed`] returned
/// by `inspect`, is handled according to `policy`; any other error from
/// `inspect` aborts the loop. Returns `Ok(None)` when the budget is spent.
pub async fn poll_with<T, F>(
    session: &Session<'_>,
    path: &str,
    plan: PollPlan,
    policy: RetryPolicy,
    mut inspect: F,
) -> Result<Option<T>>
where
    F: FnMut(&Reply) -> Result<Poll<T>>,
{
    for attempt in 1..=plan.max_attempts {
        let reply = session.get(path).await?;

        let outcome = if reply.status == 200 {
            inspect(&reply)
        } else {
            Err(Error::fetch_failed(reply.status, &reply.payload()))
        };

        match outcome {
            Ok(Poll::Ready(value)) => return Ok(Some(value)),
            Ok(Poll::Pending) => {
                tracing::debug!(attempt, max_attempts = plan.max_attempts, path, "Not finished yet");
            }
            Err(e @ Error::FetchFailed { .. }) if policy == RetryPolicy::SoftRetry => {
                tracing::warn!(attempt, path, error = %e, "Status fetch failed, retrying");
            }
            Err(e) => {
                tracing::warn!(attempt, path, category = e.category(), "Polling aborted");
                return Err(e);
            }
        }

        if attempt < plan.max_attempts {
            tokio::time::sleep(plan.interval).await;
        }
    }

    Ok(None)
}

/// Poll `GET /test-run/{run_id}` until the run passes or fails
///
/// Returns the terminal status document, [`Error::FetchFailed`] on the first
/// non-200 or unreadable reply, or [`Error::RunTimeout`] once the attempt
/// budget is spent.
pub async fn poll_until_terminal(
    session: &Session<'_>,
    run_id: &str,
    plan: PollPlan,
) -> Result<TestRunStatus> {
    let path = endpoints::test_run(run_id);

    let terminal = poll_with(session, &path, plan, RetryPolicy::FailFast, |reply| {
        let status: TestRunStatus = reply
            .json()
            .map_err(|e| Error::fetch_failed(reply.status, &e.to_string()))?;
        tracing::info!(run_id, status = ?status.status, "Polled test run");
        Ok(if status.status.is_terminal() {
            Poll::Ready(status)
        } else {
            Poll::Pending
        })
    })
    .await?;

    terminal.ok_or(Error::RunTimeout)
}

/// Message for a terminal single run: success flag plus display text
pub fn verdict(status: &TestRunStatus) -> (bool, String) {
    match status.status {
        RunStatus::Passed => (true, "Test passed!".to_string()),
        _ => (
            false,
            status
                .error_message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Test failed.".to_string()),
        ),
    }
}
