//! Orchestrator: authenticate, trigger, poll, aggregate, verdict
//!
//! Every failure, including a panic inside the engine, ends as a failed
//! [`Outcome`]; nothing propagates to the caller.

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;

use super::aggregate::poll_and_aggregate;
use super::auth::login;
use super::poller::{poll_until_terminal, verdict};
use super::trigger::{trigger_collection, trigger_single};
use super::types::{RunHandle, RunSettings};
use crate::backend::{Session, Transport};
use crate::commands::ActionInputs;
use crate::common::config::{Config, PollPlan, WaitTimeout, POLL_INTERVAL};
use crate::common::{non_empty, Error, Result};

/// Final result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Inputs after validation, before any request is made
struct Plan<'i> {
    credential: &'i str,
    test_id: Option<&'i str>,
    collection_id: Option<&'i str>,
    settings: RunSettings,
    poll: PollPlan,
}

pub struct Orchestrator<'a> {
    config: &'a Config,
    transport: &'a dyn Transport,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    /// Run one invocation to completion
    pub async fn run(&self, inputs: &ActionInputs) -> Outcome {
        match AssertUnwindSafe(self.execute(inputs)).catch_unwind().await {
            Ok(Ok(outcome)) => {
                tracing::info!(success = outcome.success, "Run finished");
                outcome
            }
            Ok(Err(e)) if e.is_config() => {
                tracing::warn!(category = e.category(), "Rejected inputs: {}", e);
                Outcome::failed(e.to_string())
            }
            Ok(Err(e)) => {
                tracing::error!(category = e.category(), "{}", e);
                Outcome::failed(e.to_string())
            }
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unexpected internal fault".to_string());
                tracing::error!(category = "Internal", "Run aborted: {}", detail);
                Outcome::failed(format!("Failed: {}", detail))
            }
        }
    }

    async fn execute(&self, inputs: &ActionInputs) -> Result<Outcome> {
        let plan = self.validate(inputs)?;

        let mut session = Session::new(self.transport, plan.credential);
        login(&mut session).await?;

        let handle = match (plan.test_id, plan.collection_id) {
            (Some(test_id), _) => trigger_single(&session, test_id, &plan.settings).await?,
            (None, Some(collection_id)) => {
                trigger_collection(&session, collection_id, &plan.settings).await?
            }
            (None, None) => return Err(Error::MissingTarget),
        };

        match handle {
            RunHandle::Run(run_id) => {
                let status = poll_until_terminal(&session, &run_id, plan.poll).await?;
                let (success, message) = verdict(&status);
                Ok(Outcome { success, message })
            }
            RunHandle::Batch {
                collection_id,
                created_at,
            } => {
                let result = poll_and_aggregate(
                    &session,
                    &collection_id,
                    &created_at,
                    plan.poll,
                    &self.config.backend.app_url,
                )
                .await?;
                Ok(Outcome {
                    success: result.failed_count == 0,
                    message: result.summary(),
                })
            }
        }
    }

    fn validate<'i>(&self, inputs: &'i ActionInputs) -> Result<Plan<'i>> {
        let credential = non_empty(&inputs.service_account_key).ok_or(Error::MissingCredential)?;
        let wait = WaitTimeout::new(inputs.wait_timeout_seconds)?;
        let settings = RunSettings::from_inputs(
            non_empty(&inputs.website_url_override),
            non_empty(&inputs.params_override),
        )?;
        let poll = PollPlan::new(wait, POLL_INTERVAL);

        tracing::debug!(
            wait_secs = wait.secs(),
            max_attempts = poll.max_attempts,
            has_settings = !settings.is_empty(),
            "Inputs validated"
        );

        Ok(Plan {
            credential,
            test_id: non_empty(&inputs.test_id),
            collection_id: non_empty(&inputs.test_suite_id),
            settings,
            poll,
        })
    }
}
