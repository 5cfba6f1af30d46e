//! CLI input definitions
//!
//! Every option can also be supplied through the `INPUT_*` environment
//! variables a GitHub Actions runner sets for the action's inputs.

use clap::Parser;
use std::path::PathBuf;

use crate::common::config::WaitTimeout;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "cj-run", about = "Run a remote test case or collection and wait for the verdict")]
#[command(version, long_about = None)]
pub struct ActionInputs {
    /// Test case to run
    #[arg(long, env = "INPUT_TEST_ID")]
    pub test_id: Option<String>,

    /// Collection (test suite) to run; used when no test case id is given
    #[arg(long, env = "INPUT_TEST_SUITE_ID")]
    pub test_suite_id: Option<String>,

    /// Service account key exchanged for a session token
    #[arg(long, env = "INPUT_SERVICE_ACCOUNT_KEY", hide_env_values = true)]
    pub service_account_key: Option<String>,

    /// Website URL the run should target instead of the stored one
    #[arg(long, env = "INPUT_WEBSITE_URL_OVERRIDE")]
    pub website_url_override: Option<String>,

    /// JSON object of parameter overrides
    #[arg(long, env = "INPUT_PARAMS_OVERRIDE")]
    pub params_override: Option<String>,

    /// Maximum seconds to wait for a verdict (30-900)
    #[arg(long, env = "INPUT_WAIT_TIMEOUT_SECONDS", default_value_t = WaitTimeout::DEFAULT_SECS)]
    pub wait_timeout_seconds: u64,

    /// Path to a TOML configuration file
    #[arg(long, env = "CJ_RUN_CONFIG")]
    pub config: Option<PathBuf>,
}
