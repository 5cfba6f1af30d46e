//! cj-run - trigger a remote test case or collection and wait for the verdict
//!
//! Inputs come from flags or the `INPUT_*` variables of a GitHub Actions
//! step. The verdict is printed, written to `GITHUB_OUTPUT` when set, and
//! mapped to the exit code.

use clap::Parser;
use cj_run::backend::HttpTransport;
use cj_run::common::{config::Config, logging};
use cj_run::{output, ActionInputs, Orchestrator, Outcome};

#[tokio::main]
async fn main() {
    logging::init_cli();

    let inputs = ActionInputs::parse();
    let outcome = execute(&inputs).await;

    output::print_outcome(&outcome);

    if let Some(path) = std::env::var_os("GITHUB_OUTPUT") {
        if let Err(e) = output::append_result(std::path::Path::new(&path), &outcome) {
            eprintln!("Error: could not write action output: {e}");
        }
    }

    std::process::exit(output::exit_code(&outcome));
}

async fn execute(inputs: &ActionInputs) -> Outcome {
    let config = match Config::load(inputs.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return Outcome::failed(e.to_string()),
    };

    // Dropped at the end of this scope, closing pooled connections
    let transport = match HttpTransport::new(&config.backend) {
        Ok(transport) => transport,
        Err(e) => return Outcome::failed(e.to_string()),
    };

    Orchestrator::new(&config, &transport).run(inputs).await
}
