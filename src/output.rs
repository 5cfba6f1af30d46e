//! Verdict publishing
//!
//! Prints the verdict and, inside GitHub Actions, appends it to the file
//! named by `GITHUB_OUTPUT` as the `result` output.

use colored::Colorize;
use std::io::Write;
use std::path::Path;

use crate::common::Result;
use crate::run::Outcome;

/// Output name the action exposes
pub const RESULT_KEY: &str = "result";

const DELIMITER: &str = "CJ_RUN_RESULT_EOF";

/// Format one `key=value` entry for a GitHub output file
///
/// Multi-line values use the heredoc form the runner expects.
pub fn format_entry(key: &str, value: &str) -> String {
    if value.contains('\n') {
        format!("{key}<<{DELIMITER}\n{value}\n{DELIMITER}\n")
    } else {
        format!("{key}={value}\n")
    }
}

/// Append the `result` entry to an output file
pub fn append_result(path: &Path, outcome: &Outcome) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(format_entry(RESULT_KEY, &outcome.message).as_bytes())?;
    Ok(())
}

/// Print the verdict: stdout always, stderr as well on failure
pub fn print_outcome(outcome: &Outcome) {
    println!("{}", outcome.message);
    if outcome.success {
        eprintln!("{} {}", "✓".green(), "Run succeeded".green().bold());
    } else {
        eprintln!("{} {}", "✗".red(), outcome.message.red().bold());
    }
}

/// Process exit code for an outcome
pub fn exit_code(outcome: &Outcome) -> i32 {
    if outcome.success {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_entry() {
        assert_eq!(format_entry("result", "Test passed!"), "result=Test passed!\n");
    }

    #[test]
    fn test_multi_line_entry() {
        assert_eq!(
            format_entry("result", "line one\nline two"),
            "result<<CJ_RUN_RESULT_EOF\nline one\nline two\nCJ_RUN_RESULT_EOF\n"
        );
    }

    #[test]
    fn test_append_keeps_existing_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "other=1\n").unwrap();

        append_result(&path, &Outcome::failed("Failed to login service account.")).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "other=1\nresult=Failed to login service account.\n"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&Outcome::passed("Test passed!")), 0);
        assert_eq!(exit_code(&Outcome::failed("nope")), 1);
    }
}
