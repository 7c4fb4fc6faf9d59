//! Custom assertions for langm tests

#![allow(dead_code)]

use super::CommandResult;

/// Assert that output matches expected patterns
pub fn assert_output_matches(result: &CommandResult, patterns: &[&str]) {
    for pattern in patterns {
        assert!(
            result.contains(pattern),
            "Output does not contain '{pattern}':\n{}\n{}",
            result.stdout,
            result.stderr
        );
    }
}

/// Assert that a failure was reported the way every command reports one
pub fn assert_reported_error(result: &CommandResult, message: &str) {
    result.assert_failure();
    assert_eq!(result.exit_code, 1, "stderr: {}", result.stderr);
    assert!(
        result.stderr.starts_with("Error: "),
        "stderr does not start with 'Error: ':\n{}",
        result.stderr
    );
    result.assert_stderr_contains(message);
}

/// Names of the registered runtimes, in order
pub fn registered_names(config: &serde_json::Value) -> Vec<String> {
    config["runtimes"]
        .as_array()
        .map(|runtimes| {
            runtimes
                .iter()
                .filter_map(|r| r["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
