//! LangM Test Infrastructure
//!
//! Runs the real binary against a throwaway LangM home.

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod assertions;

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

pub use langm_lib::core::testing::RuntimeDirBuilder;

/// Result from running a langm command
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

impl CommandResult {
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }

    pub fn assert_success(&self) {
        assert!(
            self.success,
            "Command failed with exit code {}:\nstdout: {}\nstderr: {}",
            self.exit_code, self.stdout, self.stderr
        );
    }

    pub fn assert_failure(&self) {
        assert!(
            !self.success,
            "Command unexpectedly succeeded:\nstdout: {}\nstderr: {}",
            self.stdout, self.stderr
        );
    }

    pub fn assert_stdout_contains(&self, needle: &str) {
        assert!(
            self.stdout.contains(needle),
            "stdout does not contain '{needle}'\nstdout: {}",
            self.stdout
        );
    }

    pub fn assert_stderr_contains(&self, needle: &str) {
        assert!(
            self.stderr.contains(needle),
            "stderr does not contain '{needle}'\nstderr: {}",
            self.stderr
        );
    }
}

/// A temporary LangM home plus a directory for fake runtime installs
pub struct TestHome {
    pub dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    pub fn installs(&self) -> PathBuf {
        self.dir.path().join("installs")
    }

    pub fn config_path(&self) -> PathBuf {
        self.home().join("config.json")
    }

    /// Create a fake runtime installation, returning its root
    pub fn runtime(&self, name: &str, node: bool, java: bool) -> PathBuf {
        let mut builder = RuntimeDirBuilder::new(&self.installs(), name);
        if node {
            builder = builder.with_node();
        }
        if java {
            builder = builder.with_java();
        }
        builder.build()
    }

    pub fn read_config(&self) -> serde_json::Value {
        let text = std::fs::read_to_string(self.config_path()).expect("config.json missing");
        serde_json::from_str(&text).expect("config.json is not JSON")
    }

    /// Run langm with this home
    pub fn run(&self, args: &[&str]) -> CommandResult {
        let home = self.home();
        run_langm_with_options(args, Some(self.dir.path()), &[("LANGM_HOME", home.as_path())])
    }
}

/// Run langm against a fresh, empty home
pub fn run_langm(args: &[&str]) -> CommandResult {
    TestHome::new().run(args)
}

/// Run a langm command with full options
pub fn run_langm_with_options(
    args: &[&str],
    dir: Option<&Path>,
    env_vars: &[(&str, &Path)],
) -> CommandResult {
    let start = Instant::now();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_langm"));
    cmd.args(args)
        .env_remove("LANGM_LOG")
        .env_remove("LANGM_SETTINGS")
        .env("NO_COLOR", "1")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(d) = dir {
        cmd.current_dir(d);
    }

    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    let output = cmd.output().expect("Failed to execute langm");
    let duration = start.elapsed();

    CommandResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        duration,
    }
}
