//! Test helpers and utilities

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{JsonFileStore, Registry};
use crate::core::testing::RuntimeDirBuilder;
use crate::runtimes::SymlinkSwitcher;

/// Isolated LangM state directory plus a place for fake runtimes
pub struct TestContext {
    temp_dir: TempDir,
    home: PathBuf,
    installs: PathBuf,
}

impl TestContext {
    /// Create a new test context with temporary directories
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path().join("langm-home");
        let installs = temp_dir.path().join("installs");
        fs::create_dir_all(&installs).unwrap();

        Self {
            temp_dir,
            home,
            installs,
        }
    }

    /// Root of the temporary directory
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The LangM state directory (not created until something writes to it)
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Directory holding fake runtime installations
    pub fn installs(&self) -> &Path {
        &self.installs
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.json")
    }

    /// Start a fake runtime installation under [`Self::installs`]
    pub fn runtime_dir(&self, name: &str) -> RuntimeDirBuilder {
        RuntimeDirBuilder::new(&self.installs, name)
    }

    /// A fresh registry over this context's config.json
    pub fn registry(&self) -> Registry<JsonFileStore> {
        Registry::new(JsonFileStore::new(self.config_path()))
    }

    pub fn switcher(&self) -> SymlinkSwitcher {
        SymlinkSwitcher::new(&self.home)
    }

    /// The registry document as raw JSON
    pub fn read_config(&self) -> serde_json::Value {
        let text = fs::read_to_string(self.config_path()).unwrap();
        serde_json::from_str(&text).unwrap()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
