//! Test fixtures and builders for common test scenarios

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Capability, Runtime};
use crate::runtimes::executable_name;

/// Builder for fake runtime installation directories on disk
#[derive(Debug, Clone)]
pub struct RuntimeDirBuilder {
    root: PathBuf,
    binaries: Vec<&'static str>,
}

impl RuntimeDirBuilder {
    /// A directory called `name` under `parent`
    pub fn new(parent: &Path, name: &str) -> Self {
        Self {
            root: parent.join(name),
            binaries: Vec::new(),
        }
    }

    /// Add `bin/node`
    #[must_use]
    pub fn with_node(mut self) -> Self {
        self.binaries.push("node");
        self
    }

    /// Add `bin/java`
    #[must_use]
    pub fn with_java(mut self) -> Self {
        self.binaries.push("java");
        self
    }

    /// Create the directory and its executables, returning the root
    pub fn build(self) -> PathBuf {
        fs::create_dir_all(&self.root).unwrap();
        for binary in &self.binaries {
            let bin = self.root.join("bin");
            fs::create_dir_all(&bin).unwrap();
            let exe = bin.join(executable_name(binary));
            fs::write(&exe, "#!/bin/sh\n").unwrap();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
            }
        }
        self.root
    }
}

/// Builder for registry entries
#[derive(Debug, Clone, Default)]
pub struct RuntimeFixture {
    name: String,
    capabilities: Vec<Capability>,
}

impl RuntimeFixture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Build the runtime. Defaults to `/opt/<name>` and `[node]`.
    #[must_use]
    pub fn build(self) -> Runtime {
        let path = format!("/opt/{}", self.name);
        let capabilities = if self.capabilities.is_empty() {
            vec![Capability::Node]
        } else {
            self.capabilities
        };
        Runtime::new(self.name, path, capabilities)
    }

    /// A Node.js install
    #[must_use]
    pub fn node(name: &str) -> Runtime {
        Self::new(name).capability(Capability::Node).build()
    }

    /// A JDK install
    #[must_use]
    pub fn jdk(name: &str) -> Runtime {
        Self::new(name).capability(Capability::Java).build()
    }

    /// A GraalVM install, usable as both Java and Node
    #[must_use]
    pub fn graalvm(name: &str) -> Runtime {
        Self::new(name)
            .capability(Capability::Java)
            .capability(Capability::Node)
            .build()
    }
}
