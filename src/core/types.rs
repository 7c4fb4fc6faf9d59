//! Common types used throughout LangM

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a registered directory can be used as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Node,
    Java,
}

impl Capability {
    /// Get all capabilities, in detection order
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Node, Self::Java]
    }

    /// Lowercase tag as written in the registry and on the command line.
    /// Also the name of the executable under `bin/` that proves it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Java => "java",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "java" => Ok(Self::Java),
            other => Err(format!("unknown capability '{other}', expected node or java")),
        }
    }
}

/// A registered runtime installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    /// Unique name, taken from the final segment of `path`
    pub name: String,
    /// Absolute path of the installation root
    pub path: String,
    /// Declared capabilities, in declaration order
    pub capabilities: Vec<Capability>,
}

impl Runtime {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        capabilities: Vec<Capability>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            capabilities,
        }
    }

    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Comma separated capability list for display
    #[must_use]
    pub fn capability_list(&self) -> String {
        self.capabilities
            .iter()
            .map(Capability::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The persisted registry: every known runtime and the active one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    /// Name of the active runtime. Not checked against `runtimes`.
    pub current: Option<String>,
    /// Registered runtimes in registration order
    pub runtimes: Vec<Runtime>,
}

/// Group runtimes by capability.
///
/// Groups appear in the order their capability is first seen while walking
/// `runtimes`; a runtime shows up once in every group it declares.
pub fn group_by_capability<'a, I>(runtimes: I) -> Vec<(Capability, Vec<&'a Runtime>)>
where
    I: IntoIterator<Item = &'a Runtime>,
{
    let mut groups: Vec<(Capability, Vec<&'a Runtime>)> = Vec::new();
    for runtime in runtimes {
        for cap in &runtime.capabilities {
            match groups.iter_mut().find(|(c, _)| c == cap) {
                Some((_, members)) => members.push(runtime),
                None => groups.push((*cap, vec![runtime])),
            }
        }
    }
    groups
}
