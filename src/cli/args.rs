//! Command-line argument definitions using clap derive macros.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::core::Capability;

const EXAMPLES: &str = "\
Examples:
  langm add /opt/node-v20            Detect and register a runtime
  langm add /opt/graalvm-25 --java   Register as a Java runtime
  langm add -node /opt/node-v20      Legacy flag spelling
  langm list                         List all runtimes
  langm list node                    List Node.js runtimes
  langm use                          Pick the active runtime
  langm use java                     Pick the active Java runtime";

/// LangM - Multi-language runtime manager
///
/// Registers local runtime installations and switches the active one by
/// repointing a single `current` link.
#[derive(Parser, Debug)]
#[command(name = "langm")]
#[command(about = "Multi-language runtime manager", long_about = None)]
#[command(disable_version_flag = true)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Increase log verbosity (--verbose, --verbose --verbose)
    #[arg(long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a runtime directory
    Add {
        /// Root directory of the runtime installation
        path: PathBuf,
        /// Register as a Node.js runtime, skipping detection
        #[arg(short = 'n', long, conflicts_with = "java")]
        node: bool,
        /// Register as a Java runtime, skipping detection
        #[arg(short = 'j', long)]
        java: bool,
    },

    /// List registered runtimes
    #[command(visible_alias = "ls")]
    List {
        /// Only show runtimes with this capability (node or java)
        capability: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Select the active runtime
    Use {
        /// Only offer runtimes with this capability (node or java)
        capability: Option<String>,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

impl Commands {
    /// Capability forced by `add --node` / `add --java`
    #[must_use]
    pub fn forced_capability(node: bool, java: bool) -> Option<Capability> {
        match (node, java) {
            (true, _) => Some(Capability::Node),
            (_, true) => Some(Capability::Java),
            _ => None,
        }
    }

    /// Resolve the positional filter of `list` / `use`
    ///
    /// A token that is not a known capability does not filter at all.
    #[must_use]
    pub fn capability_filter(raw: Option<&str>) -> Option<Capability> {
        let raw = raw?;
        match raw.parse::<Capability>() {
            Ok(cap) => Some(cap),
            Err(_) => {
                tracing::debug!(filter = raw, "unknown capability, showing all runtimes");
                None
            }
        }
    }
}

impl Cli {
    /// Parse `args`, accepting the single-dash `-node` / `-java` spellings
    pub fn try_parse_normalized<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_legacy_flags(args))
    }
}

/// Rewrite `-node` and `-java` to their long forms
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str() {
            Some("-node") => OsString::from("--node"),
            Some("-java") => OsString::from("--java"),
            _ => arg,
        })
        .collect()
}
