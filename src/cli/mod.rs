//! CLI module for LangM
//!
//! Handles command-line argument parsing and command dispatch.

use std::io::Write;

use anyhow::Result;

mod args;
pub mod commands;
pub mod completions;
pub mod prompt;
pub mod style;

pub use args::{Cli, Commands, normalize_legacy_flags};

use crate::config::{Registry, Settings};
use crate::runtimes::SymlinkSwitcher;

/// Global context for CLI command execution
pub struct CliContext {
    pub verbose: u8,
    pub quiet: bool,
    pub no_color: bool,
    pub settings: Settings,
}

impl CliContext {
    pub fn new(cli: &Cli, settings: Settings) -> Self {
        Self {
            verbose: cli.verbose,
            quiet: cli.quiet,
            no_color: cli.no_color,
            settings,
        }
    }

    /// Whether output may be coloured at all
    #[must_use]
    pub fn color_allowed(&self) -> bool {
        self.settings.color && !self.no_color
    }

    /// Default tracing filter when `LANGM_LOG` is not set
    #[must_use]
    pub fn log_directive(&self) -> String {
        if self.quiet {
            return "error".to_string();
        }
        match self.verbose {
            0 => self.settings.log_level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

/// A trait for modular CLI command execution
pub trait CommandRunner {
    /// Execute the command against the real registry and link
    fn execute(&self, ctx: &CliContext, out: &mut dyn Write) -> Result<()>;
}

impl CommandRunner for Commands {
    fn execute(&self, ctx: &CliContext, out: &mut dyn Write) -> Result<()> {
        match self {
            Commands::Add { path, node, java } => {
                let cwd = std::env::current_dir()?;
                let mut registry = Registry::open_default();
                commands::add(
                    &mut registry,
                    path,
                    Commands::forced_capability(*node, *java),
                    &cwd,
                    out,
                )
            }
            Commands::List { capability, json } => {
                let filter = Commands::capability_filter(capability.as_deref());
                let mut registry = Registry::open_default();
                commands::list(&mut registry, filter, *json, out)
            }
            Commands::Use { capability } => {
                let filter = Commands::capability_filter(capability.as_deref());
                let mut registry = Registry::open_default();
                let link = SymlinkSwitcher::default_location();
                let mut prompt = prompt::DialoguerPrompt::new(ctx.settings.prompt_page_size);
                commands::use_runtime(&mut registry, &link, &mut prompt, filter, out)
            }
            Commands::Completions { shell } => {
                completions::print_completions(*shell, out);
                Ok(())
            }
        }
    }
}
