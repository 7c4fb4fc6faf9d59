//! Interactive runtime selection
//!
//! Building the choice list is pure and lives in [`build_choices`]. Showing
//! it goes through the [`SelectionPrompt`] trait so `use` can be driven by a
//! scripted answer in tests and by dialoguer in the terminal.

use std::fmt::Write as _;
use std::io;
use std::sync::Once;

use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;

use crate::core::{Capability, LangmError, Result, Runtime, group_by_capability};

/// One entry in the selection list. Headers have an empty `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub value: String,
    pub detail: String,
}

impl Choice {
    pub fn new(
        label: impl Into<String>,
        value: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            detail: detail.into(),
        }
    }

    fn header(capability: Capability) -> Self {
        Self::new(format!("── {capability} ──"), "", "")
    }

    /// Group headers are shown but cannot be picked
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.value.is_empty()
    }
}

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(String),
    Cancelled,
}

/// Presents choices and reports which value the user picked
pub trait SelectionPrompt {
    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<Selection>;
}

/// Build the list shown by `langm use`.
///
/// With a filter every runtime is one flat entry. Without one, runtimes are
/// grouped per capability, each group preceded by a header entry.
#[must_use]
pub fn build_choices(runtimes: &[Runtime], filter: Option<Capability>) -> Vec<Choice> {
    if filter.is_some() {
        return runtimes
            .iter()
            .map(|r| Choice::new(&r.name, &r.name, &r.path))
            .collect();
    }

    let mut choices = Vec::new();
    for (capability, members) in group_by_capability(runtimes) {
        choices.push(Choice::header(capability));
        choices.extend(
            members
                .into_iter()
                .map(|r| Choice::new(format!("  {}", r.name), &r.name, &r.path)),
        );
    }
    choices
}

/// Terminal selector backed by `dialoguer::Select`
#[derive(Debug, Clone)]
pub struct DialoguerPrompt {
    page_size: usize,
}

impl DialoguerPrompt {
    pub fn new(page_size: usize) -> Self {
        Self { page_size }
    }
}

/// Get a themed `ColorfulTheme` for dialoguer prompts.
pub fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        defaults_style: console::Style::new().dim(),
        prompt_style: console::Style::new().bold(),
        prompt_prefix: console::style("  ?".to_string()).cyan().bold(),
        success_prefix: console::style("  ✓".to_string()).green().bold(),
        active_item_style: console::Style::new().cyan().bold(),
        active_item_prefix: console::style("  ❯".to_string()).cyan().bold(),
        inactive_item_prefix: console::style("   ".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Turn the choice list into selectable rows.
///
/// dialoguer has no disabled rows, so a header is folded into the label of
/// each entry that follows it. Returns the row labels and their values.
fn selectable_rows(choices: &[Choice]) -> (Vec<String>, Vec<String>) {
    let mut labels = Vec::new();
    let mut values = Vec::new();
    let mut group: Option<&str> = None;

    for choice in choices {
        if choice.is_header() {
            group = Some(choice.label.trim_matches(|c: char| c == '─' || c.is_whitespace()));
            continue;
        }

        let mut label = String::new();
        if let Some(group) = group {
            let _ = write!(label, "[{group}] ");
        }
        label.push_str(choice.label.trim_start());
        if !choice.detail.is_empty() {
            let _ = write!(label, "  {}", console::style(&choice.detail).dim());
        }
        labels.push(label);
        values.push(choice.value.clone());
    }
    (labels, values)
}

impl SelectionPrompt for DialoguerPrompt {
    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<Selection> {
        if !console::user_attended() {
            return Err(LangmError::Prompt(
                "no interactive terminal attached".to_string(),
            ));
        }

        let (labels, values) = selectable_rows(choices);
        if labels.is_empty() {
            return Ok(Selection::Cancelled);
        }

        survive_interrupts();
        let picked = Select::with_theme(&prompt_theme())
            .with_prompt(message)
            .items(&labels)
            .default(0)
            .max_length(self.page_size)
            .interact_opt();
        if picked.is_err() {
            // The prompt hides the cursor and bails out without restoring it
            let _ = console::Term::stderr().show_cursor();
        }

        selection_outcome(picked, &values)
    }
}

/// Keep the process alive when Ctrl-C is pressed inside the prompt.
///
/// console re-raises SIGINT on Ctrl-C before returning `Interrupted`. With
/// the default disposition that kills the process mid-prompt, so a no-op
/// handler is installed and the read error is treated as a cancel.
fn survive_interrupts() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| {}) {
            tracing::debug!("Could not install Ctrl-C handler: {e}");
        }
    });
}

/// Map what the dialoguer prompt returned to a selection.
/// Esc, `q` and Ctrl-C all cancel.
fn selection_outcome(
    picked: dialoguer::Result<Option<usize>>,
    values: &[String],
) -> Result<Selection> {
    match picked {
        Ok(index) => Ok(match index.and_then(|i| values.get(i)) {
            Some(value) => Selection::Chosen(value.clone()),
            None => Selection::Cancelled,
        }),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
            tracing::debug!("Selection interrupted");
            Ok(Selection::Cancelled)
        }
        Err(e) => Err(LangmError::Prompt(e.to_string())),
    }
}
