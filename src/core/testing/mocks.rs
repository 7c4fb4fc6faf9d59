//! In-memory stand-ins for the filesystem-backed collaborators

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::cli::prompt::{Choice, Selection, SelectionPrompt};
use crate::config::RegistryStore;
use crate::core::{LangmError, RegistryDocument, Result};
use crate::runtimes::ActiveLink;

/// Registry store kept in memory. Clones share state, so a test can keep
/// a handle after moving one into a `Registry`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    doc: Rc<RefCell<Option<RegistryDocument>>>,
    reads: Rc<Cell<usize>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `doc`
    pub fn with_document(doc: RegistryDocument) -> Self {
        let store = Self::new();
        *store.doc.borrow_mut() = Some(doc);
        store
    }

    /// The stored document, if any
    pub fn document(&self) -> Option<RegistryDocument> {
        self.doc.borrow().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl RegistryStore for MemoryStore {
    fn read(&self) -> Result<Option<RegistryDocument>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.doc.borrow().clone())
    }

    fn write(&self, doc: &RegistryDocument) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        *self.doc.borrow_mut() = Some(doc.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

/// Active link kept in memory
#[derive(Debug, Clone)]
pub struct MemoryLink {
    link: PathBuf,
    target: Rc<RefCell<Option<PathBuf>>>,
    switches: Rc<Cell<usize>>,
    refuse: bool,
}

impl Default for MemoryLink {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLink {
    pub fn new() -> Self {
        Self {
            link: PathBuf::from("/langm/current"),
            target: Rc::new(RefCell::new(None)),
            switches: Rc::new(Cell::new(0)),
            refuse: false,
        }
    }

    /// Link whose every switch fails for lack of the symlink privilege
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new()
        }
    }

    pub fn target(&self) -> Option<PathBuf> {
        self.target.borrow().clone()
    }

    pub fn switches(&self) -> usize {
        self.switches.get()
    }
}

impl ActiveLink for MemoryLink {
    fn switch_to(&self, target: &Path) -> Result<()> {
        if self.refuse {
            return Err(LangmError::InsufficientPrivilege {
                link: self.link.clone(),
                source: std::io::Error::other("privilege not held"),
            });
        }
        self.switches.set(self.switches.get() + 1);
        *self.target.borrow_mut() = Some(target.to_path_buf());
        Ok(())
    }

    fn current(&self) -> Result<Option<PathBuf>> {
        Ok(self.target())
    }

    fn exists(&self) -> bool {
        self.target.borrow().is_some()
    }

    fn link_path(&self) -> &Path {
        &self.link
    }
}

/// Prompt that answers with a preset selection and records what it was shown
#[derive(Debug, Clone)]
pub struct ScriptedPrompt {
    answer: Selection,
    shown: Rc<RefCell<Vec<Choice>>>,
    message: Rc<RefCell<Option<String>>>,
}

impl ScriptedPrompt {
    /// Pick the choice whose value is `value`
    pub fn choosing(value: impl Into<String>) -> Self {
        Self::answering(Selection::Chosen(value.into()))
    }

    /// Behave as if the user pressed Esc
    pub fn cancelling() -> Self {
        Self::answering(Selection::Cancelled)
    }

    pub fn answering(answer: Selection) -> Self {
        Self {
            answer,
            shown: Rc::new(RefCell::new(Vec::new())),
            message: Rc::new(RefCell::new(None)),
        }
    }

    /// Choices from the last `select` call
    pub fn shown(&self) -> Vec<Choice> {
        self.shown.borrow().clone()
    }

    /// Message from the last `select` call
    pub fn message(&self) -> Option<String> {
        self.message.borrow().clone()
    }
}

impl SelectionPrompt for ScriptedPrompt {
    fn select(&mut self, message: &str, choices: &[Choice]) -> Result<Selection> {
        *self.shown.borrow_mut() = choices.to_vec();
        *self.message.borrow_mut() = Some(message.to_string());
        Ok(self.answer.clone())
    }
}
