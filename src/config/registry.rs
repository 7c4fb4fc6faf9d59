//! Runtime registry backed by a JSON document.
//!
//! The registry keeps one snapshot per value, loaded lazily on first access.
//! Every mutation rewrites the whole document through the [`RegistryStore`].
//! There is no cross-process locking: two invocations racing on the same
//! file resolve as last writer wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::{Capability, LangmError, RegistryDocument, Result, Runtime, paths};

/// Persistence for the registry document
pub trait RegistryStore {
    /// Read the stored document, `None` if nothing has been stored yet
    fn read(&self) -> Result<Option<RegistryDocument>>;

    /// Replace the stored document in full
    fn write(&self, doc: &RegistryDocument) -> Result<()>;

    /// Human readable location, used in messages
    fn location(&self) -> String;
}

/// Registry document stored as pretty-printed JSON on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the well-known location (~/.langm/config.json)
    #[must_use]
    pub fn default_location() -> Self {
        Self::new(paths::config_path())
    }
}

impl RegistryStore for JsonFileStore {
    fn read(&self) -> Result<Option<RegistryDocument>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let doc = serde_json::from_str(&content).map_err(|source| LangmError::CorruptConfig {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!("Loaded registry from {}", self.path.display());
        Ok(Some(doc))
    }

    fn write(&self, doc: &RegistryDocument) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut content = serde_json::to_string_pretty(doc).map_err(LangmError::Encode)?;
        content.push('\n');

        // Write next to the target and rename over it so readers never see
        // a half-written document.
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| LangmError::Io(e.error))?;

        tracing::debug!(
            "Saved registry ({} runtimes) to {}",
            doc.runtimes.len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// The runtime registry
#[derive(Debug)]
pub struct Registry<S: RegistryStore> {
    store: S,
    cache: Option<RegistryDocument>,
}

impl Registry<JsonFileStore> {
    /// Registry at the well-known location
    #[must_use]
    pub fn open_default() -> Self {
        Self::new(JsonFileStore::default_location())
    }
}

impl<S: RegistryStore> Registry<S> {
    pub fn new(store: S) -> Self {
        Self { store, cache: None }
    }

    /// Read the document, creating and persisting an empty one if absent.
    pub fn load(&mut self) -> Result<&RegistryDocument> {
        let doc = self.read_or_create()?;
        let doc: &RegistryDocument = self.cache.insert(doc);
        Ok(doc)
    }

    fn read_or_create(&self) -> Result<RegistryDocument> {
        if let Some(doc) = self.store.read()? {
            return Ok(doc);
        }
        tracing::debug!("No registry at {}, creating one", self.store.location());
        let doc = RegistryDocument::default();
        self.store.write(&doc)?;
        Ok(doc)
    }

    /// Persist `doc` in full and make it the cached snapshot.
    pub fn save(&mut self, doc: RegistryDocument) -> Result<()> {
        self.store.write(&doc)?;
        self.cache = Some(doc);
        Ok(())
    }

    fn snapshot(&mut self) -> Result<&RegistryDocument> {
        if self.cache.is_none() {
            self.cache = Some(self.read_or_create()?);
        }
        let doc: &RegistryDocument = self.cache.get_or_insert_default();
        Ok(doc)
    }

    /// Append a runtime. Fails with `DuplicateName` without touching storage.
    pub fn add_runtime(&mut self, runtime: Runtime) -> Result<()> {
        let mut doc = self.snapshot()?.clone();
        if doc.runtimes.iter().any(|r| r.name == runtime.name) {
            return Err(LangmError::DuplicateName(runtime.name));
        }
        tracing::debug!("Registering runtime {} at {}", runtime.name, runtime.path);
        doc.runtimes.push(runtime);
        self.save(doc)
    }

    /// All runtimes in registration order
    pub fn runtimes(&mut self) -> Result<&[Runtime]> {
        Ok(&self.snapshot()?.runtimes)
    }

    /// Runtimes declaring `cap`, in registration order
    pub fn runtimes_by_capability(&mut self, cap: Capability) -> Result<Vec<Runtime>> {
        Ok(self
            .runtimes()?
            .iter()
            .filter(|r| r.has(cap))
            .cloned()
            .collect())
    }

    /// Runtimes for an optional filter
    pub fn runtimes_matching(&mut self, filter: Option<Capability>) -> Result<Vec<Runtime>> {
        match filter {
            Some(cap) => self.runtimes_by_capability(cap),
            None => Ok(self.runtimes()?.to_vec()),
        }
    }

    /// Name of the active runtime
    pub fn current(&mut self) -> Result<Option<String>> {
        Ok(self.snapshot()?.current.clone())
    }

    pub fn set_current(&mut self, name: Option<String>) -> Result<()> {
        let mut doc = self.snapshot()?.clone();
        doc.current = name;
        self.save(doc)
    }

    pub fn runtime_by_name(&mut self, name: &str) -> Result<Option<Runtime>> {
        Ok(self.runtimes()?.iter().find(|r| r.name == name).cloned())
    }
}
