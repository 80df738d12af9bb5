//! Persistence of experiment artifacts.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{OptimizationError, Result, ResultExt};

/// Destination for named text artifacts.
pub trait ResultStore: Debug {
    /// Makes sure artifacts can be written, creating the destination if needed.
    fn ensure_destination(&self) -> Result<()>;

    /// Writes `contents` under `name`, replacing any previous artifact.
    fn write_artifact(&self, name: &str, contents: &str) -> Result<()>;
}

/// Writes every artifact as a file inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResultStore for DirectoryStore {
    fn ensure_destination(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .context(format!("Creating results directory {}", self.root.display()))
    }

    fn write_artifact(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.root.join(name);
        let file = File::create(&path).context(format!("Creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;
        debug!(path = %path.display(), bytes = contents.len(), "artifact written");
        Ok(())
    }
}

/// Keeps artifacts in memory, keyed by name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.artifacts
            .lock()
            .ok()
            .and_then(|artifacts| artifacts.get(name).cloned())
    }

    pub fn names(&self) -> Vec<String> {
        self.artifacts
            .lock()
            .map(|artifacts| artifacts.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl ResultStore for MemoryStore {
    fn ensure_destination(&self) -> Result<()> {
        Ok(())
    }

    fn write_artifact(&self, name: &str, contents: &str) -> Result<()> {
        let mut artifacts = self
            .artifacts
            .lock()
            .map_err(|_| OptimizationError::Other("Artifact store lock poisoned".to_string()))?;
        artifacts.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}
