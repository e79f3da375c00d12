use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::debug;

use kbase_core::error::{Error, Result};
use kbase_core::traits::IndexStore;
use kbase_core::types::IndexFile;

/// The whole index as one JSON document on disk.
///
/// Saves go to a temp file in the same directory which is then renamed over
/// the target, so a crash mid-write leaves the previous index intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl IndexStore for JsonFileStore {
    fn load(&self) -> Result<Option<IndexFile>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Storage(format!("read {}: {}", self.path.display(), e))),
        };
        let index: IndexFile = serde_json::from_slice(&bytes)
            .map_err(|e| Error::CorruptIndex(format!("{}: {}", self.path.display(), e)))?;
        debug!(path = %self.path.display(), chunks = index.chunks.len(), "index loaded");
        Ok(Some(index))
    }

    fn save(&self, index: &IndexFile) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;
        let json = serde_json::to_vec(index)
            .map_err(|e| Error::Storage(format!("serialize index: {}", e)))?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| Error::Storage(format!("write {}: {}", self.path.display(), e.error)))?;
        debug!(path = %self.path.display(), chunks = index.chunks.len(), bytes = json.len(), "index saved");
        Ok(())
    }

    fn quarantine(&self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let name = self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "index.json".to_string());
        let backup = self.path.with_file_name(format!("{}.corrupt-{}", name, Utc::now().format("%Y%m%dT%H%M%S%.3fZ")));
        fs::rename(&self.path, &backup)?;
        Ok(Some(backup))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
