//! Load/save of the document to a key-value store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Persistence                            │
//! │   - Serializes nodes and view state to JSON under two keys    │
//! │   - load(): never fails, falls back per key with a warning    │
//! │   - save(): fire-and-forget, failures are logged and dropped  │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      StorageBackend                           │
//! │   - MemoryStorage: in-memory (testing, ephemeral)             │
//! │   - FileStorage: one JSON object file, atomic rename writes   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Backend read error | key treated as missing, warning logged |
//! | Stored value is not valid JSON for its type | key treated as missing, warning logged |
//! | Backend write error (quota, I/O) | write dropped, warning logged, memory state kept |

use crate::error::{StorageError, StorageResult};
use crate::graph::Node;
use crate::view::ViewState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Pluggable string key-value store.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Stored value for `key`, or `None` on first run.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&self, key: &str) -> StorageResult<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory backend for tests and ephemeral sessions.
///
/// [`set_fail_writes`](Self::set_fail_writes) makes every write fail, which
/// stands in for a full storage quota.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("entries", &self.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage
// ─────────────────────────────────────────────────────────────────────────────

/// On-disk layout of [`FileStorage`].
#[derive(Serialize, Deserialize)]
struct StoreFile {
    format_version: u32,
    entries: HashMap<String, String>,
}

impl StoreFile {
    const FORMAT_VERSION: u32 = 1;

    fn new() -> Self {
        Self {
            format_version: Self::FORMAT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// Backend keeping every key in one JSON file.
///
/// ```json
/// {
///   "format_version": 1,
///   "entries": {
///     "impactmap-nodes": "[{\"id\":\"…\",\"title\":\"\",\"column\":0,\"parentId\":null}]",
///     "impactmap-view": "{\"scale\":1.0,\"offsetX\":0.0,\"offsetY\":0.0}"
///   }
/// }
/// ```
///
/// Writes go to `{path}.tmp`, are synced, then renamed over `{path}`.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// The file does not need to exist; it is created on first write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        tmp
    }

    fn read_file(&self) -> StorageResult<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let file: StoreFile = serde_json::from_reader(reader)?;
        if file.format_version != StoreFile::FORMAT_VERSION {
            return Err(StorageError::Corruption(format!(
                "unsupported format version {} (expected {})",
                file.format_version,
                StoreFile::FORMAT_VERSION
            )));
        }
        Ok(file)
    }

    fn write_file(&self, file: &StoreFile) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, file)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn name(&self) -> &str {
        "FileStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_file()?.entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut file = self.read_file().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "discarding unreadable store file");
            StoreFile::new()
        });
        file.entries.insert(key.to_string(), value.to_string());
        self.write_file(&file)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut file = self.read_file()?;
        if file.entries.remove(key).is_some() {
            self.write_file(&file)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Persistence Adapter
// ─────────────────────────────────────────────────────────────────────────────

/// Whatever could be recovered from storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub view: ViewState,
}

/// Reads and writes the document through a [`StorageBackend`].
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn StorageBackend>,
    nodes_key: String,
    view_key: String,
}

impl Persistence {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        nodes_key: impl Into<String>,
        view_key: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            nodes_key: nodes_key.into(),
            view_key: view_key.into(),
        }
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Load nodes and view. Each key falls back to its default on its own.
    pub fn load(&self) -> Snapshot {
        let nodes: Vec<Node> = self.read_key(&self.nodes_key).unwrap_or_default();
        let view = self
            .read_key::<ViewState>(&self.view_key)
            .filter(|v| {
                let ok = v.is_usable();
                if !ok {
                    tracing::warn!(key = %self.view_key, scale = v.scale, "stored view state is unusable, resetting");
                }
                ok
            })
            .unwrap_or_default();
        tracing::debug!(backend = self.backend.name(), nodes = nodes.len(), "loaded document");
        Snapshot { nodes, view }
    }

    fn read_key<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), key, error = %e, "storage read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is corrupt, ignoring");
                None
            }
        }
    }

    /// Write nodes and view. Failures are logged and otherwise ignored.
    pub fn save(&self, nodes: &[Node], view: &ViewState) {
        if let Err(e) = self.try_save(nodes, view) {
            tracing::warn!(backend = self.backend.name(), error = %e, "storage write failed");
        } else {
            tracing::debug!(backend = self.backend.name(), nodes = nodes.len(), "saved document");
        }
    }

    fn try_save(&self, nodes: &[Node], view: &ViewState) -> StorageResult<()> {
        let nodes_json = serde_json::to_string(nodes)?;
        let view_json = serde_json::to_string(view)?;
        self.backend.set(&self.nodes_key, &nodes_json)?;
        self.backend.set(&self.view_key, &view_json)?;
        Ok(())
    }

    /// Forget the stored document.
    pub fn clear(&self) {
        for key in [&self.nodes_key, &self.view_key] {
            if let Err(e) = self.backend.remove(key) {
                tracing::warn!(backend = self.backend.name(), key = %key, error = %e, "storage clear failed");
            }
        }
    }
}

impl fmt::Debug for Persistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistence")
            .field("backend", &self.backend.name())
            .field("nodes_key", &self.nodes_key)
            .field("view_key", &self.view_key)
            .finish()
    }
}
