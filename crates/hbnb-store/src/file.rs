use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use hbnb_models::{Entity, Registry};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::error::{StoreError, StoreResult};
use crate::table::Table;
use crate::traits::ObjectStore;

/// Object store backed by a single JSON document.
///
/// On-disk format: one JSON object whose keys are composite keys
/// `"<TypeName>.<id>"` and whose values are the entities' serialized forms
/// (including the `__class__` discriminator). There is no version field.
///
/// `persist` writes the document to a temporary file in the destination
/// directory and renames it over the target, so a crash mid-write leaves the
/// previous document intact. File I/O is serialized by an internal mutex.
pub struct FileStorage {
    table: Table,
    registry: Registry,
    config: StorageConfig,
    io: Mutex<()>,
}

impl FileStorage {
    /// Create an empty store for `config` without touching the file system.
    pub fn new(config: StorageConfig) -> Self {
        Self::with_registry(config, Registry::standard())
    }

    pub fn with_registry(config: StorageConfig, registry: Registry) -> Self {
        Self {
            table: Table::new(),
            registry,
            config,
            io: Mutex::new(()),
        }
    }

    /// Create a store and load any existing durable file.
    pub fn open(config: StorageConfig) -> StoreResult<Self> {
        let store = Self::new(config);
        store.reload()?;
        Ok(store)
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn path(&self) -> &Path {
        &self.config.file_path
    }

    fn encode(&self, document: &Map<String, Value>) -> StoreResult<Vec<u8>> {
        let encoded = if self.config.pretty {
            serde_json::to_vec_pretty(document)
        } else {
            serde_json::to_vec(document)
        };
        encoded.map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Parse and reconstruct every record without touching the table.
    fn decode(&self, bytes: &[u8]) -> StoreResult<Vec<Box<dyn Entity>>> {
        let corrupt = |reason: String| StoreError::Corrupt {
            path: self.config.file_path.clone(),
            reason,
        };
        let document: Map<String, Value> =
            serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;

        let mut entities = Vec::with_capacity(document.len());
        for (stored, record) in document {
            let Value::Object(record) = record else {
                return Err(corrupt(format!("record {stored} is not an object")));
            };
            let entity = self
                .registry
                .construct_from(record)
                .map_err(|source| StoreError::Record {
                    key: stored.clone(),
                    source,
                })?;
            let computed = entity.key().to_string();
            if computed != stored {
                return Err(StoreError::KeyMismatch { stored, computed });
            }
            entities.push(entity);
        }
        Ok(entities)
    }
}

impl ObjectStore for FileStorage {
    fn table(&self) -> &Table {
        &self.table
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }

    fn persist(&self) -> StoreResult<()> {
        let _io = self.io.lock().expect("lock poisoned");
        let document = self.table.to_document()?;
        let bytes = self.encode(&document)?;

        let path = &self.config.file_path;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

        debug!(count = document.len(), bytes = bytes.len(), path = %path.display(), "persisted");
        Ok(())
    }

    /// Merge the durable file into the table.
    ///
    /// Every record is decoded before any is inserted: on error the table is
    /// left exactly as it was.
    fn reload(&self) -> StoreResult<usize> {
        let _io = self.io.lock().expect("lock poisoned");
        let path = &self.config.file_path;
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no storage file; starting empty");
                return Ok(0);
            }
            Err(e) => return Err(e.into()),
        };

        let entities = self.decode(&bytes)?;
        let count = entities.len();
        self.table.extend(entities);
        info!(count, path = %path.display(), "reloaded objects");
        Ok(count)
    }
}

impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.config.file_path)
            .field("object_count", &self.table.len())
            .finish()
    }
}
