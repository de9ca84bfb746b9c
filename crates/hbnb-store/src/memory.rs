use hbnb_models::Registry;

use crate::error::StoreResult;
use crate::table::Table;
use crate::traits::ObjectStore;

/// In-memory object store.
///
/// Intended for tests and embedding. The table behaves exactly as in
/// [`FileStorage`](crate::FileStorage), but `persist` and `reload` touch no
/// durable medium.
pub struct InMemoryObjectStore {
    table: Table,
    registry: Registry,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::with_registry(Registry::standard())
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            table: Table::new(),
            registry,
        }
    }

    /// Remove all objects from the store.
    pub fn clear(&self) {
        self.table.clear();
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn table(&self) -> &Table {
        &self.table
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }

    fn persist(&self) -> StoreResult<()> {
        Ok(())
    }

    fn reload(&self) -> StoreResult<usize> {
        Ok(0)
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &self.table.len())
            .finish()
    }
}
