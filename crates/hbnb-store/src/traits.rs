use hbnb_models::{Entity, ModelResult, Registry};
use hbnb_types::{ClassName, ObjectKey};

use crate::error::StoreResult;
use crate::table::Table;

/// An object table with a durable bridge.
///
/// All implementations must satisfy these invariants:
/// - A key is present iff an entity with that class and id has been put and
///   not deleted.
/// - `put` is idempotent: putting the same id twice overwrites.
/// - `delete` of an absent key is a no-op, not an error.
/// - `reload` of an absent durable file is a no-op, not an error.
/// - All other I/O and decoding errors are propagated, never silently ignored.
///
/// Backends supply the table, the registry, and the persistence pair; the
/// table operations are provided on top of them.
pub trait ObjectStore: Send + Sync {
    fn table(&self) -> &Table;

    /// The registry used to create and reconstruct entities.
    fn registry(&self) -> &Registry;

    /// Write the whole table to durable storage, replacing prior content.
    fn persist(&self) -> StoreResult<()>;

    /// Load durable storage into the table. Returns the number of records
    /// loaded.
    fn reload(&self) -> StoreResult<usize>;

    /// Read a copy of the entity under `key`.
    ///
    /// Returns `Ok(None)` if the entity does not exist.
    fn get(&self, key: &ObjectKey) -> StoreResult<Option<Box<dyn Entity>>> {
        Ok(self.table().get(key))
    }

    /// Register an entity under its composite key.
    fn put(&self, entity: Box<dyn Entity>) -> StoreResult<()> {
        tracing::debug!(key = %entity.key(), "put");
        self.table().put(entity);
        Ok(())
    }

    /// Delete by key. Returns `true` if the entity existed.
    ///
    /// Does not persist; see [`ObjectStore::destroy`].
    fn delete(&self, key: &ObjectKey) -> StoreResult<bool> {
        let removed = self.table().delete(key);
        tracing::debug!(%key, removed, "delete");
        Ok(removed)
    }

    /// Copies of every entity, optionally restricted to one class, in key
    /// order.
    fn scan(&self, class: Option<ClassName>) -> StoreResult<Vec<Box<dyn Entity>>> {
        Ok(self.table().scan(class))
    }

    /// Mutate the entity under `key` in place. Returns `false` if absent.
    fn update(
        &self,
        key: &ObjectKey,
        apply: &mut dyn FnMut(&mut dyn Entity) -> ModelResult<()>,
    ) -> StoreResult<bool> {
        Ok(self.table().update(key, apply)?)
    }

    fn contains(&self, key: &ObjectKey) -> StoreResult<bool> {
        Ok(self.table().contains(key))
    }

    /// Number of entities of `class`.
    fn count(&self, class: ClassName) -> StoreResult<usize> {
        Ok(self.table().scan(Some(class)).len())
    }

    fn len(&self) -> usize {
        self.table().len()
    }

    fn is_empty(&self) -> bool {
        self.table().is_empty()
    }

    /// Construct a fresh entity of `class` and register it.
    ///
    /// Returns a copy of the registered entity.
    fn create(&self, class: ClassName) -> StoreResult<Box<dyn Entity>> {
        let entity = self.registry().create(class)?;
        self.put(entity.clone())?;
        Ok(entity)
    }

    /// Touch a detached entity, register it, and persist the table.
    fn save(&self, mut entity: Box<dyn Entity>) -> StoreResult<()> {
        entity.touch();
        self.put(entity)?;
        self.persist()
    }

    /// Touch the stored entity under `key` and persist the table.
    ///
    /// Returns `false` (and persists nothing) if `key` is absent.
    fn touch_and_save(&self, key: &ObjectKey) -> StoreResult<bool> {
        let found = self.update(key, &mut |entity| {
            entity.touch();
            Ok(())
        })?;
        if found {
            self.persist()?;
        }
        Ok(found)
    }

    /// Delete by key and persist immediately if something was removed.
    fn destroy(&self, key: &ObjectKey) -> StoreResult<bool> {
        let removed = self.delete(key)?;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }
}
