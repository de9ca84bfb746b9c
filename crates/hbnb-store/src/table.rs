use std::collections::BTreeMap;
use std::sync::RwLock;

use hbnb_models::{Entity, ModelResult};
use hbnb_types::{ClassName, ObjectKey};
use serde_json::{Map, Value};

/// The authoritative in-memory object table.
///
/// Maps composite key to live entity. A key is present iff an entity with
/// that class and id has been put and not deleted. All access goes through a
/// single `RwLock`; reads hand out clones.
pub struct Table {
    entries: RwLock<BTreeMap<ObjectKey, Box<dyn Entity>>>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Clone of the entity stored under `key`.
    pub fn get(&self, key: &ObjectKey) -> Option<Box<dyn Entity>> {
        self.entries.read().expect("lock poisoned").get(key).cloned()
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.entries.read().expect("lock poisoned").contains_key(key)
    }

    /// Insert or overwrite under the entity's own key.
    pub fn put(&self, entity: Box<dyn Entity>) {
        let key = entity.key();
        self.entries.write().expect("lock poisoned").insert(key, entity);
    }

    /// Insert many entities under one write lock.
    pub fn extend(&self, entities: impl IntoIterator<Item = Box<dyn Entity>>) {
        let mut map = self.entries.write().expect("lock poisoned");
        for entity in entities {
            map.insert(entity.key(), entity);
        }
    }

    /// Remove `key`. Returns `true` if it was present.
    pub fn delete(&self, key: &ObjectKey) -> bool {
        self.entries
            .write()
            .expect("lock poisoned")
            .remove(key)
            .is_some()
    }

    /// Clones of every entity, optionally restricted to one class, in key order.
    pub fn scan(&self, class: Option<ClassName>) -> Vec<Box<dyn Entity>> {
        self.entries
            .read()
            .expect("lock poisoned")
            .iter()
            .filter(|(key, _)| class.map_or(true, |c| key.class == c))
            .map(|(_, entity)| entity.clone())
            .collect()
    }

    /// Apply `apply` to the entity under `key`.
    ///
    /// The mutation runs on a copy that replaces the stored entity only if
    /// `apply` succeeds, so a failed update leaves the table unchanged.
    /// Returns `Ok(false)` if `key` is absent.
    pub fn update(
        &self,
        key: &ObjectKey,
        apply: &mut dyn FnMut(&mut dyn Entity) -> ModelResult<()>,
    ) -> ModelResult<bool> {
        let mut map = self.entries.write().expect("lock poisoned");
        let Some(slot) = map.get_mut(key) else {
            return Ok(false);
        };
        let mut draft = slot.clone();
        apply(draft.as_mut())?;
        *slot = draft;
        Ok(true)
    }

    /// Serialize every entity into one document keyed by composite key.
    pub fn to_document(&self) -> ModelResult<Map<String, Value>> {
        let map = self.entries.read().expect("lock poisoned");
        let mut document = Map::new();
        for (key, entity) in map.iter() {
            document.insert(key.to_string(), Value::Object(entity.to_dict()?));
        }
        Ok(document)
    }

    /// Number of entities currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove all entities.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    /// Sorted list of every key.
    pub fn keys(&self) -> Vec<ObjectKey> {
        self.entries
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("object_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbnb_models::{ModelError, Place, State, User};
    use serde_json::json;

    fn state(name: &str) -> Box<dyn Entity> {
        let mut state = State::new();
        state.attrs.name = name.into();
        Box::new(state)
    }

    #[test]
    fn put_then_get() {
        let table = Table::new();
        let entity = state("Texas");
        let key = entity.key();
        table.put(entity);
        let read_back = table.get(&key).expect("should exist");
        assert_eq!(read_back.attribute("name"), Some(json!("Texas")));
    }

    #[test]
    fn put_is_idempotent() {
        let table = Table::new();
        let entity = state("Ohio");
        table.put(entity.clone());
        table.put(entity);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_returns_a_copy() {
        let table = Table::new();
        let entity = state("Utah");
        let key = entity.key();
        table.put(entity);

        let mut copy = table.get(&key).unwrap();
        copy.set_attribute("name", "Nevada").unwrap();
        assert_eq!(table.get(&key).unwrap().attribute("name"), Some(json!("Utah")));
    }

    #[test]
    fn delete_is_idempotent() {
        let table = Table::new();
        let entity = state("Iowa");
        let key = entity.key();
        table.put(entity);
        table.put(state("Maine"));

        assert!(table.delete(&key));
        assert!(!table.contains(&key));
        assert!(!table.delete(&key));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn scan_filters_by_class_in_key_order() {
        let table = Table::new();
        table.put(Box::new(User::new()));
        table.put(state("A"));
        table.put(state("B"));
        table.put(Box::new(Place::new()));

        assert_eq!(table.scan(None).len(), 4);
        let states = table.scan(Some(ClassName::State));
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|e| e.class_name() == ClassName::State));

        let keys: Vec<ObjectKey> = table.scan(None).iter().map(|e| e.key()).collect();
        assert_eq!(keys, table.keys());
    }

    #[test]
    fn update_applies_in_place() {
        let table = Table::new();
        let entity = state("Idaho");
        let key = entity.key();
        table.put(entity);

        let found = table
            .update(&key, &mut |e| e.set_attribute("name", "Oregon"))
            .unwrap();
        assert!(found);
        assert_eq!(table.get(&key).unwrap().attribute("name"), Some(json!("Oregon")));
    }

    #[test]
    fn failed_update_leaves_entity_unchanged() {
        let table = Table::new();
        let place: Box<dyn Entity> = Box::new(Place::new());
        let key = place.key();
        let before = place.to_dict().unwrap();
        table.put(place);

        let err = table
            .update(&key, &mut |e| {
                e.set_attribute("name", "Loft")?;
                e.set_attribute("max_guest", "many")
            })
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidValue { .. }));
        assert_eq!(table.get(&key).unwrap().to_dict().unwrap(), before);
    }

    #[test]
    fn update_missing_key() {
        let table = Table::new();
        let key = ObjectKey::from_parts("User", "missing").unwrap();
        assert!(!table.update(&key, &mut |_| Ok(())).unwrap());
    }

    #[test]
    fn document_is_keyed_by_composite_key() {
        let table = Table::new();
        let entity = state("Vermont");
        let key = entity.key().to_string();
        table.put(entity);

        let document = table.to_document().unwrap();
        assert_eq!(document.len(), 1);
        assert_eq!(document[&key]["name"], json!("Vermont"));
        assert_eq!(document[&key]["__class__"], json!("State"));
    }

    #[test]
    fn clear_removes_all() {
        let table = Table::new();
        table.put(state("a"));
        table.put(state("b"));
        table.clear();
        assert!(table.is_empty());
    }
}
