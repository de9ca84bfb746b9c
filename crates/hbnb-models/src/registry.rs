//! Type-name to constructor mapping used to rebuild entities from their
//! serialized form.

use std::collections::BTreeMap;

use hbnb_types::ClassName;
use serde_json::{Map, Value};

use crate::entity::{CLASS_KEY, Entity, Model};
use crate::error::{ModelError, ModelResult};
use crate::schema::{
    AmenityFields, BaseModelFields, CityFields, PlaceFields, ReviewFields, Schema, StateFields,
    UserFields,
};

/// Constructors for one entity variant.
#[derive(Clone, Copy)]
pub struct Factory {
    pub class: ClassName,
    fresh: fn() -> Box<dyn Entity>,
    restore: fn(Map<String, Value>) -> ModelResult<Box<dyn Entity>>,
}

impl Factory {
    /// The factory for schema `S`.
    pub fn of<S: Schema>() -> Self {
        Self {
            class: S::CLASS,
            fresh: fresh::<S>,
            restore: restore::<S>,
        }
    }

    /// A fresh instance with a new id and current timestamps.
    pub fn create(&self) -> Box<dyn Entity> {
        (self.fresh)()
    }

    /// Reconstruct from a serialized record.
    pub fn restore(&self, dict: Map<String, Value>) -> ModelResult<Box<dyn Entity>> {
        (self.restore)(dict)
    }
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory").field("class", &self.class).finish()
    }
}

fn fresh<S: Schema>() -> Box<dyn Entity> {
    Box::new(Model::<S>::new())
}

fn restore<S: Schema>(dict: Map<String, Value>) -> ModelResult<Box<dyn Entity>> {
    Ok(Box::new(Model::<S>::from_dict(dict)?))
}

/// Fixed mapping from type name to [`Factory`].
///
/// Built once at startup with [`Registry::standard`]; there is no runtime
/// registration.
#[derive(Clone, Debug)]
pub struct Registry {
    factories: BTreeMap<ClassName, Factory>,
}

impl Registry {
    /// The registry of every known variant.
    pub fn standard() -> Self {
        let factories = [
            Factory::of::<BaseModelFields>(),
            Factory::of::<UserFields>(),
            Factory::of::<PlaceFields>(),
            Factory::of::<StateFields>(),
            Factory::of::<CityFields>(),
            Factory::of::<AmenityFields>(),
            Factory::of::<ReviewFields>(),
        ]
        .into_iter()
        .map(|factory| (factory.class, factory))
        .collect();
        Self { factories }
    }

    /// Resolve a type name to a registered class.
    pub fn resolve(&self, name: &str) -> ModelResult<ClassName> {
        name.parse::<ClassName>()
            .ok()
            .filter(|class| self.factories.contains_key(class))
            .ok_or_else(|| ModelError::UnknownType(name.to_string()))
    }

    pub fn factory(&self, class: ClassName) -> ModelResult<&Factory> {
        self.factories
            .get(&class)
            .ok_or_else(|| ModelError::UnknownType(class.to_string()))
    }

    /// A fresh instance of `class`.
    pub fn create(&self, class: ClassName) -> ModelResult<Box<dyn Entity>> {
        Ok(self.factory(class)?.create())
    }

    /// Reconstruct an entity from its serialized form, dispatching on the
    /// `__class__` discriminator.
    pub fn construct_from(&self, dict: Map<String, Value>) -> ModelResult<Box<dyn Entity>> {
        let name = match dict.get(CLASS_KEY) {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(ModelError::malformed(
                    "unknown",
                    format!("{CLASS_KEY} must be a string, got {other}"),
                ));
            }
            None => {
                return Err(ModelError::malformed(
                    "unknown",
                    format!("missing field {CLASS_KEY}"),
                ));
            }
        };
        let class = self.resolve(&name)?;
        self.factory(class)?.restore(dict)
    }

    /// Registered classes in name order.
    pub fn classes(&self) -> impl Iterator<Item = ClassName> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
