use std::any::Any;
use std::fmt;

use hbnb_types::{ClassName, EntityId, ObjectKey, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::schema::Schema;

/// Discriminator field naming the concrete type of a serialized record.
pub const CLASS_KEY: &str = "__class__";

/// Attributes owned by the base and never assignable from outside.
const RESERVED: [&str; 4] = ["id", "created_at", "updated_at", CLASS_KEY];

// ---------------------------------------------------------------------------
// BaseFields
// ---------------------------------------------------------------------------

/// Identity and timestamps shared by every entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseFields {
    /// Assigned once at creation, immutable afterwards.
    pub id: EntityId,
    /// Set at creation, immutable afterwards.
    pub created_at: Timestamp,
    /// Refreshed by every touch.
    pub updated_at: Timestamp,
}

impl BaseFields {
    /// Fresh identity: new id, both timestamps set to now.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            id: EntityId::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Remove and decode the base fields from a serialized record.
    fn take_from(class: ClassName, dict: &mut Map<String, Value>) -> ModelResult<Self> {
        let id = take_string(class, dict, "id")?;
        let id = EntityId::parse(&id).map_err(|e| ModelError::malformed(class, format!("id: {e}")))?;
        let created_at = take_timestamp(class, dict, "created_at")?;
        let updated_at = take_timestamp(class, dict, "updated_at")?;
        Ok(Self {
            id,
            created_at,
            updated_at,
        })
    }
}

impl Default for BaseFields {
    fn default() -> Self {
        Self::new()
    }
}

fn take_string(class: ClassName, dict: &mut Map<String, Value>, field: &str) -> ModelResult<String> {
    match dict.remove(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ModelError::malformed(
            class,
            format!("{field}: expected string, got {other}"),
        )),
        None => Err(ModelError::malformed(class, format!("missing field {field}"))),
    }
}

fn take_timestamp(
    class: ClassName,
    dict: &mut Map<String, Value>,
    field: &str,
) -> ModelResult<Timestamp> {
    let raw = take_string(class, dict, field)?;
    Timestamp::parse(&raw).map_err(|e| ModelError::malformed(class, format!("{field}: {e}")))
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A stored domain record: identity, timestamps, and named attributes.
///
/// The trait is object-safe; the store holds entities as `Box<dyn Entity>`.
pub trait Entity: fmt::Debug + Send + Sync {
    /// The concrete variant.
    fn class_name(&self) -> ClassName;

    fn base(&self) -> &BaseFields;

    fn base_mut(&mut self) -> &mut BaseFields;

    /// Every attribute plus the `__class__` discriminator, timestamps as
    /// ISO-8601 strings. This is the unit of durable storage.
    fn to_dict(&self) -> ModelResult<Map<String, Value>>;

    /// Assign an attribute from its textual form.
    ///
    /// Declared attributes are coerced to their declared type. Undeclared
    /// names are kept as string attributes. Identity and timestamps are
    /// read-only.
    fn set_attribute(&mut self, name: &str, raw: &str) -> ModelResult<()>;

    fn clone_entity(&self) -> Box<dyn Entity>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn id(&self) -> &EntityId {
        &self.base().id
    }

    /// The composite table key `"<TypeName>.<id>"`.
    fn key(&self) -> ObjectKey {
        ObjectKey::new(self.class_name(), self.id().clone())
    }

    /// Refresh `updated_at`. The new value is strictly greater than the old.
    fn touch(&mut self) {
        let base = self.base_mut();
        base.updated_at = Timestamp::after(&base.updated_at);
    }

    /// Read a single attribute in its serialized form.
    fn attribute(&self, name: &str) -> Option<Value> {
        self.to_dict().ok()?.remove(name)
    }

    /// Human-readable form `[<TypeName>] (<id>) <attribute-map>`.
    ///
    /// The attribute map is the serialized form without the discriminator,
    /// keys sorted. For display only.
    fn render(&self) -> String {
        let attributes = match self.to_dict() {
            Ok(mut dict) => {
                dict.remove(CLASS_KEY);
                Value::Object(dict).to_string()
            }
            Err(e) => format!("<{e}>"),
        };
        format!("[{}] ({}) {}", self.class_name(), self.id(), attributes)
    }
}

impl dyn Entity {
    pub fn downcast_ref<T: Entity + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Entity + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl Clone for Box<dyn Entity> {
    fn clone(&self) -> Self {
        self.clone_entity()
    }
}

impl fmt::Display for dyn Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// An entity with schema `S`.
///
/// `extra` holds attributes assigned at runtime that `S` does not declare;
/// its keys never overlap the base fields or `S::FIELDS`.
#[derive(Clone, Debug, PartialEq)]
pub struct Model<S: Schema> {
    pub base: BaseFields,
    pub attrs: S,
    pub extra: Map<String, Value>,
}

impl<S: Schema> Model<S> {
    /// Fresh entity with default attributes.
    pub fn new() -> Self {
        Self::with_attrs(S::default())
    }

    /// Fresh entity with the given attributes.
    pub fn with_attrs(attrs: S) -> Self {
        Self {
            base: BaseFields::new(),
            attrs,
            extra: Map::new(),
        }
    }

    /// Reconstruct from a serialized record, preserving id and timestamps.
    ///
    /// The discriminator is ignored here; the [`Registry`](crate::Registry)
    /// uses it to pick `S`. Declared attributes absent from the record take
    /// their defaults. A declared non-string attribute stored as a string
    /// (`"price_by_night": "100"`) is coerced to its declared type.
    pub fn from_dict(mut dict: Map<String, Value>) -> ModelResult<Self> {
        dict.remove(CLASS_KEY);
        let base = BaseFields::take_from(S::CLASS, &mut dict)?;
        let defaults = fields_of(&S::default(), S::CLASS)?;

        let mut fields = Map::new();
        let mut extra = Map::new();
        for (name, value) in dict {
            if !S::FIELDS.contains(&name.as_str()) {
                extra.insert(name, value);
                continue;
            }
            let value = match (value, defaults.get(&name)) {
                (Value::String(raw), Some(default)) if !default.is_string() => {
                    coerce(&name, &raw, default)
                        .map_err(|e| ModelError::malformed(S::CLASS, e.to_string()))?
                }
                (value, _) => value,
            };
            fields.insert(name, value);
        }
        let attrs = serde_json::from_value(Value::Object(fields))
            .map_err(|e| ModelError::malformed(S::CLASS, e.to_string()))?;

        Ok(Self { base, attrs, extra })
    }

    fn schema_fields(&self) -> ModelResult<Map<String, Value>> {
        fields_of(&self.attrs, S::CLASS)
    }
}

fn fields_of<S: Schema>(attrs: &S, class: ClassName) -> ModelResult<Map<String, Value>> {
    match serde_json::to_value(attrs) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(ModelError::Serialization(format!(
            "{class} attributes serialized to non-object {other}"
        ))),
        Err(e) => Err(ModelError::Serialization(e.to_string())),
    }
}

impl<S: Schema> Default for Model<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> Entity for Model<S> {
    fn class_name(&self) -> ClassName {
        S::CLASS
    }

    fn base(&self) -> &BaseFields {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseFields {
        &mut self.base
    }

    fn to_dict(&self) -> ModelResult<Map<String, Value>> {
        let mut dict = self.extra.clone();
        dict.extend(self.schema_fields()?);
        dict.insert("id".into(), Value::String(self.base.id.to_string()));
        dict.insert(
            "created_at".into(),
            Value::String(self.base.created_at.to_string()),
        );
        dict.insert(
            "updated_at".into(),
            Value::String(self.base.updated_at.to_string()),
        );
        dict.insert(CLASS_KEY.into(), Value::String(S::CLASS.as_str().into()));
        Ok(dict)
    }

    fn set_attribute(&mut self, name: &str, raw: &str) -> ModelResult<()> {
        if RESERVED.contains(&name) {
            return Err(ModelError::ReadOnlyAttribute(name.to_string()));
        }
        if !S::FIELDS.contains(&name) {
            self.extra
                .insert(name.to_string(), Value::String(raw.to_string()));
            debug!(key = %self.key(), attribute = name, "extra attribute set");
            return Ok(());
        }

        let mut fields = self.schema_fields()?;
        let current = fields.get(name).cloned().unwrap_or(Value::Null);
        let coerced = coerce(name, raw, &current)?;
        fields.insert(name.to_string(), coerced);
        self.attrs = serde_json::from_value(Value::Object(fields)).map_err(|_| {
            ModelError::InvalidValue {
                attribute: name.to_string(),
                value: raw.to_string(),
                expected: "a value of the declared type",
            }
        })?;
        debug!(key = %self.key(), attribute = name, "attribute set");
        Ok(())
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Coerce raw text to the JSON kind of the attribute's current value.
fn coerce(attribute: &str, raw: &str, current: &Value) -> ModelResult<Value> {
    let invalid = |expected: &'static str| ModelError::InvalidValue {
        attribute: attribute.to_string(),
        value: raw.to_string(),
        expected,
    };
    match current {
        Value::Number(n) if n.is_f64() => raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid("float")),
        Value::Number(_) => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid("integer")),
        Value::Bool(_) => raw
            .trim()
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| invalid("boolean")),
        Value::Array(_) => match serde_json::from_str::<Value>(raw) {
            Ok(list @ Value::Array(_)) => Ok(list),
            _ => Err(invalid("list")),
        },
        _ => Ok(Value::String(raw.to_string())),
    }
}
