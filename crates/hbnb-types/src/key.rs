use std::fmt;
use std::str::FromStr;

use crate::class::ClassName;
use crate::error::TypeError;
use crate::identity::EntityId;

/// Composite address of an entity in the storage table: `"<TypeName>.<id>"`.
///
/// Ordering is by class name first, then id, which gives scans a stable
/// grouping by type.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub class: ClassName,
    pub id: EntityId,
}

impl ObjectKey {
    pub fn new(class: ClassName, id: EntityId) -> Self {
        Self { class, id }
    }

    /// Build a key from the two halves the shell receives as separate words.
    pub fn from_parts(class: &str, id: &str) -> Result<Self, TypeError> {
        Ok(Self {
            class: class.parse()?,
            id: EntityId::parse(id)?,
        })
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({self})")
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.id)
    }
}

impl FromStr for ObjectKey {
    type Err = TypeError;

    /// Splits on the first `.`; the id half may itself contain dots.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class, id) = s
            .split_once('.')
            .ok_or_else(|| TypeError::InvalidKey(s.to_string()))?;
        Self::from_parts(class, id)
    }
}
