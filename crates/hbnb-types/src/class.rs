use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The closed set of entity variants known to the store.
///
/// The string form is the type name used in composite keys and in the
/// `__class__` discriminator of serialized records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassName {
    BaseModel,
    User,
    Place,
    State,
    City,
    Amenity,
    Review,
}

impl ClassName {
    /// Every variant, in declaration order.
    pub const ALL: [ClassName; 7] = [
        Self::BaseModel,
        Self::User,
        Self::Place,
        Self::State,
        Self::City,
        Self::Amenity,
        Self::Review,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BaseModel => "BaseModel",
            Self::User => "User",
            Self::Place => "Place",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Review => "Review",
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassName {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| TypeError::UnknownClass(s.to_string()))
    }
}
