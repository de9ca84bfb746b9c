//! Domain entities for the HBnB object store.
//!
//! Every stored record is an [`Entity`]: an identity ([`BaseFields`]) plus a
//! fixed attribute schema and an optional side map of attributes assigned at
//! runtime that the schema does not declare.
//!
//! # Variants
//!
//! - [`BaseModel`] -- base fields only
//! - [`User`], [`State`], [`City`], [`Amenity`], [`Place`], [`Review`]
//!
//! # Serialized form
//!
//! [`Entity::to_dict`] yields a flat JSON object holding every attribute,
//! ISO-8601 timestamps, and the `__class__` discriminator. The [`Registry`]
//! maps the discriminator back to the right constructor, and reconstruction
//! is lossless: `to_dict(construct_from(to_dict(e))) == to_dict(e)`.

pub mod entity;
pub mod error;
pub mod registry;
pub mod schema;

pub use entity::{BaseFields, CLASS_KEY, Entity, Model};
pub use error::{ModelError, ModelResult};
pub use registry::{Factory, Registry};
pub use schema::{
    Amenity, AmenityFields, BaseModel, BaseModelFields, City, CityFields, Place, PlaceFields,
    Review, ReviewFields, Schema, State, StateFields, User, UserFields,
};

pub use hbnb_types::{ClassName, EntityId, ObjectKey, Timestamp};
