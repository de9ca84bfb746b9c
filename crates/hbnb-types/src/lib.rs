//! Foundation types for the HBnB object store.
//!
//! Identifiers, timestamps and table keys shared by
//! every other HBnB crate.
//!
//! # Key Types
//!
//! - [`EntityId`] -- Opaque entity identifier, freshly minted as a UUID v4
//! - [`Timestamp`] -- Naive UTC timestamp at microsecond precision (ISO-8601 on the wire)
//! - [`ClassName`] -- The closed set of entity variants
//! - [`ObjectKey`] -- Composite `"<TypeName>.<id>"` address of an entity in the table

pub mod class;
pub mod error;
pub mod identity;
pub mod key;
pub mod temporal;

pub use class::ClassName;
pub use error::TypeError;
pub use identity::EntityId;
pub use key::ObjectKey;
pub use temporal::Timestamp;
