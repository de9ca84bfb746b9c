//! Storage engine for the HBnB object store.
//!
//! The store owns the table of live entities keyed by composite key
//! `"<TypeName>.<id>"` and bridges it to a single JSON document on disk.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- table only, persistence is a no-op (tests and embedding)
//! - [`FileStorage`] -- table backed by a JSON file, written with write-then-rename
//!
//! # Design Rules
//!
//! 1. The table is never handed out; callers use `get`/`put`/`delete`/`scan`/`update`.
//! 2. `get` and `scan` return clones; mutation goes through `update`.
//! 3. A missing durable file on reload is the only error that is swallowed.
//! 4. A corrupt file or an unknown record type on reload is fatal and leaves
//!    the table untouched.
//! 5. The store never prints; it logs through `tracing`.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod table;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use config::StorageConfig;
pub use error::{StoreError, StoreResult};
pub use file::FileStorage;
pub use memory::InMemoryObjectStore;
pub use table::Table;
pub use traits::ObjectStore;
