//! Versioned JSON documents: how every storefront record is persisted.
//!
//! Products, orders, users, vendors and the store settings are plain serde
//! structs implementing [`Model`]. A [`ModelStore`] only knows about raw
//! [`Document`]s grouped by collection; [`ModelRepository`] (reached through
//! [`ModelsExt::models`]) does the typed encoding and the compare-and-swap
//! loop the stock updates depend on.
//!
//! ```ignore
//! let products = store.models::<Product>();
//! products.insert(&product)?;
//! let taken = products.modify(&product.id, |p| {
//!     p.set_stock(p.stock().saturating_sub(2));
//!     Ok::<_, ModelError>(())
//! })?;
//! ```

mod in_memory;
mod model_repository;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// A record type with its own collection.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// e.g. "products", "orders".
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// A decoded record and the version it was read at. Pass the version back
/// to [`ModelRepository::update`] to write only if nothing changed since.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Somebody else wrote first (or the id was already taken on insert,
    /// reported with `expected: 0`).
    #[error("version conflict on {collection}/{id}: expected {expected}, found {actual}")]
    ConcurrencyConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },
    #[error("could not encode or decode record: {0}")]
    Serde(String),
    /// The backing store failed.
    #[error("store unavailable: {0}")]
    Storage(String),
    #[error("no record {collection}/{id}")]
    NotFound { collection: String, id: String },
}

pub use in_memory::InMemoryModelStore;
pub use model_repository::{ModelRepository, ModelsExt, MAX_CAS_ATTEMPTS};
pub use store::{Document, Expect, ModelStore};
