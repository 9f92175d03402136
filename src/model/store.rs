//! ModelStore - raw document storage behind every typed repository.

use super::ModelError;

/// One stored record: the JSON encoding and its version. Versions start at
/// 1 and go up by one with every write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub body: Vec<u8>,
    pub version: u64,
}

/// Precondition checked atomically with a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// The id must be free; a taken id is a `ConcurrencyConflict`.
    Absent,
    /// The stored version must still be this one.
    Version(u64),
    /// Create or overwrite.
    Any,
}

/// Storage keyed by collection and id. Object safe, so a store can sit
/// behind `dyn ModelStore` or be wrapped by another one.
///
/// Reads observe every write made before them; nothing caches between the
/// services and the store.
pub trait ModelStore: Send + Sync {
    fn load(&self, collection: &'static str, id: &str) -> Result<Option<Document>, ModelError>;

    /// Every document in a collection, paired with its id.
    fn scan(&self, collection: &'static str) -> Result<Vec<(String, Document)>, ModelError>;

    /// Store `body` under `id` if `expect` holds and return the new version.
    /// `Expect::Version` on a missing id is `NotFound`.
    fn write(
        &self,
        collection: &'static str,
        id: &str,
        body: Vec<u8>,
        expect: Expect,
    ) -> Result<u64, ModelError>;

    /// Returns whether the document existed.
    fn remove(&self, collection: &'static str, id: &str) -> Result<bool, ModelError>;
}
