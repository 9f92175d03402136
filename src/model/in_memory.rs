//! InMemoryModelStore - the HashMap-backed store the server runs on.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::{Document, Expect, ModelError, ModelStore};

type Collections = HashMap<&'static str, HashMap<String, Document>>;

/// One map of documents per collection behind a single lock, so a version
/// check and its write happen together.
///
/// Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryModelStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held in a collection.
    pub fn len_of(&self, collection: &str) -> usize {
        self.read()
            .ok()
            .and_then(|c| c.get(collection).map(HashMap::len))
            .unwrap_or(0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, ModelError> {
        self.collections
            .read()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, Collections>, ModelError> {
        self.collections
            .write()
            .map_err(|_| ModelError::Storage("lock poisoned".into()))
    }
}

impl ModelStore for InMemoryModelStore {
    fn load(&self, collection: &'static str, id: &str) -> Result<Option<Document>, ModelError> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    fn scan(&self, collection: &'static str) -> Result<Vec<(String, Document)>, ModelError> {
        Ok(self
            .read()?
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn write(
        &self,
        collection: &'static str,
        id: &str,
        body: Vec<u8>,
        expect: Expect,
    ) -> Result<u64, ModelError> {
        let mut collections = self.write_lock()?;
        let docs = collections.entry(collection).or_default();
        let current = docs.get(id).map(|doc| doc.version);

        let conflict = |expected: u64, actual: u64| ModelError::ConcurrencyConflict {
            collection: collection.to_string(),
            id: id.to_string(),
            expected,
            actual,
        };
        match (expect, current) {
            (Expect::Absent, Some(actual)) => return Err(conflict(0, actual)),
            (Expect::Version(_), None) => {
                return Err(ModelError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })
            }
            (Expect::Version(expected), Some(actual)) if expected != actual => {
                return Err(conflict(expected, actual))
            }
            _ => {}
        }

        let version = current.map_or(1, |v| v + 1);
        docs.insert(id.to_string(), Document { body, version });
        debug!(collection, id, version, "document written");
        Ok(version)
    }

    fn remove(&self, collection: &'static str, id: &str) -> Result<bool, ModelError> {
        let removed = self
            .write_lock()?
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(id).is_some());
        if removed {
            debug!(collection, id, "document removed");
        }
        Ok(removed)
    }
}
