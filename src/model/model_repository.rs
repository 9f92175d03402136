//! ModelRepository - typed access to one collection of a [`ModelStore`].

use std::marker::PhantomData;

use tracing::debug;

use super::{Document, Expect, Model, ModelError, ModelStore, Versioned};

/// How many times [`ModelRepository::modify`] re-reads a record after losing
/// a version race before giving up.
pub const MAX_CAS_ATTEMPTS: usize = 8;

/// Encodes `M` to JSON on the way in and decodes it on the way out.
pub struct ModelRepository<'a, S: ?Sized, M> {
    store: &'a S,
    _marker: PhantomData<M>,
}

fn encode<M: Model>(model: &M) -> Result<Vec<u8>, ModelError> {
    serde_json::to_vec(model).map_err(|e| ModelError::Serde(e.to_string()))
}

fn decode<M: Model>(doc: Document) -> Result<Versioned<M>, ModelError> {
    let data = serde_json::from_slice(&doc.body).map_err(|e| ModelError::Serde(e.to_string()))?;
    Ok(Versioned {
        data,
        version: doc.version,
    })
}

impl<'a, S: ModelStore + ?Sized, M: Model> ModelRepository<'a, S, M> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError> {
        self.store.load(M::COLLECTION, id)?.map(decode).transpose()
    }

    /// Like [`get`](Self::get) but absence is `NotFound`.
    pub fn require(&self, id: &str) -> Result<Versioned<M>, ModelError> {
        self.get(id)?.ok_or_else(|| ModelError::NotFound {
            collection: M::COLLECTION.to_string(),
            id: id.to_string(),
        })
    }

    /// Create or overwrite without a version check.
    pub fn save(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        self.put(model, Expect::Any)
    }

    /// Create; an existing id is a `ConcurrencyConflict`.
    pub fn insert(&self, model: &M) -> Result<Versioned<M>, ModelError> {
        self.put(model, Expect::Absent)
    }

    /// Overwrite only if nobody wrote since `expected_version` was read.
    pub fn update(&self, model: &M, expected_version: u64) -> Result<Versioned<M>, ModelError> {
        self.put(model, Expect::Version(expected_version))
    }

    fn put(&self, model: &M, expect: Expect) -> Result<Versioned<M>, ModelError> {
        let version = self
            .store
            .write(M::COLLECTION, model.id(), encode(model)?, expect)?;
        Ok(Versioned {
            data: model.clone(),
            version,
        })
    }

    /// Returns whether the record existed.
    pub fn delete(&self, id: &str) -> Result<bool, ModelError> {
        self.store.remove(M::COLLECTION, id)
    }

    pub fn find(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Vec<M>, ModelError> {
        let mut found = Vec::new();
        for (_, doc) in self.store.scan(M::COLLECTION)? {
            let model = decode::<M>(doc)?.data;
            if predicate(&model) {
                found.push(model);
            }
        }
        Ok(found)
    }

    pub fn find_one(&self, predicate: &dyn Fn(&M) -> bool) -> Result<Option<M>, ModelError> {
        Ok(self.find(predicate)?.into_iter().next())
    }

    pub fn all(&self) -> Result<Vec<M>, ModelError> {
        self.find(&|_| true)
    }

    /// Read-modify-write with compare-and-swap.
    ///
    /// Loads the record, runs `apply` on a copy and writes it back only if
    /// nobody else wrote in between; on a version conflict the whole cycle
    /// is repeated with fresh data. Returns `Ok(None)` when the record does
    /// not exist (or disappears mid-way). `apply` may run more than once and
    /// may abort the write by returning an error.
    pub fn modify<T, E, F>(&self, id: &str, mut apply: F) -> Result<Option<(M, T)>, E>
    where
        F: FnMut(&mut M) -> Result<T, E>,
        E: From<ModelError>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let Some(current) = self.get(id)? else {
                return Ok(None);
            };

            let mut next = current.data;
            let outcome = apply(&mut next)?;

            match self.update(&next, current.version) {
                Ok(_) => return Ok(Some((next, outcome))),
                Err(ModelError::NotFound { .. }) => return Ok(None),
                Err(err @ ModelError::ConcurrencyConflict { .. }) => {
                    if attempt >= MAX_CAS_ATTEMPTS {
                        return Err(err.into());
                    }
                    debug!(collection = M::COLLECTION, id, attempt, "version conflict, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

/// Extension trait for typed model access on any ModelStore.
pub trait ModelsExt: ModelStore {
    /// Typed access to the collection `M` lives in.
    fn models<M: Model>(&self) -> ModelRepository<'_, Self, M> {
        ModelRepository::new(self)
    }
}

impl<S: ModelStore + ?Sized> ModelsExt for S {}
