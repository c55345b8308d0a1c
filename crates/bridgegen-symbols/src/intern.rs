//! Type interning.
//!
//! Structurally equal types share one `TypeId`, so type equality anywhere in
//! the generator is an integer comparison. The interner is shared by all
//! worker threads: lookups of existing types take a read lock, and new types
//! (instantiated base types, substituted constraints) are added through the
//! sharded map so concurrent constructions of the same type agree on its id.

use crate::types::{TypeData, TypeId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::{PoisonError, RwLock};

pub struct TypeInterner {
    ids: DashMap<TypeData, TypeId, FxBuildHasher>,
    types: RwLock<Vec<TypeData>>,
}

impl TypeInterner {
    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            ids: DashMap::with_hasher(FxBuildHasher),
            types: RwLock::new(Vec::with_capacity(256)),
        };
        // Order matches the TypeId constants.
        interner.intern(TypeData::Void);
        interner.intern(TypeData::Dynamic);
        interner.intern(TypeData::Error);
        debug_assert_eq!(interner.len(), TypeId::RESERVED as usize);
        interner
    }

    /// Return the id of `data`, registering it on first sight.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.ids.get(&data) {
            return *id;
        }
        match self.ids.entry(data) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
                let id = TypeId(types.len() as u32);
                types.push(entry.key().clone());
                entry.insert(id);
                id
            }
        }
    }

    /// Structure of an interned type.
    ///
    /// Ids are only handed out by `intern`, so an unknown id means a bug in the
    /// caller; it resolves to `TypeData::Error` rather than panicking.
    #[must_use]
    pub fn lookup(&self, id: TypeId) -> TypeData {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        types
            .get(id.0 as usize)
            .cloned()
            .unwrap_or(TypeData::Error)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod tests;
