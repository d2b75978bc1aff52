//! Generic in-memory storage keyed by entity id.

use std::collections::HashMap;
use std::sync::RwLock;

use brigada_core::{DomainError, DomainResult, Entity};

/// A `RwLock<HashMap>` table over any [`Entity`].
///
/// The closure-based accessors hold the lock for the whole closure, which is
/// what lets callers build atomic check-and-set operations (uniqueness
/// backstops, insert-then-notify with rollback) on top.
///
/// A poisoned lock surfaces as `ConstraintViolation`; this layer never
/// panics.
pub struct InMemoryTable<T: Entity> {
    rows: RwLock<HashMap<T::Id, T>>,
}

impl<T: Entity + Clone> InMemoryTable<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_read<R>(&self, f: impl FnOnce(&HashMap<T::Id, T>) -> R) -> DomainResult<R> {
        let rows = self
            .rows
            .read()
            .map_err(|_| DomainError::constraint("storage lock poisoned"))?;
        Ok(f(&rows))
    }

    pub fn with_write<R>(
        &self,
        f: impl FnOnce(&mut HashMap<T::Id, T>) -> DomainResult<R>,
    ) -> DomainResult<R> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| DomainError::constraint("storage lock poisoned"))?;
        f(&mut rows)
    }

    pub fn get(&self, id: T::Id) -> DomainResult<Option<T>> {
        self.with_read(|rows| rows.get(&id).cloned())
    }

    /// Insert a new row; a duplicate id is a `ConstraintViolation`.
    pub fn insert(&self, row: T) -> DomainResult<()> {
        self.with_write(|rows| {
            let id = row.id();
            if rows.contains_key(&id) {
                return Err(DomainError::constraint(format!("duplicate id {id:?}")));
            }
            rows.insert(id, row);
            Ok(())
        })
    }

    /// Replace an existing row; a missing id is `NotFound`.
    pub fn update(&self, row: T) -> DomainResult<()> {
        self.with_write(|rows| {
            let id = row.id();
            if !rows.contains_key(&id) {
                return Err(DomainError::NotFound);
            }
            rows.insert(id, row);
            Ok(())
        })
    }

    pub fn list(&self) -> DomainResult<Vec<T>> {
        self.with_read(|rows| rows.values().cloned().collect())
    }
}

impl<T: Entity + Clone> Default for InMemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
