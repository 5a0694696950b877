//! In-memory state container, one per entity type
//!
//! Every domain list (aircraft, parts, tests, ...) is a `Store<E>`: an
//! insertion-ordered `Vec` with lookup, create, shallow-merge update and,
//! for [`Deletable`] entities only, delete. Lookups are linear scans.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::entity::{Deletable, Entity};
use crate::core::error::AeroResult;
use crate::core::filter::Criteria;

#[derive(Debug, Clone)]
pub struct Store<E: Entity> {
    items: Vec<E>,
}

impl<E: Entity> Default for Store<E> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<E: Entity> Store<E> {
    /// Create a store seeded with `items` (kept in the given order)
    pub fn new(items: Vec<E>) -> Self {
        Self { items }
    }

    /// Current entities in insertion order
    pub fn list(&self) -> &[E] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an entity by key
    pub fn get(&self, key: &E::Key) -> Option<&E> {
        self.items.iter().find(|e| e.has_key(key))
    }

    pub(crate) fn get_mut(&mut self, key: &E::Key) -> Option<&mut E> {
        self.items.iter_mut().find(|e| e.has_key(key))
    }

    /// Validate a draft, assign its key and append it
    pub fn create(&mut self, draft: E::Draft, today: NaiveDate) -> AeroResult<&E> {
        E::validate(&draft)?;
        let key = E::assign_key(&draft, &self.items)?;
        let entity = E::build(key.clone(), draft, today);
        self.items.push(entity);
        info!(kind = E::KIND, key = %key, "created");
        Ok(&self.items[self.items.len() - 1])
    }

    /// Shallow-merge `patch` onto the entity with `key`
    ///
    /// Returns `None` and changes nothing when the key is unknown.
    pub fn update(&mut self, key: &E::Key, patch: E::Patch, today: NaiveDate) -> Option<&E> {
        match self.items.iter_mut().find(|e| e.has_key(key)) {
            Some(entity) => {
                entity.merge(patch, today);
                info!(kind = E::KIND, key = %key, "updated");
                Some(&*entity)
            }
            None => {
                debug!(kind = E::KIND, key = %key, "update ignored, key not found");
                None
            }
        }
    }

    /// Entities matching `criteria`, in list order
    pub fn filter<C>(&self, criteria: &C) -> Vec<&E>
    where
        C: Criteria<E>,
    {
        self.items.iter().filter(|e| criteria.matches(e)).collect()
    }
}

impl<E: Deletable> Store<E> {
    /// Remove the entity with `key`, returning it if it existed
    pub fn delete(&mut self, key: &E::Key) -> Option<E> {
        let pos = self.items.iter().position(|e| e.has_key(key))?;
        let removed = self.items.remove(pos);
        info!(kind = E::KIND, key = %key, "deleted");
        Some(removed)
    }
}
