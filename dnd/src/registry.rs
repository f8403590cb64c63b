//! Registry of mounted droppable containers and draggable items.
//!
//! Wrapper components register on mount and unregister on unmount. Every
//! register call hands back a [`RegistrationId`]; unregistering requires it,
//! so a late unregister from a component that has already been remounted
//! cannot evict the newer record.
//!
//! Containers iterate in first-registration order. Overwriting an existing
//! container keeps its original slot, which makes distance ties in the
//! destination search resolve to the earliest-mounted container.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;
use std::hash::Hash;

use crate::consts::FIRST_REGISTRATION;
use crate::geometry::Rect;
use crate::types::{ContainerId, ContainerRole};

/// Reads the current bounding box of a mounted element.
///
/// Called lazily on every destination computation, since layout shifts while
/// a gesture is in progress.
pub trait BoundsProvider {
    fn bounds(&self) -> Rect;
}

impl<F: Fn() -> Rect> BoundsProvider for F {
    fn bounds(&self) -> Rect {
        self()
    }
}

/// Token returned by a register call and required to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

/// A mounted droppable container.
pub struct RegisteredContainer {
    pub id: ContainerId,
    pub role: ContainerRole,
    pub registration: RegistrationId,
    /// Iteration slot; assigned once per id.
    order: u64,
    bounds: Box<dyn BoundsProvider>,
}

impl RegisteredContainer {
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds.bounds()
    }
}

/// A mounted draggable item.
pub struct RegisteredItem<K> {
    pub id: K,
    pub container_id: ContainerId,
    pub index: usize,
    pub registration: RegistrationId,
    bounds: Box<dyn BoundsProvider>,
}

impl<K> RegisteredItem<K> {
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds.bounds()
    }
}

/// Owned mapping of container id → container and item id → item.
pub struct Registry<K> {
    containers: HashMap<ContainerId, RegisteredContainer>,
    items: HashMap<K, RegisteredItem<K>>,
    next_registration: u64,
    next_order: u64,
}

impl<K> Registry<K>
where
    K: Clone + Eq + Hash,
{
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            containers: HashMap::new(),
            items: HashMap::new(),
            next_registration: FIRST_REGISTRATION,
            next_order: 0,
        }
    }

    fn issue(&mut self) -> RegistrationId {
        let id = RegistrationId(self.next_registration);
        self.next_registration += 1;
        id
    }

    // --- Containers ---

    /// Register or overwrite a container.
    pub fn register_container(
        &mut self,
        id: impl Into<ContainerId>,
        role: ContainerRole,
        bounds: impl BoundsProvider + 'static,
    ) -> RegistrationId {
        let id = id.into();
        let registration = self.issue();
        let order = match self.containers.get(&id) {
            Some(existing) => existing.order,
            None => {
                let order = self.next_order;
                self.next_order += 1;
                order
            }
        };
        self.containers
            .insert(id.clone(), RegisteredContainer { id, role, registration, order, bounds: Box::new(bounds) });
        registration
    }

    /// Remove a container if `registration` is still its current record.
    /// Returns whether anything was removed.
    pub fn unregister_container(&mut self, id: &str, registration: RegistrationId) -> bool {
        match self.containers.get(id) {
            Some(existing) if existing.registration == registration => {
                self.containers.remove(id);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn container(&self, id: &str) -> Option<&RegisteredContainer> {
        self.containers.get(id)
    }

    /// All containers in first-registration order.
    #[must_use]
    pub fn containers(&self) -> Vec<&RegisteredContainer> {
        let mut out: Vec<&RegisteredContainer> = self.containers.values().collect();
        out.sort_by_key(|c| c.order);
        out
    }

    // --- Items ---

    /// Register or overwrite an item.
    pub fn register_item(
        &mut self,
        id: K,
        container_id: impl Into<ContainerId>,
        index: usize,
        bounds: impl BoundsProvider + 'static,
    ) -> RegistrationId {
        let registration = self.issue();
        self.items.insert(
            id.clone(),
            RegisteredItem { id, container_id: container_id.into(), index, registration, bounds: Box::new(bounds) },
        );
        registration
    }

    /// Remove an item if `registration` is still its current record.
    pub fn unregister_item(&mut self, id: &K, registration: RegistrationId) -> bool {
        match self.items.get(id) {
            Some(existing) if existing.registration == registration => {
                self.items.remove(id);
                true
            }
            _ => false,
        }
    }

    /// Move an item to a new slot without replacing its bounds accessor.
    /// Returns false if the item is not registered.
    pub fn update_item(&mut self, id: &K, index: usize, container_id: impl Into<ContainerId>) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        item.index = index;
        item.container_id = container_id.into();
        true
    }

    #[must_use]
    pub fn item(&self, id: &K) -> Option<&RegisteredItem<K>> {
        self.items.get(id)
    }

    /// Items of `container_id` other than `excluding`, sorted by index.
    #[must_use]
    pub fn siblings(&self, container_id: &str, excluding: &K) -> Vec<&RegisteredItem<K>> {
        let mut out: Vec<&RegisteredItem<K>> = self
            .items
            .values()
            .filter(|item| item.container_id == container_id && item.id != *excluding)
            .collect();
        out.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.registration.cmp(&b.registration)));
        out
    }

    /// Number of registered containers.
    #[must_use]
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Number of registered items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl<K> Default for Registry<K>
where
    K: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
