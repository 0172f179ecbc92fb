//! # Entity Handle
//!
//! A thin wrapper pairing an entity id with a registry borrow, so that
//! per-entity operations chain naturally:
//!
//! ```rust,ignore
//! world.spawn()
//!     .set(Position { x: 1.0, y: 2.0 })
//!     .set(Velocity { dx: 0.5, dy: 0.0 });
//! ```
//!
//! Every method forwards to the registry; the handle owns nothing. The
//! registry's lifetime bounds the handle's.

use mica_core::{Component, Composition, Entity, Registry};

/// Mutable handle to one entity.
pub struct EntityMut<'w> {
    id: Entity,
    registry: &'w mut Registry,
}

impl<'w> EntityMut<'w> {
    /// Wraps an id and a registry borrow. The id may be invalid; check
    /// with [`is_valid`](Self::is_valid).
    pub(crate) fn new(id: Entity, registry: &'w mut Registry) -> Self {
        Self { id, registry }
    }

    /// Returns the entity id this handle refers to.
    #[must_use]
    pub fn id(&self) -> Entity {
        self.id
    }

    /// Checks if the id refers to a live entity of this registry.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.registry.is_valid(self.id)
    }

    /// Attaches a zeroed record of type `T`, if the entity does not hold
    /// one yet. No-op otherwise, and on an invalid handle.
    pub fn add<T: Component>(&mut self) -> &mut Self {
        if self.is_valid() && !self.registry.has::<T>(self.id) {
            // A fresh registration cannot be a duplicate.
            let _ = self.registry.add(self.id, T::zeroed());
        }
        self
    }

    /// Sets the record of type `T`, attaching it when absent. No-op on an
    /// invalid handle: the sentinel id must never become a pool member.
    pub fn set<T: Component>(&mut self, record: T) -> &mut Self {
        if self.is_valid() {
            // Only fails when the component-type id space is exhausted.
            let _ = self.registry.set(self.id, record);
        }
        self
    }

    /// Detaches the record of type `T`. No-op if the entity does not hold
    /// it.
    pub fn remove<T: Component>(&mut self) -> &mut Self {
        self.registry.remove::<T>(self.id);
        self
    }

    /// Checks if the entity holds a record of type `T`.
    pub fn has<T: Component>(&mut self) -> bool {
        self.registry.has::<T>(self.id)
    }

    /// Returns the record of type `T`, or `None` if the entity does not
    /// hold it.
    pub fn get<T: Component>(&mut self) -> Option<&T> {
        self.registry.get::<T>(self.id)
    }

    /// Returns the mutable record of type `T`, or `None` if the entity
    /// does not hold it.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.registry.get_mut::<T>(self.id)
    }

    /// Returns the ordered list of component-type names this entity holds.
    #[must_use]
    pub fn composition(&self) -> Composition {
        self.registry.composition(self.id)
    }

    /// Returns the name bound to this entity, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.registry.entity_name(self.id)
    }

    /// Destroys the entity and consumes the handle.
    pub fn destroy(self) {
        self.registry.destroy(self.id);
    }
}

impl std::fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityMut")
            .field("id", &self.id)
            .field("composition", &self.composition())
            .finish()
    }
}
