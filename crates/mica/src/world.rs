//! # World
//!
//! The main entry point. A world owns exactly one [`Registry`]; several
//! worlds in one program are completely isolated from each other.

use mica_core::{sort_by, Component, ComponentSet, Entity, Registry, View};

use crate::entity::EntityMut;

/// Container and facade for one registry's worth of entities and
/// components.
///
/// All operations forward to the owned [`Registry`]; the world adds the
/// ergonomic surface: handle construction, view construction and sort
/// invocation.
#[derive(Debug, Default)]
pub struct World {
    registry: Registry,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new entity and returns a handle to it.
    pub fn spawn(&mut self) -> EntityMut<'_> {
        let id = self.registry.create_entity();
        EntityMut::new(id, &mut self.registry)
    }

    /// Creates a new entity bound to `name`, or returns a handle to the
    /// existing entity if the name is already bound.
    pub fn spawn_named(&mut self, name: &str) -> EntityMut<'_> {
        let id = self.registry.create_named(name);
        EntityMut::new(id, &mut self.registry)
    }

    /// Returns a handle to an entity by id.
    ///
    /// The id is not checked; use [`EntityMut::is_valid`] on the handle.
    pub fn entity(&mut self, id: Entity) -> EntityMut<'_> {
        EntityMut::new(id, &mut self.registry)
    }

    /// Looks up an entity by name.
    ///
    /// Returns a handle carrying [`Entity::INVALID`] if the name was never
    /// bound.
    pub fn lookup(&mut self, name: &str) -> EntityMut<'_> {
        let id = self.registry.entity_by_name(name);
        EntityMut::new(id, &mut self.registry)
    }

    /// Destroys an entity: removes it from every pool, unbinds its name
    /// and recycles the id. No-op for invalid or already-destroyed ids.
    pub fn destroy(&mut self, id: Entity) {
        self.registry.destroy(id);
    }

    /// Returns a view over every entity holding all component types in `S`.
    pub fn view<S: ComponentSet>(&mut self) -> View<'_, S> {
        View::new(&mut self.registry)
    }

    /// Sorts the pool of component type `T` in place with the given
    /// "sorts-before" predicate.
    ///
    /// Entity lookup stays consistent throughout; the order of equal
    /// records is not preserved. No-op if nothing changed since the last
    /// sort of this pool, or if `T` could not be registered.
    pub fn sort_by<T, F>(&mut self, less: F)
    where
        T: Component,
        F: FnMut(&T, &T) -> bool,
    {
        let id = self.registry.component_id::<T>();
        if id.is_invalid() {
            return;
        }
        sort_by(self.registry.pool_mut(id), less);
    }

    /// Sets the singleton record of type `T` (one instance per world,
    /// keyed by type alone), overwriting any existing value.
    pub fn set_singleton<T: Component>(&mut self, record: T) -> &mut T {
        self.registry.set_singleton(record)
    }

    /// Returns the singleton record of type `T`, if one was set.
    #[must_use]
    pub fn get_singleton<T: Component>(&self) -> Option<&T> {
        self.registry.get_singleton::<T>()
    }

    /// Returns the mutable singleton record of type `T`, if one was set.
    pub fn get_singleton_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.registry.get_singleton_mut::<T>()
    }

    /// Returns a shared borrow of the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns an exclusive borrow of the underlying registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}
