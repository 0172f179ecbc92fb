//! # Registry
//!
//! The central owner of all component pools, the component-id assignment
//! table and the entity-id space. Every other part of the engine (views,
//! sort, the facade handles) operates through a borrow of one registry.
//!
//! The registry exposes a soft-failure surface: reading, removing or
//! testing a component the entity never had is not an error, it simply
//! returns `None`/`false`/does nothing. Strict preconditions live one layer
//! down, in [`ComponentPool`].

use std::any::TypeId;
use std::collections::{HashMap, VecDeque};
use std::fmt;

use tracing::{debug, trace, warn};

use super::component::Component;
use super::error::{EcsError, EcsResult};
use super::pool::ComponentPool;
use super::types::{ComponentId, Entity, MAX_COMPONENT_TYPES};

/// The ordered list of component-type names an entity currently holds.
///
/// Produced by [`Registry::composition`]; `Display` joins the names with
/// `", "` for debug output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Composition(Vec<String>);

impl Composition {
    /// Returns the component-type names, in component-id order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Checks if the entity held no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Key under which a singleton record is stored in its one-slot pool.
const SINGLETON_KEY: Entity = Entity::from_raw(0);

/// Owner of all pools, component ids and the entity-id space.
///
/// - Component ids form a dense, gapless range `[0, pool_count)`; once
///   assigned, a type's id never changes and is never reclaimed.
/// - Entity ids are unique among live entities; destroyed ids are recycled
///   through a free list.
#[derive(Default)]
pub struct Registry {
    /// One pool per registered component type, indexed by `ComponentId`.
    pools: Vec<ComponentPool>,
    /// Component-id assignment table, keyed by type identity.
    component_ids: HashMap<TypeId, ComponentId>,
    /// Singleton records: one-slot pools keyed by type alone.
    singletons: HashMap<TypeId, ComponentPool>,
    /// Name -> entity bindings created by `create_named`.
    names: HashMap<String, Entity>,
    /// Destroyed ids awaiting reuse.
    free_ids: VecDeque<Entity>,
    /// Next never-used id.
    next_id: u32,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Entity lifecycle
    // ========================================================================

    /// Creates a new entity, reusing a destroyed id when one is free.
    pub fn create_entity(&mut self) -> Entity {
        if let Some(id) = self.free_ids.pop_front() {
            return id;
        }
        let id = Entity::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    /// Creates a new entity bound to `name`, idempotently.
    ///
    /// If the name is already bound this returns the existing id unchanged;
    /// no new entity is created.
    pub fn create_named(&mut self, name: &str) -> Entity {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = self.create_entity();
        self.names.insert(name.to_owned(), id);
        id
    }

    /// Looks up the entity bound to `name`.
    ///
    /// Returns [`Entity::INVALID`] if the name was never bound.
    #[must_use]
    pub fn entity_by_name(&self, name: &str) -> Entity {
        self.names.get(name).copied().unwrap_or(Entity::INVALID)
    }

    /// Returns the name bound to `entity`, if any.
    #[must_use]
    pub fn entity_name(&self, entity: Entity) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, &id)| id == entity)
            .map(|(name, _)| name.as_str())
    }

    /// Checks if `entity` is an id this registry has issued and not freed.
    #[must_use]
    pub fn is_valid(&self, entity: Entity) -> bool {
        !entity.is_invalid() && entity.raw() < self.next_id && !self.free_ids.contains(&entity)
    }

    /// Destroys an entity: full teardown, then id recycling.
    ///
    /// Removes the entity from every pool that contains it, unbinds any
    /// name bound to it, and returns the id to the free list. Destroying an
    /// invalid or already-destroyed id is a no-op, so an id can never enter
    /// the free list twice.
    pub fn destroy(&mut self, entity: Entity) {
        if !self.is_valid(entity) {
            return;
        }

        for pool in &mut self.pools {
            if pool.contains(entity) {
                // Membership was just checked.
                let _ = pool.remove(entity);
            }
        }
        self.names.retain(|_, &mut id| id != entity);
        self.free_ids.push_back(entity);
        trace!(entity = entity.raw(), "entity destroyed");
    }

    // ========================================================================
    // Component-type registration
    // ========================================================================

    /// Returns the stable id for component type `T`, registering it (and
    /// creating its pool) on first use.
    ///
    /// Returns [`ComponentId::INVALID`] once [`MAX_COMPONENT_TYPES`] pools
    /// exist; existing registrations are unaffected.
    pub fn component_id<T: Component>(&mut self) -> ComponentId {
        let type_id = TypeId::of::<T>();
        if let Some(&id) = self.component_ids.get(&type_id) {
            return id;
        }

        let id = self.register_pool(
            std::any::type_name::<T>(),
            std::mem::size_of::<T>(),
            std::mem::align_of::<T>(),
        );
        if !id.is_invalid() {
            self.component_ids.insert(type_id, id);
        }
        id
    }

    /// Registers a pool for records of the given layout, without a Rust
    /// type behind it.
    ///
    /// This is the type-erased path [`component_id`](Self::component_id) is
    /// built on; records in such a pool can only be accessed as bytes.
    pub fn register_pool(&mut self, name: &str, size: usize, align: usize) -> ComponentId {
        if self.pools.len() >= MAX_COMPONENT_TYPES {
            warn!(component = name, "component type limit reached");
            return ComponentId::INVALID;
        }

        self.pools.push(ComponentPool::new(size, align, name));
        let id = ComponentId::from_raw(u8::try_from(self.pools.len() - 1).unwrap_or(u8::MAX));
        debug!(component = name, id = id.raw(), "component type registered");
        id
    }

    /// Returns the number of registered component types.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Returns the pool for a component id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is invalid or unregistered.
    #[must_use]
    pub fn pool(&self, id: ComponentId) -> &ComponentPool {
        &self.pools[id.index()]
    }

    /// Returns the mutable pool for a component id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is invalid or unregistered.
    pub fn pool_mut(&mut self, id: ComponentId) -> &mut ComponentPool {
        &mut self.pools[id.index()]
    }

    // ========================================================================
    // Component dispatch
    // ========================================================================

    /// Adds a component record to an entity.
    ///
    /// Returns a reference to the stored record. The reference is valid
    /// only until the next structural mutation of this component's pool.
    ///
    /// # Errors
    ///
    /// - [`EcsError::DuplicateComponent`] if the entity already holds `T`
    /// - [`EcsError::UnregisteredComponent`] if the type limit is reached
    pub fn add<T: Component>(&mut self, entity: Entity, record: T) -> EcsResult<&mut T> {
        let id = self.typed_id::<T>()?;
        let bytes = self
            .pool_mut(id)
            .push(entity, bytemuck::bytes_of(&record))?;
        Ok(bytemuck::from_bytes_mut(bytes))
    }

    /// Sets the component record for an entity, adding it when absent.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnregisteredComponent`] if the type limit is
    /// reached.
    pub fn set<T: Component>(&mut self, entity: Entity, record: T) -> EcsResult<()> {
        let id = self.typed_id::<T>()?;
        let pool = self.pool_mut(id);
        if pool.contains(entity) {
            pool.write(entity, bytemuck::bytes_of(&record))?;
        } else {
            pool.push(entity, bytemuck::bytes_of(&record))?;
        }
        Ok(())
    }

    /// Removes component `T` from an entity. No-op if the entity does not
    /// hold it.
    pub fn remove<T: Component>(&mut self, entity: Entity) {
        let id = self.component_id::<T>();
        if id.is_invalid() {
            return;
        }
        let pool = self.pool_mut(id);
        if pool.contains(entity) {
            // Membership was just checked.
            let _ = pool.remove(entity);
        }
    }

    /// Checks if an entity holds component `T`.
    pub fn has<T: Component>(&mut self, entity: Entity) -> bool {
        let id = self.component_id::<T>();
        !id.is_invalid() && self.pool(id).contains(entity)
    }

    /// Short-circuiting membership test over a set of component ids.
    #[must_use]
    pub fn has_all(&self, entity: Entity, ids: &[ComponentId]) -> bool {
        ids.iter()
            .all(|&id| !id.is_invalid() && self.pool(id).contains(entity))
    }

    /// Returns the component record of type `T` for an entity, or `None`
    /// if the entity does not hold it.
    pub fn get<T: Component>(&mut self, entity: Entity) -> Option<&T> {
        let id = self.component_id::<T>();
        if id.is_invalid() {
            return None;
        }
        self.pool(id).get::<T>(entity)
    }

    /// Returns the mutable component record of type `T` for an entity, or
    /// `None` if the entity does not hold it.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.component_id::<T>();
        if id.is_invalid() {
            return None;
        }
        self.pool_mut(id).get_mut::<T>(entity)
    }

    /// Returns the id of the pool with the fewest live records among `ids`.
    ///
    /// A cardinality heuristic for view iteration, recomputed on every
    /// call; not a query optimizer.
    ///
    /// # Panics
    ///
    /// Panics if `ids` is empty.
    #[must_use]
    pub fn smallest_pool(&self, ids: &[ComponentId]) -> ComponentId {
        let mut smallest = ids[0];
        let mut smallest_len = self.pool(smallest).len();
        for &id in &ids[1..] {
            let len = self.pool(id).len();
            if len < smallest_len {
                smallest = id;
                smallest_len = len;
            }
        }
        smallest
    }

    /// Returns the ordered component-type names `entity` currently holds.
    ///
    /// O(number of registered types).
    #[must_use]
    pub fn composition(&self, entity: Entity) -> Composition {
        Composition(
            self.pools
                .iter()
                .filter(|pool| pool.contains(entity))
                .map(|pool| pool.name().to_owned())
                .collect(),
        )
    }

    // ========================================================================
    // Singleton records (one instance per registry, keyed by type alone)
    // ========================================================================

    /// Sets the singleton record of type `T`, overwriting any existing
    /// value. Returns a reference to the stored record.
    pub fn set_singleton<T: Component>(&mut self, record: T) -> &mut T {
        let pool = self
            .singletons
            .entry(TypeId::of::<T>())
            .or_insert_with(ComponentPool::for_type::<T>);
        if pool.contains(SINGLETON_KEY) {
            // A one-slot pool: the key is always present after first set.
            let _ = pool.write(SINGLETON_KEY, bytemuck::bytes_of(&record));
        } else {
            let _ = pool.push(SINGLETON_KEY, bytemuck::bytes_of(&record));
        }
        pool.get_mut::<T>(SINGLETON_KEY)
            .expect("singleton record was just stored")
    }

    /// Returns the singleton record of type `T`, if one was set.
    #[must_use]
    pub fn get_singleton<T: Component>(&self) -> Option<&T> {
        self.singletons
            .get(&TypeId::of::<T>())?
            .get::<T>(SINGLETON_KEY)
    }

    /// Returns the mutable singleton record of type `T`, if one was set.
    pub fn get_singleton_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.singletons
            .get_mut(&TypeId::of::<T>())?
            .get_mut::<T>(SINGLETON_KEY)
    }

    /// Resolves `T`'s component id, surfacing the capacity sentinel as an
    /// error for operations that already return a `Result`.
    fn typed_id<T: Component>(&mut self) -> EcsResult<ComponentId> {
        let id = self.component_id::<T>();
        if id.is_invalid() {
            return Err(EcsError::UnregisteredComponent(std::any::type_name::<T>()));
        }
        Ok(id)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("pools", &self.pools.len())
            .field("live_ids", &(self.next_id as usize - self.free_ids.len()))
            .field("names", &self.names.len())
            .finish_non_exhaustive()
    }
}
