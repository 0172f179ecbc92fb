//! # Views
//!
//! A view iterates, without building any intermediate collection, over
//! every entity currently holding all of a fixed set of component types.
//!
//! ## Algorithm
//!
//! - One component type: walk that pool's dense entries directly.
//! - Several: pick the currently-smallest of the pools (recomputed per
//!   call - pool sizes change between calls), walk its dense entries and
//!   probe membership of the remaining types per entity. O(1) probes
//!   against sparse sets, so the cost is O(|smallest| * (N-1)).
//!
//! Entities are yielded in the lead pool's current dense order, which is
//! unspecified and unstable across add/remove/sort: rely on it only as
//! "some permutation of the qualifying set".
//!
//! A view exclusively borrows its registry, so structural mutation of the
//! iterated pools from inside the callback is impossible by construction;
//! the yielded references only allow value mutation.

// SAFETY: `fetch_mut` hands out one mutable record reference per component
// type of the set. The tuple is checked to contain pairwise-distinct
// component ids, and records of distinct pools never alias.
#![allow(unsafe_code)]

use super::component::Component;
use super::registry::Registry;
use super::types::{ComponentId, Entity};

/// A fixed tuple of component types a [`View`] filters on.
///
/// Implemented for tuples of one to four component types. One-element sets
/// are written `(A,)` and yield `(&A,)`.
pub trait ComponentSet {
    /// Resolved component ids, in tuple order.
    type Ids: AsRef<[ComponentId]> + Copy;
    /// Shared references yielded by [`View::each`].
    type Refs<'a>;
    /// Mutable references yielded by [`View::each_mut`].
    type Muts<'a>;

    /// Resolves (registering on first use) the ids of every type in the set.
    fn resolve(registry: &mut Registry) -> Self::Ids;

    /// Fetches shared references for `entity`, or `None` if any component
    /// is absent.
    fn fetch<'a>(
        registry: &'a Registry,
        ids: &Self::Ids,
        entity: Entity,
    ) -> Option<Self::Refs<'a>>;

    /// Fetches mutable references for `entity`, or `None` if any component
    /// is absent.
    ///
    /// # Safety
    ///
    /// `registry` must be valid for exclusive access for `'a`, and `ids`
    /// must be pairwise distinct so the returned references cannot alias.
    unsafe fn fetch_mut<'a>(
        registry: *mut Registry,
        ids: &Self::Ids,
        entity: Entity,
    ) -> Option<Self::Muts<'a>>;
}

macro_rules! impl_component_set {
    ($len:literal; $(($T:ident, $i:tt)),+) => {
        impl<$($T: Component),+> ComponentSet for ($($T,)+) {
            type Ids = [ComponentId; $len];
            type Refs<'a> = ($(&'a $T,)+);
            type Muts<'a> = ($(&'a mut $T,)+);

            fn resolve(registry: &mut Registry) -> Self::Ids {
                [$(registry.component_id::<$T>()),+]
            }

            fn fetch<'a>(
                registry: &'a Registry,
                ids: &Self::Ids,
                entity: Entity,
            ) -> Option<Self::Refs<'a>> {
                Some(($(registry.pool(ids[$i]).get::<$T>(entity)?,)+))
            }

            unsafe fn fetch_mut<'a>(
                registry: *mut Registry,
                ids: &Self::Ids,
                entity: Entity,
            ) -> Option<Self::Muts<'a>> {
                Some(($({
                    // SAFETY: exclusive access guaranteed by the caller;
                    // ids are pairwise distinct, so each record reference
                    // points into a different pool.
                    let record: *mut $T = unsafe {
                        (*registry).pool_mut(ids[$i]).get_mut::<$T>(entity)?
                    };
                    unsafe { &mut *record }
                },)+))
            }
        }
    };
}

impl_component_set!(1; (A, 0));
impl_component_set!(2; (A, 0), (B, 1));
impl_component_set!(3; (A, 0), (B, 1), (C, 2));
impl_component_set!(4; (A, 0), (B, 1), (C, 2), (D, 3));

/// A stateless query over the intersection of entities holding a fixed set
/// of component types.
///
/// Holds only a borrow of the registry; nothing is cached across calls.
/// Constructing a view registers any unseen component types of the set,
/// matching registry policy. A set containing a type that failed to
/// register (id-space exhausted) yields nothing.
pub struct View<'r, S: ComponentSet> {
    registry: &'r mut Registry,
    ids: S::Ids,
}

impl<'r, S: ComponentSet> View<'r, S> {
    /// Creates a view over the registry.
    ///
    /// # Panics
    ///
    /// Panics if the set names the same component type twice.
    pub fn new(registry: &'r mut Registry) -> Self {
        let ids = S::resolve(registry);
        let slice = ids.as_ref();
        for (i, &id) in slice.iter().enumerate() {
            assert!(
                id.is_invalid() || !slice[..i].contains(&id),
                "component set names the same type twice"
            );
        }
        Self { registry, ids }
    }

    /// Calls `f` for every qualifying entity with shared references to its
    /// records.
    pub fn each<F>(&self, mut f: F)
    where
        F: for<'a> FnMut(Entity, S::Refs<'a>),
    {
        let ids = self.ids.as_ref();
        if ids.iter().any(|id| id.is_invalid()) {
            return;
        }

        let registry: &Registry = &*self.registry;
        let lead = if ids.len() == 1 {
            ids[0]
        } else {
            registry.smallest_pool(ids)
        };

        for slot in 0..registry.pool(lead).len() {
            let entity = registry.pool(lead).entity_at(slot);
            if ids.len() > 1 && !registry.has_all(entity, ids) {
                continue;
            }
            if let Some(refs) = S::fetch(registry, &self.ids, entity) {
                f(entity, refs);
            }
        }
    }

    /// Calls `f` for every qualifying entity with mutable references to its
    /// records.
    pub fn each_mut<F>(&mut self, mut f: F)
    where
        F: for<'a> FnMut(Entity, S::Muts<'a>),
    {
        let ids = self.ids.as_ref();
        if ids.iter().any(|id| id.is_invalid()) {
            return;
        }

        let lead = if ids.len() == 1 {
            ids[0]
        } else {
            self.registry.smallest_pool(ids)
        };
        let len = self.registry.pool(lead).len();
        let registry: *mut Registry = self.registry;

        for slot in 0..len {
            // SAFETY: the view exclusively borrows the registry; the only
            // references handed out per iteration are the record references
            // below, which are dropped before the next iteration begins.
            let entity = unsafe { (*registry).pool(lead).entity_at(slot) };
            if ids.len() > 1 && !unsafe { (*registry).has_all(entity, ids) } {
                continue;
            }
            // SAFETY: exclusive access as above; `new` checked the ids are
            // pairwise distinct.
            if let Some(muts) = unsafe { S::fetch_mut(registry, &self.ids, entity) } {
                f(entity, muts);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Pos {
        x: f32,
        y: f32,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Vel {
        dx: f32,
        dy: f32,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Frozen {
        since_tick: u32,
    }

    /// 10 entities: all get Pos, evens get Vel, multiples of 3 get Frozen.
    fn populated_registry() -> Registry {
        let mut registry = Registry::new();
        for raw in 0..10u32 {
            let entity = registry.create_entity();
            registry
                .add(entity, Pos { x: raw as f32, y: 0.0 })
                .unwrap();
            if raw % 2 == 0 {
                registry.add(entity, Vel { dx: 1.0, dy: 0.0 }).unwrap();
            }
            if raw % 3 == 0 {
                registry.add(entity, Frozen { since_tick: raw }).unwrap();
            }
        }
        registry
    }

    #[test]
    fn test_single_component_view_visits_whole_pool() {
        let mut registry = populated_registry();

        let mut visited = Vec::new();
        View::<(Pos,)>::new(&mut registry).each(|entity, (pos,)| {
            assert_eq!(pos.x, entity.raw() as f32);
            visited.push(entity);
        });

        assert_eq!(visited.len(), 10);
    }

    #[test]
    fn test_view_yields_exactly_the_intersection() {
        let mut registry = populated_registry();

        let mut visited = Vec::new();
        View::<(Pos, Vel, Frozen)>::new(&mut registry).each(|entity, (_pos, _vel, _frozen)| {
            visited.push(entity.raw());
        });

        visited.sort_unstable();
        assert_eq!(visited, vec![0, 6]); // divisible by both 2 and 3
    }

    #[test]
    fn test_view_matches_membership_regardless_of_lead_pool() {
        let mut registry = populated_registry();

        // Expected set from first principles
        let mut expected: Vec<u32> = (0..10).filter(|raw| raw % 2 == 0).collect();
        expected.sort_unstable();

        // (Pos, Vel) leads with the Vel pool; (Vel, Pos) flips the tuple
        // order but must yield the same set.
        let mut a = Vec::new();
        View::<(Pos, Vel)>::new(&mut registry).each(|entity, _| a.push(entity.raw()));
        let mut b = Vec::new();
        View::<(Vel, Pos)>::new(&mut registry).each(|entity, _| b.push(entity.raw()));

        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, expected);
        assert_eq!(b, expected);
    }

    #[test]
    fn test_each_mut_updates_records() {
        let mut registry = populated_registry();

        View::<(Pos, Vel)>::new(&mut registry).each_mut(|_, (pos, vel)| {
            pos.x += vel.dx;
            pos.y += vel.dy;
        });

        let mut moved = 0;
        View::<(Pos,)>::new(&mut registry).each(|entity, (pos,)| {
            let expected = if entity.raw() % 2 == 0 {
                entity.raw() as f32 + 1.0
            } else {
                entity.raw() as f32
            };
            assert_eq!(pos.x, expected);
            moved += 1;
        });
        assert_eq!(moved, 10);
    }

    #[test]
    fn test_view_over_empty_pool_yields_nothing() {
        let mut registry = Registry::new();
        let mut calls = 0;
        View::<(Pos, Vel)>::new(&mut registry).each(|_, _| calls += 1);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_view_reflects_removals() {
        let mut registry = populated_registry();

        for raw in 0..10u32 {
            if raw % 2 == 0 {
                registry.remove::<Vel>(Entity::from_raw(raw));
            }
        }

        let mut calls = 0;
        View::<(Pos, Vel)>::new(&mut registry).each(|_, _| calls += 1);
        assert_eq!(calls, 0);
    }
}
