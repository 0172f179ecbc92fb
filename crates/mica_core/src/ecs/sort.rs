//! # In-place Pool Sort
//!
//! Reorders one pool's records to satisfy a caller-supplied ordering while
//! keeping every entity findable by id afterward.
//!
//! Standard library sorts cannot be used here: they move records without
//! telling the sparse/dense index pair. Instead, a plain partition-exchange
//! sort (quicksort) runs directly on the pool and performs every exchange
//! through [`ComponentPool::swap_slots`], which moves the record bytes and
//! both index entries together. The pool invariant therefore holds at every
//! intermediate step, not just at the end.
//!
//! Properties: unstable, average O(n log n) comparisons, worst case O(n^2)
//! (last-slot pivot, no hardening), O(log n) average recursion stack, no
//! extra record storage.

use tracing::trace;

use super::component::Component;
use super::pool::ComponentPool;

/// Sorts the pool's records in place so that `less` holds (non-strictly)
/// along the dense order.
///
/// `less(a, b)` must implement a strict weak ordering ("a sorts before b").
/// Pools of size 0 or 1 are no-ops, as is a pool whose advisory sorted flag
/// is still set (nothing mutated since the last sort).
///
/// # Panics
///
/// Panics if `T` does not match the pool's record layout.
pub fn sort_by<T, F>(pool: &mut ComponentPool, mut less: F)
where
    T: Component,
    F: FnMut(&T, &T) -> bool,
{
    assert_eq!(
        pool.record_size(),
        std::mem::size_of::<T>(),
        "sort record type does not match pool {}",
        pool.name()
    );

    if pool.is_sorted() || pool.len() < 2 {
        return;
    }

    let high = pool.len() - 1;
    quicksort(pool, 0, high, &mut less);
    pool.set_sorted(true);
    trace!(pool = pool.name(), records = pool.len(), "pool sorted");
}

/// Recursive quicksort over the inclusive slot range `[low, high]`.
fn quicksort<T, F>(pool: &mut ComponentPool, low: usize, high: usize, less: &mut F)
where
    T: Component,
    F: FnMut(&T, &T) -> bool,
{
    if low >= high {
        return;
    }

    let pivot_slot = partition(pool, low, high, less);
    if pivot_slot > low {
        quicksort(pool, low, pivot_slot - 1, less);
    }
    if pivot_slot < high {
        quicksort(pool, pivot_slot + 1, high, less);
    }
}

/// Lomuto partition around the record in the last slot of the range.
///
/// Returns the slot the pivot record ends up in. Every exchange goes
/// through `swap_slots`, so entity lookup stays consistent throughout.
fn partition<T, F>(pool: &mut ComponentPool, low: usize, high: usize, less: &mut F) -> usize
where
    T: Component,
    F: FnMut(&T, &T) -> bool,
{
    // Copy, not borrow: the pivot record moves during the scan.
    let pivot: T = *pool.record_at::<T>(high);

    let mut boundary = low;
    for slot in low..high {
        if less(pool.record_at::<T>(slot), &pivot) {
            pool.swap_slots(boundary, slot);
            boundary += 1;
        }
    }
    pool.swap_slots(boundary, high);
    boundary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::types::Entity;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Depth {
        z: i32,
    }

    fn pool_with(values: &[i32]) -> ComponentPool {
        let mut pool = ComponentPool::for_type::<Depth>();
        for (raw, &z) in values.iter().enumerate() {
            let entity = Entity::from_raw(u32::try_from(raw).unwrap());
            pool.push(entity, bytemuck::bytes_of(&Depth { z })).unwrap();
        }
        pool
    }

    fn dense_values(pool: &ComponentPool) -> Vec<i32> {
        (0..pool.len()).map(|slot| pool.record_at::<Depth>(slot).z).collect()
    }

    #[test]
    fn test_sort_orders_dense_slots() {
        let mut pool = pool_with(&[5, 1, 3]);

        sort_by::<Depth, _>(&mut pool, |a, b| a.z < b.z);

        assert_eq!(dense_values(&pool), vec![1, 3, 5]);
        assert!(pool.is_sorted());
    }

    #[test]
    fn test_sort_preserves_entity_lookup() {
        let values = [9, -4, 7, 0, 7, 3, -4, 12, 1, 5];
        let mut pool = pool_with(&values);

        sort_by::<Depth, _>(&mut pool, |a, b| a.z < b.z);

        // Non-decreasing along dense order
        let sorted = dense_values(&pool);
        for window in sorted.windows(2) {
            assert!(window[0] <= window[1]);
        }
        // Every entity still resolves to its original value
        for (raw, &z) in values.iter().enumerate() {
            let entity = Entity::from_raw(u32::try_from(raw).unwrap());
            assert_eq!(pool.get::<Depth>(entity), Some(&Depth { z }));
        }
    }

    #[test]
    fn test_sort_descending_predicate() {
        let mut pool = pool_with(&[2, 8, 4]);

        sort_by::<Depth, _>(&mut pool, |a, b| a.z > b.z);

        assert_eq!(dense_values(&pool), vec![8, 4, 2]);
    }

    #[test]
    fn test_trivial_pools_are_noops() {
        let mut empty = pool_with(&[]);
        sort_by::<Depth, _>(&mut empty, |a, b| a.z < b.z);
        assert_eq!(empty.len(), 0);

        let mut single = pool_with(&[42]);
        sort_by::<Depth, _>(&mut single, |a, b| a.z < b.z);
        assert_eq!(dense_values(&single), vec![42]);
    }

    #[test]
    fn test_adversarial_inputs() {
        let reversed: Vec<i32> = (0..64).rev().collect();
        let mut pool = pool_with(&reversed);
        sort_by::<Depth, _>(&mut pool, |a, b| a.z < b.z);
        assert_eq!(dense_values(&pool), (0..64).collect::<Vec<_>>());

        let equal = vec![7; 32];
        let mut pool = pool_with(&equal);
        sort_by::<Depth, _>(&mut pool, |a, b| a.z < b.z);
        assert_eq!(dense_values(&pool), equal);
    }

    #[test]
    fn test_sorted_flag_skips_redundant_work() {
        let mut pool = pool_with(&[3, 1, 2]);
        sort_by::<Depth, _>(&mut pool, |a, b| a.z < b.z);
        assert_eq!(dense_values(&pool), vec![1, 2, 3]);

        // Nothing mutated: a second sort (even with the opposite order) is
        // skipped because the advisory flag is still set.
        sort_by::<Depth, _>(&mut pool, |a, b| a.z > b.z);
        assert_eq!(dense_values(&pool), vec![1, 2, 3]);

        // Any mutation clears the flag, so sorting works again.
        let slot0_entity = pool.entity_at(0);
        pool.write(slot0_entity, bytemuck::bytes_of(&Depth { z: 10 }))
            .unwrap();
        sort_by::<Depth, _>(&mut pool, |a, b| a.z > b.z);
        assert_eq!(dense_values(&pool), vec![10, 3, 2]);
    }
}
