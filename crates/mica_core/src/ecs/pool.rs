//! # Component Pool
//!
//! Type-erased, densely packed storage for all records of one component
//! type, plus the sparse/dense index pair that maps entities to slots.
//!
//! ```text
//! dense:  [e4, e1, e9]          <- slot i holds the entity occupying it
//! sparse: {e4: 0, e1: 1, e9: 2} <- entity -> slot
//! data:   [r0 | r1 | r2 | ...]  <- fixed-stride record bytes, len slots used
//! ```
//!
//! Invariant: `dense[sparse[e]] == e` for every member entity, records are
//! packed with no gaps in `[0, len)`. Removal is swap-with-last, so slot
//! order is not stable across removals.

// SAFETY: This module owns the raw record buffer; every unsafe block is
// documented against the slot bounds it relies on.
#![allow(unsafe_code)]

use std::alloc::{alloc, dealloc, Layout};
use std::collections::HashMap;
use std::ptr::NonNull;

use super::component::Component;
use super::error::{EcsError, EcsResult};
use super::types::{Entity, INITIAL_POOL_CAPACITY};

/// Dense storage and index structure for one component type.
///
/// The pool does not know the Rust type it stores; it works on records of a
/// fixed size and alignment captured at construction. Type safety is
/// recovered at the registry boundary via [`bytemuck`].
///
/// # Borrows
///
/// References returned from lookup methods are valid only until the next
/// structural mutation of this pool (a growth-triggering [`push`], a
/// [`remove`], or a sort).
///
/// [`push`]: ComponentPool::push
/// [`remove`]: ComponentPool::remove
pub struct ComponentPool {
    /// Record buffer. Dangling and never allocated for zero-sized records.
    data: NonNull<u8>,
    /// Logical size of one record in bytes.
    size: usize,
    /// Slot spacing in bytes: `size` rounded up to `align`.
    stride: usize,
    /// Alignment of the buffer and of every slot.
    align: usize,
    /// Number of occupied slots.
    len: usize,
    /// Number of allocated slots.
    capacity: usize,
    /// Entity -> slot index. Only current members are present.
    sparse: HashMap<Entity, usize>,
    /// Slot index -> entity. The inverse of `sparse`.
    dense: Vec<Entity>,
    /// Name of the stored component type, for diagnostics.
    name: String,
    /// Advisory flag: true while slot order matches the last sort.
    sorted: bool,
}

impl ComponentPool {
    /// Creates an empty pool for records of the given size and alignment.
    ///
    /// Zero-sized records are supported; such a pool never allocates.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two.
    #[must_use]
    pub fn new(size: usize, align: usize, name: impl Into<String>) -> Self {
        assert!(
            align > 0 && align.is_power_of_two(),
            "record alignment must be a power of two"
        );

        let stride = (size + align - 1) & !(align - 1);
        let (data, capacity) = if stride == 0 {
            // Zero-sized records: membership tracking only, no buffer.
            (NonNull::dangling(), 0)
        } else {
            let capacity = INITIAL_POOL_CAPACITY;
            (Self::allocate(stride, align, capacity), capacity)
        };

        Self {
            data,
            size,
            stride,
            align,
            len: 0,
            capacity,
            sparse: HashMap::new(),
            dense: Vec::new(),
            name: name.into(),
            sorted: false,
        }
    }

    /// Creates a pool sized for records of type `T`.
    #[must_use]
    pub fn for_type<T: Component>() -> Self {
        Self::new(
            std::mem::size_of::<T>(),
            std::mem::align_of::<T>(),
            std::any::type_name::<T>(),
        )
    }

    /// Returns the number of live records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks if the pool holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of allocated slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the logical record size in bytes.
    #[inline]
    #[must_use]
    pub fn record_size(&self) -> usize {
        self.size
    }

    /// Returns the name of the stored component type.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks if the pool contains a record for `entity`.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.sparse.contains_key(&entity)
    }

    /// Returns the entity occupying `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= len`.
    #[inline]
    #[must_use]
    pub fn entity_at(&self, slot: usize) -> Entity {
        self.dense[slot]
    }

    /// Appends a record for `entity`, growing the buffer if full.
    ///
    /// Growth reallocates the buffer, which invalidates every previously
    /// returned record reference for this pool.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::RecordSizeMismatch`] if `record` is not exactly
    /// one record long, or [`EcsError::DuplicateComponent`] if the pool
    /// already contains `entity`.
    pub fn push(&mut self, entity: Entity, record: &[u8]) -> EcsResult<&mut [u8]> {
        self.check_record_len(record)?;

        if self.contains(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: self.name.clone(),
            });
        }

        if self.stride > 0 && self.len == self.capacity {
            self.grow();
        }

        let slot = self.len;
        self.sparse.insert(entity, slot);
        self.dense.push(entity);
        self.len += 1;
        self.sorted = false;

        // SAFETY: slot < capacity after the growth check, so the slot range
        // lies inside the allocation (or is empty for zero-sized records).
        unsafe {
            let dst = self.slot_ptr(slot);
            std::ptr::copy_nonoverlapping(record.as_ptr(), dst, self.size);
            Ok(std::slice::from_raw_parts_mut(dst, self.size))
        }
    }

    /// Overwrites the record bytes for `entity` in place.
    ///
    /// The entity keeps its slot; no other record moves.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::RecordSizeMismatch`] if `record` is not exactly
    /// one record long, or [`EcsError::MissingComponent`] if the pool does
    /// not contain `entity`.
    pub fn write(&mut self, entity: Entity, record: &[u8]) -> EcsResult<()> {
        self.check_record_len(record)?;

        let slot = self.slot_of(entity)?;
        self.sorted = false;

        // SAFETY: slot < len, so the slot range lies inside the allocation.
        unsafe {
            std::ptr::copy_nonoverlapping(record.as_ptr(), self.slot_ptr(slot), self.size);
        }
        Ok(())
    }

    /// Removes the record for `entity` via swap-with-last.
    ///
    /// O(1), but the entity previously occupying the last slot moves into
    /// the freed slot, so slot order is not preserved.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the pool does not contain
    /// `entity`.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<()> {
        let slot = self.slot_of(entity)?;
        let last = self.len - 1;

        if slot != last {
            // SAFETY: slot and last are both < len and distinct.
            unsafe {
                std::ptr::copy_nonoverlapping(
                    self.slot_ptr(last),
                    self.slot_ptr(slot),
                    self.size,
                );
            }
            let moved = self.dense[last];
            self.dense[slot] = moved;
            self.sparse.insert(moved, slot);
        }

        self.dense.pop();
        self.sparse.remove(&entity);
        self.len -= 1;
        self.sorted = false;
        Ok(())
    }

    /// Returns the record bytes for `entity`, or `None` if absent.
    #[must_use]
    pub fn bytes_of(&self, entity: Entity) -> Option<&[u8]> {
        let slot = *self.sparse.get(&entity)?;
        Some(self.slot_bytes(slot))
    }

    /// Returns the mutable record bytes for `entity`, or `None` if absent.
    pub fn bytes_of_mut(&mut self, entity: Entity) -> Option<&mut [u8]> {
        let slot = *self.sparse.get(&entity)?;
        self.sorted = false;
        Some(self.slot_bytes_mut(slot))
    }

    /// Returns a typed view of the record for `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the record layout of this pool.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.bytes_of(entity).map(bytemuck::from_bytes)
    }

    /// Returns a typed mutable view of the record for `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the record layout of this pool.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.bytes_of_mut(entity).map(bytemuck::from_bytes_mut)
    }

    /// Returns a typed view of the record at `slot`.
    ///
    /// Index-based access for the sort and view components; other callers
    /// should go through entity-keyed lookups.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= len` or `T` does not match the record layout.
    #[must_use]
    pub fn record_at<T: Component>(&self, slot: usize) -> &T {
        bytemuck::from_bytes(self.slot_bytes(slot))
    }

    /// Returns the raw record bytes at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= len`.
    #[must_use]
    pub fn slot_bytes(&self, slot: usize) -> &[u8] {
        assert!(slot < self.len, "slot {slot} out of bounds");
        // SAFETY: slot < len <= capacity; for zero-sized records the slice
        // is empty and the dangling pointer is aligned and non-null.
        unsafe { std::slice::from_raw_parts(self.slot_ptr_const(slot), self.size) }
    }

    /// Returns the mutable raw record bytes at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= len`.
    pub fn slot_bytes_mut(&mut self, slot: usize) -> &mut [u8] {
        assert!(slot < self.len, "slot {slot} out of bounds");
        // SAFETY: slot < len <= capacity; exclusive access through &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.slot_ptr(slot), self.size) }
    }

    /// Swaps two slots: record bytes AND both index-map entries, together.
    ///
    /// This is the single primitive the sort is built on. Swapping data
    /// without the maps (or the maps without the data) would desynchronize
    /// entity lookup, so neither half is exposed on its own.
    ///
    /// # Panics
    ///
    /// Panics if either slot is out of bounds.
    pub fn swap_slots(&mut self, a: usize, b: usize) {
        assert!(a < self.len && b < self.len, "slot out of bounds");
        if a == b {
            return;
        }

        // SAFETY: both slots are < len and distinct, so the ranges are
        // inside the allocation and do not overlap.
        unsafe {
            std::ptr::swap_nonoverlapping(self.slot_ptr(a), self.slot_ptr(b), self.size);
        }

        let entity_a = self.dense[a];
        let entity_b = self.dense[b];
        self.dense.swap(a, b);
        self.sparse.insert(entity_a, b);
        self.sparse.insert(entity_b, a);
    }

    /// Checks the advisory sorted flag.
    ///
    /// The flag is cleared by every mutation of this pool, so it can only
    /// be used to skip redundant sorts, never for correctness.
    #[inline]
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Sets the advisory sorted flag.
    #[inline]
    pub fn set_sorted(&mut self, sorted: bool) {
        self.sorted = sorted;
    }

    /// Rejects record slices that are not exactly one record long.
    ///
    /// The buffer copy is always `size` bytes, so a shorter slice would be
    /// read past its end.
    fn check_record_len(&self, record: &[u8]) -> EcsResult<()> {
        if record.len() == self.size {
            return Ok(());
        }
        Err(EcsError::RecordSizeMismatch {
            component: self.name.clone(),
            expected: self.size,
            actual: record.len(),
        })
    }

    /// Resolves the slot of `entity` or fails with a missing-component error.
    fn slot_of(&self, entity: Entity) -> EcsResult<usize> {
        self.sparse
            .get(&entity)
            .copied()
            .ok_or_else(|| EcsError::MissingComponent {
                entity,
                component: self.name.clone(),
            })
    }

    /// Pointer to the start of `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must be < capacity (or the record size must be zero).
    #[inline]
    unsafe fn slot_ptr(&mut self, slot: usize) -> *mut u8 {
        self.data.as_ptr().add(slot * self.stride)
    }

    /// Const pointer to the start of `slot`.
    ///
    /// # Safety
    ///
    /// `slot` must be < capacity (or the record size must be zero).
    #[inline]
    unsafe fn slot_ptr_const(&self, slot: usize) -> *const u8 {
        self.data.as_ptr().add(slot * self.stride)
    }

    /// Allocates a zero-initialized buffer of `capacity` slots.
    fn allocate(stride: usize, align: usize, capacity: usize) -> NonNull<u8> {
        let layout =
            Layout::from_size_align(stride * capacity, align).expect("invalid record layout");

        // SAFETY: the layout has non-zero size (stride > 0, capacity > 0).
        unsafe {
            let ptr = alloc(layout);
            let Some(ptr) = NonNull::new(ptr) else {
                std::alloc::handle_alloc_error(layout);
            };
            std::ptr::write_bytes(ptr.as_ptr(), 0, stride * capacity);
            ptr
        }
    }

    /// Doubles the buffer capacity, preserving all stored records.
    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        let new_data = Self::allocate(self.stride, self.align, new_capacity);

        // SAFETY: both buffers are valid for len * stride bytes and the
        // allocations are distinct.
        unsafe {
            std::ptr::copy_nonoverlapping(
                self.data.as_ptr(),
                new_data.as_ptr(),
                self.len * self.stride,
            );
            self.release_buffer();
        }

        self.data = new_data;
        self.capacity = new_capacity;
    }

    /// Deallocates the current buffer, if one was ever allocated.
    ///
    /// # Safety
    ///
    /// The buffer must not be accessed again until `self.data` is replaced.
    unsafe fn release_buffer(&mut self) {
        if self.stride > 0 && self.capacity > 0 {
            let layout = Layout::from_size_align(self.stride * self.capacity, self.align)
                .expect("invalid record layout");
            dealloc(self.data.as_ptr(), layout);
        }
    }
}

impl Drop for ComponentPool {
    fn drop(&mut self) {
        // Records are Pod: no drop glue to run, only the buffer to free.
        // SAFETY: the pool is being dropped; the buffer is not used again.
        unsafe {
            self.release_buffer();
        }
    }
}

impl std::fmt::Debug for ComponentPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentPool")
            .field("name", &self.name)
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("record_size", &self.size)
            .finish_non_exhaustive()
    }
}
