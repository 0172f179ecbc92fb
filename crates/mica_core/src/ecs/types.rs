//! # Core Identifiers
//!
//! Entities and component types are identified by small integer keys.
//! Both carry a reserved sentinel for "invalid" so that lookups can fail
//! without an error path.

/// Maximum number of distinct component types a registry can hold.
///
/// Component ids are `u8` with [`ComponentId::INVALID`] reserved, which
/// leaves ids `0..=254`. Registration past this limit is refused with the
/// sentinel; existing registrations are unaffected.
pub const MAX_COMPONENT_TYPES: usize = 255;

/// Initial slot capacity of a freshly created component pool.
///
/// Pools grow by doubling once this is exceeded.
pub const INITIAL_POOL_CAPACITY: usize = 32;

/// Unique identifier for an entity.
///
/// An entity is purely a lookup key: it has no data of its own. Ids are
/// issued by the registry and recycled through its free list after destroy,
/// so an id is only unique among currently-live entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Invalid/null entity id.
    pub const INVALID: Self = Self(u32::MAX);

    /// Creates an entity id from a raw index.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index of this entity id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Checks if this entity id is the invalid sentinel.
    #[inline]
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Identifier of a registered component type.
///
/// Assigned the first time a record type is registered, stable for the
/// lifetime of the registry, never reclaimed. Indexes the registry's pool
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ComponentId(u8);

impl ComponentId {
    /// Invalid component id, returned when the type limit is reached.
    pub const INVALID: Self = Self(u8::MAX);

    /// Creates a component id from a raw index.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw index of this component id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns this id as a pool-table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this component id is the invalid sentinel.
    #[inline]
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u8::MAX
    }
}

impl Default for ComponentId {
    fn default() -> Self {
        Self::INVALID
    }
}
