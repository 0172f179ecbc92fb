//! # Mica Core Engine
//!
//! A sparse-set Entity Component System storage engine:
//!
//! - Records of one component type are packed densely in one pool
//! - Existence checks, point lookups and removal are O(1)
//! - Views iterate the intersection of several component types
//! - Pools can be sorted in place without breaking entity lookup
//!
//! ## Architecture Rules
//!
//! 1. **Single-threaded** - one logical thread of control per [`Registry`]
//! 2. **Data-oriented** - components are plain-old-data in contiguous buffers
//! 3. **Borrows, not handles** - references returned from the registry are
//!    valid only until the next structural mutation of the same pool
//!
//! ## Example
//!
//! ```rust,ignore
//! use mica_core::{Registry, View};
//!
//! let mut registry = Registry::new();
//! let entity = registry.create_entity();
//! // registry.add(entity, Position { .. })?;
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ecs;

pub use ecs::{
    Component, ComponentId, ComponentPool, ComponentSet, Composition, EcsError, EcsResult, Entity,
    Registry, View, INITIAL_POOL_CAPACITY, MAX_COMPONENT_TYPES,
};
pub use ecs::sort::sort_by;
