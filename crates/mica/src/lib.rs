//! # Mica
//!
//! A small sparse-set entity/component storage engine.
//!
//! Entities are plain integer keys; components are plain-old-data records
//! attached to them. Each component type lives in its own densely packed
//! pool with O(1) membership, lookup and removal, views iterate the
//! intersection of several component types, and pools can be sorted in
//! place without breaking entity lookup.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mica::World;
//!
//! let mut world = World::new();
//! let player = world.spawn_named("Player").set(Position { x: 0.0, y: 0.0 }).id();
//!
//! world.view::<(Position, Velocity)>().each_mut(|_, (pos, vel)| {
//!     pos.x += vel.dx;
//!     pos.y += vel.dy;
//! });
//! ```

#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

mod entity;
mod world;

pub use entity::EntityMut;
pub use world::World;

pub use mica_core::{
    sort_by, Component, ComponentId, ComponentPool, ComponentSet, Composition, EcsError,
    EcsResult, Entity, Registry, View, MAX_COMPONENT_TYPES,
};
