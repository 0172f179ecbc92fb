//! # Entity Component System
//!
//! The storage and query engine behind mica.
//!
//! ## Design Philosophy
//!
//! - Each component type lives in its own densely packed pool
//! - A sparse/dense index pair gives O(1) membership, lookup and removal
//! - Component ids are assigned at runtime, on first registration
//! - No dynamic dispatch in hot paths; no globals

pub mod component;
pub mod error;
pub mod pool;
pub mod registry;
pub mod sort;
pub mod types;
pub mod view;

pub use component::Component;
pub use error::{EcsError, EcsResult};
pub use pool::ComponentPool;
pub use registry::{Composition, Registry};
pub use types::{ComponentId, Entity, INITIAL_POOL_CAPACITY, MAX_COMPONENT_TYPES};
pub use view::{ComponentSet, View};
