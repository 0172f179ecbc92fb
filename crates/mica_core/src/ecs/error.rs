//! # Engine Error Types
//!
//! All recoverable failures of the storage engine.
//!
//! Two failure classes deliberately do NOT appear here, per the engine's
//! soft-failure policy:
//! - component-type capacity exhaustion is reported through the
//!   [`ComponentId::INVALID`](super::ComponentId::INVALID) sentinel, and
//! - registry-level reads of a component an entity never had return
//!   `None`/`false`/no-op instead of an error.

use thiserror::Error;

use super::types::Entity;

/// Errors that can occur in the storage engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A strict pool operation was called for an entity the pool does not
    /// contain.
    #[error("entity {:?} has no {component} component", entity)]
    MissingComponent {
        /// The entity that was looked up.
        entity: Entity,
        /// Name of the component type.
        component: String,
    },

    /// An entity was added to a pool it already belongs to.
    #[error("entity {:?} already has a {component} component", entity)]
    DuplicateComponent {
        /// The entity that was added twice.
        entity: Entity,
        /// Name of the component type.
        component: String,
    },

    /// A record of the wrong byte length was handed to a pool.
    #[error("record of {actual} bytes does not match {component} (expected {expected})")]
    RecordSizeMismatch {
        /// Name of the component type the pool stores.
        component: String,
        /// The pool's record size.
        expected: usize,
        /// Length of the rejected record.
        actual: usize,
    },

    /// A typed operation was attempted after component-type registration
    /// failed with the invalid-id sentinel.
    #[error("component type {0} could not be registered (type limit reached)")]
    UnregisteredComponent(&'static str),
}

/// Result type for storage engine operations.
pub type EcsResult<T> = Result<T, EcsError>;
