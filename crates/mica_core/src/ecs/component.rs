//! # Component Records
//!
//! Components are pure data containers with no behavior. They are stored
//! type-erased as raw bytes inside a pool, so every component type must be
//! plain old data.

use bytemuck::Pod;

/// Marker trait for component record types.
///
/// Components must be:
/// - `Copy`: no heap allocations, bitwise copyable
/// - `Pod`: plain old data, safe to view as bytes and back
/// - `Zeroable`: a zeroed record is a valid record (used for default-adds)
///
/// The trait is blanket-implemented: deriving `Pod` + `Zeroable` is all a
/// record type needs. Component ids are assigned by the registry at runtime,
/// on first registration.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
/// ```
pub trait Component: Pod {}

impl<T: Pod> Component for T {}
