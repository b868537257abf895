//! Identifiers, component masks, and error types for cairn.
//!
//! This crate provides:
//! - [`ThingId`] - Range-partitioned thing identifiers
//! - [`IdAllocator`] - Monotonic, never-reusing id allocation
//! - [`Systems`] - Per-thing component presence bitmask
//! - [`Error`] - Error types with load context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod id;
pub mod systems;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::{IdAllocator, IdRange, SPECIAL_MAX_ID, TERRAIN_MAX_ID, ThingId};
pub use systems::Systems;
