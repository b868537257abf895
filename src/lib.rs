//! Cairn - Entity/component store for a turn-based world
//!
//! This crate re-exports all layers of the Cairn system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: cairn_storage  - Store, component tables, persistence, export
//! Layer 0: cairn_foundation - Core types (ThingId, Systems, Error)
//! ```

pub use cairn_foundation as foundation;
pub use cairn_storage as storage;
