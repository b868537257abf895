//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: ThingId ranges, id allocation, Systems masks, and Error.

mod ids;
mod systems;
