//! Integration tests for Layer 1: Storage
//!
//! Tests for thing lifecycle, component tables, persistence, and export.

mod persistence;
mod things;
