//! Thing directory, component tables, persistence, and export for cairn.
//!
//! This crate provides:
//! - [`Store`] - The authoritative thing/component store
//! - [`ComponentKind`] - The closed registry of component kinds
//! - [`Table`] - Per-kind storage with optional value index and new-list
//! - [`SaveSink`] / [`LoadSource`] - The block-structured persistence protocol
//! - [`BlockDocument`] - An in-memory persistence host backed by `MessagePack`
//! - [`Store::export_obj`] - Deep copy of a thing into another store

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod component;
pub mod components;
pub mod config;
pub mod document;
pub mod export;
pub mod index;
pub mod persist;
pub mod registry;
pub mod store;
pub mod table;
pub mod thing;

pub use component::{Bundle, Component, ExportRefs, Indexed, TrackNew};
pub use config::StoreConfig;
pub use document::{BlockDocument, BlockReader, BlockWriter, Node};
pub use export::ExportMemo;
pub use index::ValueIndex;
pub use persist::{LoadSource, SaveSink, THINGS_BLOCK};
pub use registry::{ComponentKind, KIND_COUNT, Tables};
pub use store::Store;
pub use table::Table;
pub use thing::Thing;
