//! Plugin registry: which display plugins are installed, their evaluation
//! order, and their enabled state.
//!
//! The registry is the shared mutable half of the resolution pipeline: the
//! chain reads it on every request, the admin surface mutates it rarely.
//! Every mutation is a single store operation (or a single transaction for
//! rank swaps), so readers never observe a half-applied change.

pub mod error;
pub mod registry;
pub mod store;

pub use {
    error::{Error, Result},
    registry::PluginRegistry,
    store::{MemoryPluginStore, PluginEntry, PluginStore, SqlitePluginStore},
};
