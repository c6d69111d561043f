//! Storage media backing the client session.
//!
//! Both media store string values under string keys and make a single key
//! write atomic. The file-backed one survives process restarts.

pub mod json_map_store;
pub mod memory;

pub use json_map_store::JsonMapStore;
pub use memory::MemoryMedium;
