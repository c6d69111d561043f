//! Shared building blocks for the delivery admin workspace.
//! - Logging initialisation and runtime environment checks.
//! - Wire types shared by the client and service layers.
//! - Money formatting helpers.

pub mod env;
pub mod types;
pub mod utils;
