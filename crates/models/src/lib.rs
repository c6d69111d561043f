//! Wire and domain types exchanged with the delivery backend.
//! - Field names follow the backend's camelCase JSON.
//! - Input types carry their own local validation.

pub mod errors;
pub mod user;
pub mod tenant;
pub mod category;
pub mod order;
pub mod plan;
