//! Service layer for the delivery admin client.
//! - Owns the client-side session and the media it is stored in.
//! - Wraps backend endpoints in typed services (auth, catalog, orders, tenants, plans).
//! - Keeps UI-facing state (category list, order board) consistent with confirmed backend results.

pub mod auth;
pub mod catalog;
pub mod endpoints;
pub mod errors;
pub mod i18n;
pub mod loading;
pub mod orders;
pub mod plans;
pub mod session;
pub mod storage;
pub mod tenant_service;

pub use errors::{ServiceError, SessionError};
pub use session::{SessionContext, SessionKeys, SessionMedium, SessionSnapshot};
