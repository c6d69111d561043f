//! Authentication against the backend's cookie-based session.
//!
//! Access and refresh tokens live in HttpOnly cookies handled by the HTTP
//! client and persisted through the session; this module only stores the
//! user summary and tenant slug.

pub mod registration;
pub mod service;
pub mod state;

pub use registration::RegistrationService;
pub use service::AuthService;
pub use state::SessionState;
