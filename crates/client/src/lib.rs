//! Tenant-scoped HTTP client for the delivery backend.
//! - Injects the tenant header and always sends cookies, optionally persisted.
//! - Decodes the backend error envelope into [`StructuredError`].
//! - Keeps transport failures distinguishable from server-side errors.

pub mod api;
pub mod cookies;
pub mod error;
pub mod inflight;
pub mod multipart;
pub mod options;
pub mod tenant;

pub use api::{encode_path_segment, ApiClient};
pub use cookies::{CookiePersistence, PersistError, PersistentCookies};
pub use error::{ApiError, ErrorKind, StructuredError};
pub use inflight::{InFlightRegistry, RequestKey, RequestState, RequestToken};
pub use multipart::MultipartForm;
pub use options::{RequestOptions, TenantScope};
pub use tenant::TenantSource;
