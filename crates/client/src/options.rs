use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Whether a call needs a tenant identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TenantScope {
    /// Send the tenant header when one is known.
    #[default]
    Optional,
    /// Fail before any I/O when no tenant is known.
    Required,
}

/// Per-call knobs. Caller headers override the defaults on conflict.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub tenant: TenantScope,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn tenant_required() -> Self {
        Self { tenant: TenantScope::Required, ..Default::default() }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}
