use std::sync::Arc;

use common::types::ErrorEnvelope;
use configs::ApiConfig;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cookies::{CookiePersistence, PersistentCookies};
use crate::error::{ApiError, StructuredError};
use crate::multipart::MultipartForm;
use crate::options::{RequestOptions, TenantScope};
use crate::tenant::TenantSource;

enum Payload {
    Empty,
    Json(Vec<u8>),
    Multipart(MultipartForm),
}

/// One-shot request executor against the backend.
///
/// Every call is a single attempt: no retries and no backoff. Cookies set by
/// the backend (session and refresh tokens) are sent back on every request.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tenant_header: HeaderName,
    tenant: Arc<dyn TenantSource>,
}

impl ApiClient {
    /// Client whose cookies live only as long as the process.
    pub fn new(cfg: &ApiConfig, tenant: Arc<dyn TenantSource>) -> Result<Self, ApiError> {
        Self::build(cfg, tenant, Arc::new(Jar::default()))
    }

    /// Client whose cookies are written through to `cookies`, so a later
    /// process on the same storage still carries the backend session.
    pub fn with_persistent_cookies(
        cfg: &ApiConfig,
        tenant: Arc<dyn TenantSource>,
        cookies: Arc<dyn CookiePersistence>,
    ) -> Result<Self, ApiError> {
        Self::build(cfg, tenant, Arc::new(PersistentCookies::new(cookies)))
    }

    fn build<C: CookieStore + 'static>(
        cfg: &ApiConfig,
        tenant: Arc<dyn TenantSource>,
        cookies: Arc<C>,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().cookie_provider(cookies);
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        let tenant_header = HeaderName::from_bytes(cfg.tenant_header.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("tenant header {}: {e}", cfg.tenant_header)))?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            tenant_header,
            tenant,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute one JSON request.
    ///
    /// A 204 response is decoded as JSON `null` without reading the body, so
    /// callers expecting `()` or `Option<_>` receive their empty value.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOptions,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let payload = match body {
            Some(b) => Payload::Json(
                serde_json::to_vec(b).map_err(|e| ApiError::InvalidRequest(format!("body: {e}")))?,
            ),
            None => Payload::Empty,
        };
        self.execute(method, path, payload, opts).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None, opts).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, opts: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), opts).await
    }

    /// POST without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::POST, path, None, opts).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B, opts: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), opts).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B, opts: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, Some(body), opts).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, opts: RequestOptions) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::DELETE, path, None, opts).await
    }

    /// POST a multipart body. The JSON content type is left out so the
    /// transport can set the boundary.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        form: MultipartForm,
        opts: RequestOptions,
    ) -> Result<T, ApiError> {
        self.execute(Method::POST, path, Payload::Multipart(form), opts).await
    }

    fn resolve_tenant(&self, scope: TenantScope) -> Result<Option<String>, ApiError> {
        let tenant = self
            .tenant
            .tenant_identifier()
            .filter(|t| !t.trim().is_empty());
        if scope == TenantScope::Required && tenant.is_none() {
            return Err(ApiError::MissingTenant);
        }
        Ok(tenant)
    }

    fn build_headers(&self, tenant: Option<&str>, json: bool, overrides: &HeaderMap) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        if json {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        if let Some(tenant) = tenant {
            let value = HeaderValue::from_str(tenant)
                .map_err(|e| ApiError::InvalidRequest(format!("tenant header value: {e}")))?;
            headers.insert(self.tenant_header.clone(), value);
        }
        for (name, value) in overrides.iter() {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let raw = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Url::parse(&raw).map_err(|e| ApiError::InvalidRequest(format!("{raw}: {e}")))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        payload: Payload,
        opts: RequestOptions,
    ) -> Result<T, ApiError> {
        let tenant = self.resolve_tenant(opts.tenant)?;
        let is_multipart = matches!(payload, Payload::Multipart(_));
        let headers = self.build_headers(tenant.as_deref(), !is_multipart, &opts.headers)?;
        let url = self.url(path)?;

        let request_id = Uuid::new_v4();
        debug!(%request_id, %method, path, tenant = tenant.as_deref().unwrap_or("-"), "api_request");

        let mut req = self.http.request(method.clone(), url).headers(headers);
        if !opts.query.is_empty() {
            req = req.query(&opts.query);
        }
        req = match payload {
            Payload::Empty => req,
            Payload::Json(bytes) => req.body(bytes),
            Payload::Multipart(form) => req.multipart(form.into_form()?),
        };

        let resp = req.send().await.map_err(|e| {
            warn!(%request_id, %method, path, error = %e, "api_transport_failed");
            ApiError::Transport(e)
        })?;
        let status = resp.status();
        debug!(%request_id, status = status.as_u16(), "api_response");

        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }

        if status.is_success() {
            let bytes = resp.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        // An unreadable error body still carries the status.
        let bytes = resp.bytes().await.unwrap_or_else(|e| {
            debug!(%request_id, error = %e, "api_error_body_unreadable");
            Default::default()
        });
        let err = StructuredError::from_envelope(status.as_u16(), ErrorEnvelope::from_body(&bytes));
        warn!(
            %request_id,
            %method,
            path,
            status = err.http_status,
            error_code = err.error_code.as_deref().unwrap_or("-"),
            "api_error_response"
        );
        Err(err.into())
    }
}

/// Percent-encode one path segment, `/` included.
pub fn encode_path_segment(raw: &str) -> String {
    let Ok(mut url) = Url::parse("http://segment.invalid/") else {
        return raw.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(raw);
    }
    url.path().trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(tenant: Option<&str>) -> ApiClient {
        let cfg = ApiConfig { base_url: "http://localhost:3000/".into(), ..Default::default() };
        ApiClient::new(&cfg, Arc::new(tenant.map(str::to_string))).unwrap()
    }

    #[test]
    fn joins_paths_with_or_without_slash() {
        let c = client(None);
        assert_eq!(c.url("/auth/login").unwrap().as_str(), "http://localhost:3000/auth/login");
        assert_eq!(c.url("tenants/me").unwrap().as_str(), "http://localhost:3000/tenants/me");
    }

    #[test]
    fn required_scope_without_tenant_fails_fast() {
        let c = client(None);
        assert!(matches!(c.resolve_tenant(TenantScope::Required), Err(ApiError::MissingTenant)));
        assert_eq!(c.resolve_tenant(TenantScope::Optional).unwrap(), None);
        let blank = client(Some("  "));
        assert!(matches!(blank.resolve_tenant(TenantScope::Required), Err(ApiError::MissingTenant)));
    }

    #[test]
    fn caller_headers_win() {
        let c = client(Some("acme"));
        let overrides = RequestOptions::default()
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .headers;
        let h = c.build_headers(Some("acme"), true, &overrides).unwrap();
        assert_eq!(h.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(h.get("x-tenant-slug").unwrap(), "acme");
    }

    #[test]
    fn path_segments_are_escaped() {
        assert_eq!(encode_path_segment("c1"), "c1");
        assert_eq!(encode_path_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_path_segment("50%?#"), "50%25%3F%23");
    }

    #[test]
    fn multipart_omits_json_content_type() {
        let c = client(Some("acme"));
        let h = c.build_headers(Some("acme"), false, &HeaderMap::new()).unwrap();
        assert!(h.get(CONTENT_TYPE).is_none());
        assert_eq!(h.get("x-tenant-slug").unwrap(), "acme");
    }
}
