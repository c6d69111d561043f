#![allow(dead_code)]

use std::sync::Arc;

use client::ApiClient;
use configs::ApiConfig;
use serde_json::{json, Value};
use service::session::SessionContext;
use wiremock::MockServer;

/// In-memory session plus a client pointed at `server`.
pub fn wire(server: &MockServer, tenant: Option<&str>) -> (Arc<SessionContext>, ApiClient) {
    let session = Arc::new(SessionContext::in_memory());
    if let Some(t) = tenant {
        session.set_tenant_identifier(t).expect("tenant");
    }
    let cfg = ApiConfig { base_url: server.uri(), ..Default::default() };
    let api = ApiClient::new(&cfg, session.clone()).expect("client");
    (session, api)
}

pub fn user_json(email: &str) -> Value {
    json!({
        "id": "u-1",
        "name": "Ana",
        "email": email,
        "role": "ADMIN",
        "isActive": true,
        "tenantId": "t-1",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}
