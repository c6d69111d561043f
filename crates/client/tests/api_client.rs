//! HTTP behaviour of the API client against a wiremock backend.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;

use client::{ApiClient, ApiError, ErrorKind, MultipartForm, RequestOptions};
use configs::ApiConfig;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, tenant: Option<&str>) -> ApiClient {
    let cfg = ApiConfig { base_url: server.uri(), ..Default::default() };
    ApiClient::new(&cfg, Arc::new(tenant.map(str::to_string))).expect("client")
}

#[tokio::test]
async fn missing_tenant_fails_before_network() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    let err = api
        .get::<Value>("/admin/orders", RequestOptions::tenant_required())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingTenant));
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn injects_tenant_and_json_headers() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants/me"))
        .and(header("x-tenant-slug", "acme"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slug": "acme"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("acme"));
    let body: Value = api.get("/tenants/me", RequestOptions::tenant_required()).await?;
    assert_eq!(body["slug"], "acme");
    Ok(())
}

#[tokio::test]
async fn optional_scope_omits_header_when_absent() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/subscription-plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    let plans: Vec<Value> = api.get("/subscription-plans", RequestOptions::default()).await?;
    assert!(plans.is_empty());
    let reqs = server.received_requests().await.unwrap_or_default();
    assert_eq!(reqs.len(), 1);
    assert!(reqs[0].headers.get("x-tenant-slug").is_none());
    Ok(())
}

#[tokio::test]
async fn caller_header_overrides_tenant() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-tenant-slug", "other"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("acme"));
    let opts = RequestOptions::tenant_required().with_header(
        HeaderName::from_static("x-tenant-slug"),
        HeaderValue::from_static("other"),
    );
    let ok: bool = api.get("/anything", opts).await?;
    assert!(ok);
    Ok(())
}

#[tokio::test]
async fn no_content_skips_decoding() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let api = client_for(&server, Some("acme"));
    // An empty body would fail JSON decoding, so success proves no decode was attempted.
    api.delete::<()>("/admin/catalog/categories/1", RequestOptions::default()).await?;
    let none: Option<Value> = api.delete("/admin/catalog/categories/2", RequestOptions::default()).await?;
    assert!(none.is_none());
    Ok(())
}

#[tokio::test]
async fn structured_error_keeps_code_and_params() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let params = json!({"name": "Pizzas", "limit": 10, "strict": true});
    Mock::given(method("POST"))
        .and(path("/admin/catalog/categories"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Category already exists",
            "errorCode": "CATEGORY_ALREADY_EXISTS",
            "params": params,
        })))
        .mount(&server)
        .await;

    let api = client_for(&server, Some("acme"));
    let err = api
        .post::<Value, _>("/admin/catalog/categories", &json!({"name": "Pizzas"}), RequestOptions::tenant_required())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structured);
    let structured = err.as_structured().expect("structured");
    assert_eq!(structured.http_status, 409);
    assert_eq!(structured.message, "Category already exists");
    assert_eq!(structured.error_code.as_deref(), Some("CATEGORY_ALREADY_EXISTS"));
    assert_eq!(Value::Object(structured.params.clone().unwrap()), params);
    Ok(())
}

#[tokio::test]
async fn non_json_error_body_uses_status_message() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    let err = api.get::<Value>("/html", RequestOptions::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 502");
    assert_eq!(err.status(), Some(502));
    assert!(err.error_code().is_none());

    let err = api.get::<Value>("/empty", RequestOptions::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500");
    Ok(())
}

#[tokio::test]
async fn transport_failure_is_not_structured() {
    // Nothing listens on port 9 of the loopback interface in test environments.
    let cfg = ApiConfig { base_url: "http://127.0.0.1:9".into(), ..Default::default() };
    let api = ApiClient::new(&cfg, Arc::new(Some("acme".to_string()))).expect("client");
    let err = api.get::<Value>("/tenants/me", RequestOptions::tenant_required()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.as_structured().is_none());
    assert!(err.to_string().starts_with("API Error:"));
}

#[tokio::test]
async fn truncated_error_body_keeps_status() -> anyhow::Result<()> {
    // Announces 100 body bytes, sends 3, then hangs up.
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let server = std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\nContent-Length: 100\r\nConnection: close\r\n\r\n{\"m",
            );
        }
    });

    let cfg = ApiConfig { base_url: format!("http://{addr}"), ..Default::default() };
    let api = ApiClient::new(&cfg, Arc::new(None::<String>))?;
    let err = api.get::<Value>("/admin/orders", RequestOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structured);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "HTTP 500");
    let _ = server.join();
    Ok(())
}

#[tokio::test]
async fn bad_success_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("oops"))
        .mount(&server)
        .await;
    let api = client_for(&server, None);
    let err = api.get::<Value>("/x", RequestOptions::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn cookies_are_sent_back() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "refresh_token=r1; Path=/; HttpOnly")
                .set_body_json(json!({"ok": true})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("cookie", "refresh_token=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, None);
    let _: Value = api.post("/auth/login", &json!({"email": "a@b.com"}), RequestOptions::default()).await?;
    let _: Value = api.post_empty("/auth/refresh", RequestOptions::default()).await?;
    Ok(())
}

#[tokio::test]
async fn json_body_and_query_are_sent() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/admin/catalog/categories/7/active"))
        .and(query_param("notify", "false"))
        .and(body_json(json!({"isActive": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "7"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server, Some("acme"));
    let opts = RequestOptions::tenant_required().with_query("notify", false);
    let out: Value = api.patch("/admin/catalog/categories/7/active", &json!({"isActive": true}), opts).await?;
    assert_eq!(out["id"], "7");
    Ok(())
}

#[tokio::test]
async fn upload_is_multipart_with_tenant() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/catalog/categories"))
        .and(header("x-tenant-slug", "acme"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "c1"})))
        .mount(&server)
        .await;

    let api = client_for(&server, Some("acme"));
    let form = MultipartForm::new()
        .text("name", "Pizzas")
        .file("image", "p.png", "image/png", vec![137, 80, 78, 71]);
    let out: Value = api.upload("/admin/catalog/categories", form, RequestOptions::tenant_required()).await?;
    assert_eq!(out["id"], "c1");

    let reqs = server.received_requests().await.unwrap_or_default();
    let ct = reqs[0].headers.get("content-type").unwrap().to_str()?;
    assert!(ct.starts_with("multipart/form-data; boundary="));
    let body = String::from_utf8_lossy(&reqs[0].body);
    assert!(body.contains("name=\"name\""));
    assert!(body.contains("Pizzas"));
    assert!(body.contains("filename=\"p.png\""));
    Ok(())
}
