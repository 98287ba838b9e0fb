use std::path::PathBuf;

use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::Response;
use tower::ServiceExt;

use super::*;
use crate::config::ConfigError;
use crate::state::IdentityStatus;

fn website_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("website")
}

fn test_app() -> Router {
    let status = IdentityStatus::from_config(&Err(ConfigError::MissingIdentity { missing: vec!["FIREBASE_API_KEY"] }));
    app(AppState::new(status, None), &website_dir())
}

async fn send(uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = axum::http::Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    test_app()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn healthz_is_public() {
    assert_eq!(send("/healthz", None).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_page_served_without_cookie() {
    let resp = send("/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(r#"data-page="home""#));
}

#[tokio::test]
async fn dashboard_page_requires_summary_cookie() {
    let resp = send("/dashboard/", None).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/auth/login?callbackUrl=/dashboard/");

    let resp = send("/dashboard/", Some("fb-authed=true")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains(r#"data-page="dashboard""#));
}

#[tokio::test]
async fn admin_page_redirects_to_admin_login() {
    let resp = send("/admin/", None).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/admin/login");

    let resp = send("/admin/login/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn sign_in_page_bounces_signed_in_visitor() {
    let resp = send("/auth/login/", Some("fb-authed=true")).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&resp), "/dashboard");

    let resp = send("/auth/logout/", Some("fb-authed=true")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn api_routes_are_not_gated() {
    let resp = send("/api/auth/error?error=signin", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
