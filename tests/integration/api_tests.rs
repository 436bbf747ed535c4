//! API integration tests
//!
//! The router runs in-process over memory tables and memory storage.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use studio_server::{
    api,
    backend::MemoryTables,
    config::{AppConfig, BackendKind, StorageKind},
    models::admin::NewAdminAccount,
    repository::Repository,
    services::{auth::hash_password, Services},
    storage::MemoryStorage,
    AppState,
};

const ADMIN_EMAIL: &str = "admin@studio.test";
const ADMIN_PASSWORD: &str = "correct horse";

async fn test_app() -> Router {
    test_app_with_repository().await.0
}

async fn test_app_with_repository() -> (Router, Repository) {
    let mut config = AppConfig::default();
    config.backend.kind = BackendKind::Memory;
    config.storage.kind = StorageKind::Memory;
    config.auth.jwt_secret = "integration-secret".to_string();
    config.auth.bootstrap_admin_email = Some(ADMIN_EMAIL.to_string());
    config.auth.bootstrap_admin_password = Some(ADMIN_PASSWORD.to_string());

    let repository = Repository::new(Arc::new(MemoryTables::new()));
    let storage = Arc::new(MemoryStorage::new(&config.storage.public_base_url));
    let services = Services::new(repository.clone(), storage, &config);
    services
        .auth
        .ensure_admin()
        .await
        .expect("Failed to create admin account");

    let app = api::create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    });
    (app, repository)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body is not JSON")
    };
    (status, body)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn login(app: &Router) -> String {
    login_as(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

async fn login_as(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/v1/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, _) = send(&app, get("/api/v1/ready", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_routes_require_session() {
    let app = test_app().await;

    let (status, _) = send(&app, get("/api/v1/admin/availability?month=2030-05", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/api/v1/admin/settings", Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_non_admin_account() {
    let (app, repository) = test_app_with_repository().await;
    repository
        .admins
        .create(&NewAdminAccount {
            email: "editor@studio.test".to_string(),
            password_hash: hash_password("editor pass").unwrap(),
            is_admin: false,
        })
        .await
        .unwrap();
    let token = login_as(&app, "editor@studio.test", "editor pass").await;

    let (status, session) = send(&app, get("/api/v1/auth/session", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["is_admin"], false);

    let (status, body) = send(&app, get("/api/v1/admin/availability?month=2030-05", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");

    let (status, _) = send(
        &app,
        send_json("POST", "/api/v1/admin/availability/save", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        send_json(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({ "email": ADMIN_EMAIL, "password": "wrong" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_toggle_and_save_booked_day() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, view) = send(
        &app,
        send_json(
            "POST",
            "/api/v1/admin/availability/toggle",
            Some(&token),
            json!({ "date": "2030-05-07" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["dirty"], true);
    assert_eq!(view["booked_count"], 1);

    let (status, saved) = send(
        &app,
        send_json("POST", "/api/v1/admin/availability/save", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["status"], "saved");
    assert_eq!(saved["added"], json!(["2030-05-07"]));
    assert_eq!(saved["removed"], json!([]));

    let (status, again) = send(
        &app,
        send_json("POST", "/api/v1/admin/availability/save", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["status"], "no_changes");
    assert_eq!(again["message"], "No changes to save.");

    // A fresh session reads the committed state
    let other = login(&app).await;
    let (status, month) = send(&app, get("/api/v1/admin/availability?month=2030-05", Some(&other))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(month["dirty"], false);
    let booked: Vec<&Value> = month["days"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d["booked"] == true)
        .collect();
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0]["date"], "2030-05-07");
}

#[tokio::test]
async fn test_signed_out_token_is_rejected() {
    let app = test_app().await;
    let token = login(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get("/api/v1/auth/session", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Session has been signed out");
}

#[tokio::test]
async fn test_duplicate_slot_is_conflict() {
    let app = test_app().await;
    let token = login(&app).await;
    let slot = json!({ "date": "2030-05-08", "slot_time": "10:00", "service_type": "wedding" });

    let (status, created) = send(&app, send_json("POST", "/api/v1/admin/slots", Some(&token), slot.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "available");

    let (status, body) = send(&app, send_json("POST", "/api/v1/admin/slots", Some(&token), slot)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "This slot already exists for that date and time.");

    let (status, day) = send(&app, get("/api/v1/calendar/2030-05-08", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(day["status"], "available");
    assert_eq!(day["slots"][0]["time"], "10:00");
    assert_eq!(day["event_type"], "wedding");
}

#[tokio::test]
async fn test_booking_link_requires_whatsapp_number() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, package) = send(
        &app,
        send_json(
            "POST",
            "/api/v1/admin/packages",
            Some(&token),
            json!({
                "category": "wedding",
                "name": "Classic",
                "price": "RM 350",
                "description": "Four hours of coverage",
                "features": ["100 edited photos", " "]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(package["features"], json!(["100 edited photos"]));
    let package_id = package["id"].as_str().unwrap().to_string();

    let booking = json!({ "package_id": package_id, "date": "2030-05-09", "time": "10:00" });

    let (status, body) = send(&app, send_json("POST", "/api/v1/booking/whatsapp", None, booking.clone())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "WhatsApp booking is not available right now. Please use the inquiry section below to contact us."
    );

    let (status, _) = send(
        &app,
        send_json(
            "PUT",
            "/api/v1/admin/settings",
            Some(&token),
            json!({ "brand_name": "Lumen Studio", "whatsapp_number": "+60 12-345 6789" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, send_json("POST", "/api/v1/booking/whatsapp", None, booking)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["package_name"], "Classic");
    assert_eq!(body["summary"]["time"], "10:00");
    let url = body["link"]["url"].as_str().unwrap();
    assert!(url.starts_with("https://wa.me/60123456789?text="));
    assert!(body["link"]["message"].as_str().unwrap().contains("Lumen Studio"));
}

#[tokio::test]
async fn test_sitemap_lists_default_services() {
    let app = test_app().await;

    let response = app.clone().oneshot(get("/sitemap.xml", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/xml"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let xml = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(xml.contains("<urlset"));
    assert!(xml.contains("http://localhost:8080/services/convocation"));
}
