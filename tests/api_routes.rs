//! Router-level checks for requests that are settled before any query runs:
//! authentication, authorization, payload validation and routing.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use storefront_api::{
    config::AppConfig, routes, services::auth_service::issue_token, state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

fn test_app() -> Router {
    let config = AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: SECRET.into(),
        jwt_ttl_hours: 1,
        cors_origins: Vec::new(),
    };
    routes::app(AppState::new(DatabaseConnection::Disconnected, config))
}

fn bearer(role: &str) -> String {
    let token = issue_token(Uuid::new_v4(), role, SECRET, 1).expect("token");
    format!("Bearer {token}")
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn json_request(method: &str, uri: &str, auth: Option<String>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

#[tokio::test]
async fn health_endpoint_responds() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let request = Request::builder()
        .uri("/api/nope")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["data"]["path"], "/api/nope");
}

#[tokio::test]
async fn admin_routes_require_a_token() {
    let request = Request::builder()
        .uri("/api/admin/stats")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["data"]["error"].as_str().unwrap().contains("Authorization"));
}

#[tokio::test]
async fn admin_routes_reject_garbage_tokens() {
    let request = Request::builder()
        .uri("/api/admin/categories")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_forbid_regular_users() {
    let request = Request::builder()
        .uri("/api/admin/inquiries")
        .header(header::AUTHORIZATION, bearer("user"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_category_with_blank_name_fails_validation() {
    let request = json_request(
        "POST",
        "/api/admin/categories",
        Some(bearer("admin")),
        serde_json::json!({ "name": "" }),
    );
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Validation failed"));
}

#[tokio::test]
async fn create_product_rejects_inverted_prices() {
    let request = json_request(
        "POST",
        "/api/admin/products",
        Some(bearer("admin")),
        serde_json::json!({
            "name": "Hoodie",
            "price": 5000,
            "oldPrice": 3000
        }),
    );
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_product_rejects_out_of_range_rating() {
    let request = json_request(
        "POST",
        "/api/admin/products",
        Some(bearer("admin")),
        serde_json::json!({ "name": "Mug", "price": 1000, "rating": 7.5 }),
    );
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn public_inquiry_requires_valid_email() {
    let request = json_request(
        "POST",
        "/api/inquiries",
        None,
        serde_json::json!({
            "name": "Jane",
            "email": "not-an-email",
            "message": "Do you ship abroad?"
        }),
    );
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn content_upsert_rejects_malformed_page_key() {
    let request = json_request(
        "PUT",
        "/api/admin/content/Home-Hero",
        Some(bearer("admin")),
        serde_json::json!({ "title": "Hello" }),
    );
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn product_listing_rejects_unknown_sort_key() {
    let request = Request::builder()
        .uri("/api/products?sortBy=popularity")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().unwrap().contains("popularity"));
}

#[tokio::test]
async fn product_listing_rejects_inverted_price_range() {
    let request = Request::builder()
        .uri("/api/products?minPrice=500&maxPrice=100")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_required_field_uses_error_envelope() {
    let request = json_request(
        "POST",
        "/api/admin/products",
        Some(bearer("admin")),
        serde_json::json!({ "name": "Mug" }),
    );
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Validation failed"));
    assert!(body["data"]["error"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn malformed_json_uses_error_envelope() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/inquiries")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].is_string());
}

#[tokio::test]
async fn malformed_id_uses_error_envelope() {
    let request = Request::builder()
        .uri("/api/admin/products/not-a-uuid")
        .header(header::AUTHORIZATION, bearer("admin"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Bad Request"));
    assert!(body["data"]["error"].is_string());
}

#[tokio::test]
async fn blank_name_on_update_fails_validation() {
    let request = json_request(
        "PUT",
        &format!("/api/admin/categories/{}", Uuid::new_v4()),
        Some(bearer("admin")),
        serde_json::json!({ "name": "   " }),
    );
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["data"]["error"].as_str().unwrap().contains("must not be blank"));
}

#[tokio::test]
async fn huge_page_number_does_not_crash_listing() {
    let request = Request::builder()
        .uri("/api/products?page=9223372036854775807&perPage=100")
        .body(Body::empty())
        .unwrap();
    // With no database behind the router the query itself fails, but the
    // handler must get that far and answer with an envelope.
    let (status, body) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "ORM error");
}
