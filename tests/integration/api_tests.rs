//! API integration tests
//!
//! Drive the real `ApiClient` against an in-process axum stub of the
//! Venuity API.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use venuity_client::{
    api::{ApiClient, BookingsApi, FavoritesApi, UsersApi},
    config::ApiConfig,
    models::{BookingQuery, BookingStatus, FavoriteQuery, UpdateProfile},
    session::SessionState,
    AppError, Session,
};

/// Nothing listens here, so connecting fails immediately
const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

type Seen = Arc<Mutex<Vec<String>>>;

/// Serve `router` on an ephemeral port and return its base URL
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Stub server failed");
    });
    format!("http://{}", addr)
}

fn client(base_urls: Vec<String>, session: Session) -> ApiClient {
    let config = ApiConfig {
        base_urls,
        ..Default::default()
    };
    ApiClient::new(&config, session).expect("Failed to build client")
}

fn signed_in() -> Session {
    let session = Session::new();
    session.sign_in("opaque-test-token");
    session
}

fn booking_json(id: &str, end: &str) -> Value {
    json!({
        "_id": id,
        "status": "confirmed",
        "startDate": "2026-11-07T18:30:00Z",
        "endDate": end,
        "venue": { "_id": "v1", "name": "The Glasshouse", "location": "12 Harbour Road, Leith" },
        "payment": { "status": "paid", "total": 1450 },
        "services": [{ "type": "catering", "provider": "Fennel & Co" }],
        "createdAt": "2026-09-01T10:00:00Z"
    })
}

fn bookings_router(seen: Seen) -> Router {
    Router::new()
        .route(
            "/api/bookings",
            get(move |headers: HeaderMap, Query(params): Query<Vec<(String, String)>>| {
                let seen = seen.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    seen.lock().unwrap().push(auth);
                    for (key, value) in params {
                        seen.lock().unwrap().push(format!("{}={}", key, value));
                    }
                    Json(json!({
                        "data": [
                            booking_json("bk_1", "2026-11-07T23:30:00Z"),
                            // Ends before it starts: dropped by the client
                            booking_json("bk_bad", "2026-11-07T10:00:00Z"),
                        ]
                    }))
                }
            }),
        )
        .route(
            "/api/bookings/:id/status",
            patch(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                if id == "bk_locked" {
                    return (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        Json(json!({ "message": "Cancellation window has closed" })),
                    )
                        .into_response();
                }
                match id.as_str() {
                    "bk_204" => return StatusCode::NO_CONTENT.into_response(),
                    "bk_empty" => return StatusCode::OK.into_response(),
                    _ => {}
                }
                Json(json!({ "data": { "_id": id, "status": body["status"] } })).into_response()
            }),
        )
}

fn unauthorized_router() -> Router {
    let deny = || async { (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token expired" }))) };
    Router::new()
        .route("/api/favorites", get(deny))
        .route("/api/users/profile", put(deny))
}

#[tokio::test]
async fn test_list_bookings_sends_bearer_and_query() {
    let seen: Seen = Arc::default();
    let base = spawn(bookings_router(seen.clone())).await;
    let api = client(vec![base], signed_in());

    let query = BookingQuery {
        status: Some("upcoming".to_string()),
        service_type: Some("catering".to_string()),
        ..Default::default()
    };
    let bookings = api.list_bookings(&query).await.expect("list failed");

    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, "bk_1");
    assert_eq!(bookings[0].venue.name, "The Glasshouse");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen[0], "Bearer opaque-test-token");
    assert!(seen.contains(&"status=upcoming".to_string()));
    assert!(seen.contains(&"serviceType=catering".to_string()));
}

#[tokio::test]
async fn test_falls_back_to_next_base_url() {
    let base = spawn(bookings_router(Arc::default())).await;
    let api = client(vec![UNREACHABLE_URL.to_string(), base], signed_in());

    let bookings = api.list_bookings(&BookingQuery::default()).await.expect("fallback failed");
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn test_all_base_urls_down_is_transport_error() {
    let session = signed_in();
    let api = client(
        vec![UNREACHABLE_URL.to_string(), "http://127.0.0.1:2".to_string()],
        session.clone(),
    );

    let err = api.list_bookings(&BookingQuery::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)), "got {:?}", err);
    assert!(session.is_active());
}

#[tokio::test]
async fn test_update_status() {
    let base = spawn(bookings_router(Arc::default())).await;
    let api = client(vec![base], signed_in());

    api.update_status("bk_1", BookingStatus::Cancelled)
        .await
        .expect("cancel failed");
    api.update_status("bk_204", BookingStatus::Cancelled)
        .await
        .expect("204 No Content rejected");
    api.update_status("bk_empty", BookingStatus::Cancelled)
        .await
        .expect("empty 200 body rejected");

    let err = api
        .update_status("bk_locked", BookingStatus::Cancelled)
        .await
        .unwrap_err();
    match &err {
        AppError::Server { status, .. } => assert_eq!(*status, 422),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(err.user_message(), "Cancellation window has closed");
}

#[tokio::test]
async fn test_unauthorized_expires_session() {
    let base = spawn(unauthorized_router()).await;
    let session = signed_in();
    let api = client(vec![base], session.clone());

    let err = api.list_favorites(&FavoriteQuery::default()).await.unwrap_err();
    assert!(matches!(err, AppError::SessionExpired { .. }));
    assert!(session.requires_login());
    assert!(matches!(session.state(), SessionState::LoginRequired { .. }));
}

#[tokio::test]
async fn test_unauthorized_on_soft_fail_endpoint_keeps_session() {
    let base = spawn(unauthorized_router()).await;
    let session = signed_in();
    let api = client(vec![base], session.clone());

    let update = UpdateProfile {
        name: Some("Ada Lovelace".to_string()),
        ..Default::default()
    };
    let err = api.update_profile(&update).await.unwrap_err();
    match err {
        AppError::Authentication(message) => assert_eq!(message, "Token expired"),
        other => panic!("unexpected error {:?}", other),
    }
    assert!(session.is_active());
}

#[tokio::test]
async fn test_toggle_favorite_reads_envelope() {
    let router = Router::new().route(
        "/api/favorites/toggle/:id",
        post(|Path(id): Path<String>| async move {
            Json(json!({ "data": { "isFavorite": id != "fav_off" } }))
        }),
    );
    let base = spawn(router).await;
    let api = client(vec![base], signed_in());

    assert!(api.toggle_favorite("fav_on").await.unwrap().is_favorite);
    assert!(!api.toggle_favorite("fav_off").await.unwrap().is_favorite);
}

#[tokio::test]
async fn test_malformed_body_is_server_error() {
    let router = Router::new().route("/api/favorites", get(|| async { "not json" }));
    let base = spawn(router).await;
    let api = client(vec![base], signed_in());

    let err = api.list_favorites(&FavoriteQuery::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Server { status: 200, message: None }));
}
