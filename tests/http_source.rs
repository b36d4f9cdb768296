//! Integration tests for the HTTP photo source against a local server.

use std::net::SocketAddr;

use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::{Value, json};

use photodeck::config::SourceConfig;
use photodeck::core::{FetchError, HttpPhotoSource, PhotoSource};

fn photos_payload(count: u64) -> Value {
    let photos: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "albumId": (i - 1) / 50 + 1,
                "id": i,
                "title": format!("photo {i}"),
                "url": format!("https://example.test/600/{i}"),
                "thumbnailUrl": format!("https://example.test/150/{i}"),
            })
        })
        .collect();
    Value::Array(photos)
}

async fn spawn_server() -> SocketAddr {
    let app = Router::new()
        .route("/photos", get(|| async { Json(photos_payload(150)) }))
        .route("/few", get(|| async { Json(photos_payload(3)) }))
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/garbage", get(|| async { "definitely not json" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn source(addr: SocketAddr, path: &str, limit: usize) -> HttpPhotoSource {
    let config = SourceConfig {
        url: Some(format!("http://{addr}{path}")),
        limit,
        timeout_secs: 5,
    };
    HttpPhotoSource::new(&config).unwrap()
}

#[tokio::test]
async fn fetch_keeps_first_hundred_in_order() {
    let addr = spawn_server().await;
    let photos = source(addr, "/photos", 100).fetch().await.unwrap();

    assert_eq!(photos.len(), 100);
    assert_eq!(photos[0].id, 1);
    assert_eq!(photos[99].id, 100);
    assert_eq!(photos[99].album_id, 2);
    assert_eq!(photos[0].key().as_str(), "1-1");
}

#[tokio::test]
async fn zero_limit_keeps_everything() {
    let addr = spawn_server().await;
    let photos = source(addr, "/photos", 0).fetch().await.unwrap();
    assert_eq!(photos.len(), 150);
}

#[tokio::test]
async fn short_list_is_returned_whole() {
    let addr = spawn_server().await;
    let photos = source(addr, "/few", 100).fetch().await.unwrap();
    assert_eq!(photos.len(), 3);
    assert_eq!(photos[2].title, "photo 3");
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let addr = spawn_server().await;
    let err = source(addr, "/broken", 100).fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 500));
}

#[tokio::test]
async fn malformed_body_maps_to_decode() {
    let addr = spawn_server().await;
    let err = source(addr, "/garbage", 100).fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[tokio::test]
async fn unreachable_host_maps_to_request() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = source(addr, "/photos", 100).fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Request(_)));
}
