mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use common::{spawn_mock_store, test_state};
use kejahunt_api::routes::create_api_router;

#[tokio::test]
async fn photo_upload_stores_object_then_record() {
    let (base_url, store) = spawn_mock_store().await;
    let state = test_state(&base_url);
    let app = create_api_router().with_state(state);

    let boundary = "kejahunt-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"listing_id\"\r\n\r\n42\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"house.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"not really a jpeg");
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/photos/upload/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json: Value = serde_json::from_slice(&bytes).expect("json body");

    let url = json["url"].as_str().expect("public url");
    assert!(url.contains("listing-photos"));
    assert!(url.ends_with("_house.jpg"));
    assert_eq!(json["photo"]["listing_id"], 42);
    assert_eq!(json["photo"]["url"], url);

    // One object landed in the bucket, one row in the photos table.
    assert_eq!(store.uploads.lock().unwrap().len(), 1);
    let rows = store.rows("photos");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["listing_id"], 42);
}

#[tokio::test]
async fn photo_upload_without_file_is_rejected() {
    let (base_url, store) = spawn_mock_store().await;
    let state = test_state(&base_url);
    let app = create_api_router().with_state(state);

    let boundary = "kejahunt-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"listing_id\"\r\n\r\n42\r\n--{boundary}--\r\n"
    );

    let request = Request::builder()
        .method("POST")
        .uri("/photos/upload/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.uploads.lock().unwrap().is_empty());
    assert!(store.rows("photos").is_empty());
}
