mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use cinedex::AppState;
use common::seeded_store;
use serde_json::Value;
use tower::ServiceExt;

async fn get(uri: &str) -> (StatusCode, Value) {
    let app = cinedex::router(AppState { store: seeded_store().await });

    let resp = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn lists_movies_with_nested_associations() {
    let (status, body) = get("/movies?cast=Hanks").await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);

    let gump = &results[0];
    assert_eq!(gump["id"], 4);
    assert_eq!(gump["title"], "Forrest Gump");
    assert_eq!(gump["genre_ids"], serde_json::json!([]));
    assert_eq!(gump["movie_genres"][0]["genre_id"], 18);
    assert_eq!(gump["movie_genres"][0]["genre"]["name"], "Drama");
    assert_eq!(gump["movie_cast"][0]["cast_id"], 31);
    assert_eq!(gump["movie_cast"][0]["character"], "Forrest Gump");
    assert_eq!(gump["movie_cast"][0]["cast"]["name"], "Tom Hanks");
}

#[tokio::test]
async fn empty_match_is_an_empty_results_array() {
    let (status, body) = get("/movies?search=nothing-like-this").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "results": [] }));
}

#[tokio::test]
async fn malformed_filter_is_reported_as_server_error() {
    let (status, body) = get("/movies?year=abcd").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, serde_json::json!({ "error": "invalid year \"abcd\"" }));
}

#[tokio::test]
async fn non_numeric_genre_is_reported_as_server_error() {
    let (status, body) = get("/movies?genres=18,drama").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "invalid genre id \"drama\"");
}

#[tokio::test]
async fn repeated_parameter_is_reported_as_server_error() {
    let (status, body) = get("/movies?genres=18&genres=28").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("duplicate field `genres`"), "{message}");
}

#[tokio::test]
async fn text_filters_ignore_case_over_http() {
    let (status, body) = get("/movies?search=GUMP&cast=robin%20wright").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["id"], 4);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
}
