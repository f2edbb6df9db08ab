//! Smoke tests against a running server

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000";

/// Create an author and return its ID
async fn create_author(client: &Client) -> String {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({
            "firstName": "Jane",
            "lastName": "Austen",
            "birthDate": "1775-12-16",
            "nationality": "British"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_str().expect("No author ID").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_list_authors() {
    let client = Client::new();

    let response = client
        .get(format!("{}/authors", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.is_array());
}

#[tokio::test]
#[ignore]
async fn test_create_book_and_cleanup() {
    let client = Client::new();
    let author = create_author(&client).await;
    // Unique per run so reruns do not collide on the isbn index
    let isbn = format!("{:013}", chrono::Utc::now().timestamp_millis());

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "Emma",
            "author": author,
            "isbn": isbn,
            "publishYear": 1815,
            "genre": ["Fiction"],
            "pages": 474,
            "publisher": "John Murray"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let book = body["id"].as_str().expect("No book ID").to_string();

    // The author is pinned while the book exists
    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["authorDetails"][0]["id"], author.as_str());

    // Cleanup
    let _ = client.delete(format!("{}/books/{}", BASE_URL, book)).send().await;
    let _ = client.delete(format!("{}/authors/{}", BASE_URL, author)).send().await;
}

#[tokio::test]
#[ignore]
async fn test_invalid_id() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books/not-an-id", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
