//! API integration tests
//!
//! These run against a live server with a reachable MongoDB instance.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000";

async fn create_book(client: &Client, body: Value) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&body)
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore]
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
async fn test_create_book_generates_five_digit_id() {
    let client = Client::new();

    let body = create_book(&client, json!({ "title": "Dune", "author": "Herbert" })).await;

    let id = body["id"].as_i64().expect("No book ID");
    assert!((10_000..=99_999).contains(&id));
    assert_eq!(body["title"], "Dune");
    assert_eq!(body["author"], "Herbert");
    assert!(body.get("status").is_none());
}

#[tokio::test]
#[ignore]
async fn test_create_book_missing_author_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": "Dune" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("author"));
}

#[tokio::test]
#[ignore]
async fn test_create_book_invalid_status_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({ "title": "Dune", "author": "Herbert", "status": "lost" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_valid_status_and_tags() {
    let client = Client::new();

    let body = create_book(
        &client,
        json!({
            "title": "Dune Messiah",
            "author": "Herbert",
            "year": 1969,
            "category": "sci-fi",
            "status": "in maintenance",
            "tags": [{ "id": 1, "name": "classic" }]
        }),
    )
    .await;

    assert_eq!(body["status"], "in maintenance");
    assert_eq!(body["year"], 1969);
    assert_eq!(body["tags"][0]["name"], "classic");
}

#[tokio::test]
#[ignore]
async fn test_list_books_filters_are_case_insensitive_and_intersect() {
    let client = Client::new();

    // Unlikely substrings so parallel test data does not interfere
    create_book(
        &client,
        json!({ "title": "Zanzibar Chronicle", "author": "Quenneville", "category": "travel" }),
    )
    .await;

    let response = client
        .get(format!("{}/books?title=zanzibar%20chr", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(!books.is_empty());
    assert!(books
        .iter()
        .all(|b| b["title"].as_str().unwrap().to_lowercase().contains("zanzibar chr")));

    // Intersection: matching title but wrong author returns nothing
    let response = client
        .get(format!("{}/books?title=zanzibar&author=nosuchauthor", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let books: Vec<Value> = response.json().await.expect("Failed to parse response");
    assert!(books.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_get_book_by_id() {
    let client = Client::new();

    let created = create_book(&client, json!({ "title": "Arrakis Atlas", "author": "Herbert" })).await;
    let id = created["id"].as_i64().unwrap();

    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"].as_i64().unwrap(), id);
}

#[tokio::test]
#[ignore]
async fn test_update_nonexistent_book_is_404() {
    let client = Client::new();

    let response = client
        .put(format!("{}/books/123", BASE_URL))
        .json(&json!({ "title": "X", "author": "Y" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_update_book_merges_fields() {
    let client = Client::new();

    let created = create_book(
        &client,
        json!({ "title": "Children of Dune", "author": "Herbert", "category": "sci-fi" }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .json(&json!({ "title": "Children of Dune (revised)", "author": "Herbert", "status": "borrowed" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Children of Dune (revised)");
    assert_eq!(body["status"], "borrowed");
    // Untouched field survives the merge
    assert_eq!(body["category"], "sci-fi");
}

#[tokio::test]
#[ignore]
async fn test_update_book_missing_required_field_is_rejected() {
    let client = Client::new();

    let created = create_book(&client, json!({ "title": "Heretics", "author": "Herbert" })).await;
    let id = created["id"].as_i64().unwrap();

    let response = client
        .put(format!("{}/books/{}", BASE_URL, id))
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    // Stored record is unchanged
    let response = client
        .get(format!("{}/books/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["title"], "Heretics");
}

#[tokio::test]
#[ignore]
async fn test_user_lifecycle() {
    let client = Client::new();

    // Create
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "address": "12 St James's Square"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.expect("Failed to parse response");
    let id = created["id"].as_i64().expect("No user ID");
    assert!((10_000..=99_999).contains(&id));
    assert_eq!(created["borrowedBooks"], json!([]));

    // Read
    let response = client
        .get(format!("{}/users/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // Update
    let response = client
        .put(format!("{}/users/{}", BASE_URL, id))
        .json(&json!({
            "firstName": "Ada",
            "lastName": "King",
            "address": "Ockham Park",
            "borrowedBooks": [{ "id": 10001, "title": "Dune" }]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(updated["lastName"], "King");
    assert_eq!(updated["borrowedBooks"][0]["title"], "Dune");

    // Delete
    let response = client
        .delete(format!("{}/users/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    // Gone afterwards
    let response = client
        .get(format!("{}/users/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("{}/users/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_create_user_missing_address_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({ "firstName": "Ada", "lastName": "Lovelace" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_openapi_document_is_served() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api-docs/openapi.json", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/books"].is_object());
    assert!(body["paths"]["/users/{id}"].is_object());
}
