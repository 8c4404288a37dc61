//! Smoke tests against a running server instance
//!
//! Start the server with the seed endpoint enabled first:
//!   BINDERY_TEST_SEED=1 cargo run -- --data-dir /tmp/bindery-e2e --port 6970
//! then run: cargo test --test smoke_e2e -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:6970";

/// Helper to create an authenticated admin session via /test/seed.
async fn create_admin_session(client: &Client) -> Result<String, Box<dyn std::error::Error>> {
    let response = client.get(format!("{}/test/seed", BASE_URL)).send().await?;

    let cookie_value = response
        .cookies()
        .find(|c| c.name() == "bindery_session")
        .map(|c| c.value().to_string());

    cookie_value.ok_or_else(|| "No session cookie returned".into())
}

#[tokio::test]
#[ignore] // Run with: cargo test --test smoke_e2e -- --ignored
async fn home_stats_respond() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::builder().cookie_store(true).build()?;

    let response = client.get(format!("{}/api/stats/home", BASE_URL)).send().await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert!(body["stats"]["totalReviews"].is_number());

    Ok(())
}

#[tokio::test]
#[ignore]
async fn seeded_admin_can_publish() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::builder().cookie_store(true).build()?;
    let _session = create_admin_session(&client).await?;

    let response = client
        .post(format!("{}/api/posts", BASE_URL))
        .json(&json!({
            "title": "Smoke Test Review",
            "content": "A review created by the smoke test suite, long enough to pass \
                        the minimum content length validation on the create endpoint.",
            "rating": 4.0,
            "genre": ["Testing"],
            "status": "published",
            "slug": format!("smoke-test-{}", std::process::id())
        }))
        .send()
        .await?;
    assert_eq!(response.status(), 201);

    let post: Value = response.json().await?;
    assert_eq!(post["status"], "published");

    // Clean up so repeated runs keep working.
    let delete = client
        .delete(format!("{}/api/posts/{}", BASE_URL, post["id"].as_str().unwrap()))
        .send()
        .await?;
    assert_eq!(delete.status(), 200);

    Ok(())
}

#[tokio::test]
#[ignore]
async fn anonymous_writes_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();

    let response = client
        .post(format!("{}/api/posts", BASE_URL))
        .json(&json!({ "title": "nope", "content": "x", "rating": 1.0, "genre": ["x"] }))
        .send()
        .await?;
    assert_eq!(response.status(), 401);

    Ok(())
}
